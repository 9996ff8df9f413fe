pub mod calculations;
pub mod config;
pub mod impact;
pub mod logging;
pub mod persistence;
pub mod portfolio;
pub mod project;
pub mod report;
pub mod resource;
pub mod validation;

pub use calculations::duration::DurationBreakdown;
pub use calculations::resource_hours::{monthly_resource_hours, parse_month};
pub use config::CalculatorConfig;
pub use impact::{ImpactCalculator, ImpactError};
pub use persistence::{
    JsonPortfolioStore, PersistenceError, PortfolioStore, export_portfolio_json,
    import_portfolio_json, load_allocations_from_csv, load_portfolio_from_json,
    save_allocations_to_csv, save_portfolio_to_json,
};
pub use portfolio::Portfolio;
pub use project::{Milestone, Priority, Project, ValueStream};
pub use report::{CostImpact, ImpactReport, Risk, RiskKind, Severity};
pub use resource::{ResourceAllocation, ResourceChanges, ResourceMap, ResourceType};
pub use validation::ValidationError;
