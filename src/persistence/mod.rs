use crate::Portfolio;
use crate::validation;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Where the planning tool keeps its portfolio between sessions.
pub trait PortfolioStore {
    fn save_portfolio(&self, portfolio: &Portfolio) -> PersistenceResult<()>;
    fn load_portfolio(&self) -> PersistenceResult<Option<Portfolio>>;
}

pub fn validate_portfolio(portfolio: &Portfolio) -> PersistenceResult<()> {
    validation::validate_portfolio(portfolio)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub mod file;

pub use file::{
    JsonPortfolioStore, export_portfolio_json, import_portfolio_json, load_allocations_from_csv,
    load_portfolio_from_json, save_allocations_to_csv, save_portfolio_to_json,
};
