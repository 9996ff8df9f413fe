use crate::calculations::complexity::estimate_project_complexity;
use crate::calculations::cost::CostComparison;
use crate::calculations::duration::{DurationBreakdown, DurationEstimate};
use crate::calculations::risk::RiskAssessment;
use crate::calculations::team::TeamDynamics;
use crate::config::CalculatorConfig;
use crate::portfolio::Portfolio;
use crate::project::Project;
use crate::report::{CostImpact, ImpactReport, Risk};
use crate::resource::{ResourceChanges, ResourceMap, ResourceType};
use crate::validation;
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ImpactError {
    #[error("degenerate input: {0}")]
    DegenerateInput(String),
    #[error("invalid calculator config: {0}")]
    InvalidConfig(String),
}

/// Estimates how an allocation change moves a project's duration, end date,
/// cost, and risk. Holds only its configuration; every call works on the
/// borrowed inputs and returns fresh values.
#[derive(Debug, Clone, Default)]
pub struct ImpactCalculator {
    config: CalculatorConfig,
}

impl ImpactCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CalculatorConfig) {
        self.config = config;
    }

    /// Simulates `resource_changes` on `project` and reports the effect.
    ///
    /// Changes for resource types the project has no allocation for are
    /// ignored. Never fails: degenerate inputs surface as non-finite numbers
    /// or a missing end date in the report.
    pub fn calculate_timeline_impact(
        &self,
        project: &Project,
        resource_changes: &ResourceChanges,
        resource_types: &[ResourceType],
    ) -> ImpactReport {
        let original_duration = self.calculate_project_duration(project, resource_types);

        let new_project = Project {
            resources: merge_resource_changes(&project.resources, resource_changes),
            ..project.clone()
        };
        let new_duration = self.calculate_project_duration(&new_project, resource_types);

        let duration_change = new_duration - original_duration;
        let report = ImpactReport {
            original_duration,
            new_duration,
            duration_change,
            percentage_change: duration_change / original_duration * 100.0,
            new_end_date: project
                .start_date
                .and_then(|start_date| Self::calculate_new_end_date(start_date, new_duration)),
            cost_impact: CostComparison::new(&project.resources, resource_changes, resource_types)
                .execute(original_duration),
            risk_factors: self.assess_risk_factors(&new_project, resource_types),
        };

        tracing::debug!(
            project = %project.id,
            changes = resource_changes.len(),
            original_duration,
            new_duration,
            risks = report.risk_factors.len(),
            "calculated timeline impact"
        );
        report
    }

    /// Same as [`calculate_timeline_impact`](Self::calculate_timeline_impact),
    /// but rejects invalid configuration or inputs (including undated
    /// projects) and any report that carries a non-finite number or no end date.
    pub fn try_calculate_timeline_impact(
        &self,
        project: &Project,
        resource_changes: &ResourceChanges,
        resource_types: &[ResourceType],
    ) -> Result<ImpactReport, ImpactError> {
        self.config
            .validate()
            .map_err(|err| ImpactError::InvalidConfig(err.to_string()))?;
        validation::validate_resource_types(resource_types)
            .map_err(|err| ImpactError::DegenerateInput(err.to_string()))?;
        validation::validate_project(project)
            .map_err(|err| ImpactError::DegenerateInput(err.to_string()))?;
        if project.start_date.is_none() || project.end_date.is_none() {
            return Err(ImpactError::DegenerateInput(format!(
                "project {} requires a start and end date",
                project.id
            )));
        }

        let report = self.calculate_timeline_impact(project, resource_changes, resource_types);
        if !report.is_finite() {
            tracing::warn!(project = %project.id, "impact report contains degenerate values");
            return Err(ImpactError::DegenerateInput(format!(
                "impact for project {} is not finite ({})",
                project.id,
                report.to_cli_summary()
            )));
        }
        Ok(report)
    }

    /// Estimated duration in weeks, one decimal place.
    pub fn calculate_project_duration(&self, project: &Project, resource_types: &[ResourceType]) -> f64 {
        self.duration_breakdown(project, resource_types).duration
    }

    pub fn duration_breakdown(&self, project: &Project, resource_types: &[ResourceType]) -> DurationBreakdown {
        DurationEstimate::new(&self.config, resource_types).execute(project)
    }

    pub fn estimate_project_complexity(&self, project: &Project) -> f64 {
        estimate_project_complexity(project)
    }

    pub fn resource_efficiency(&self, allocated: u32, current_team_size: u32) -> f64 {
        TeamDynamics::new(&self.config).resource_efficiency(allocated, current_team_size)
    }

    pub fn team_size_factor(&self, team_size: u32) -> f64 {
        TeamDynamics::new(&self.config).team_size_factor(team_size)
    }

    /// Cost before and after the change, both over the project's current duration.
    pub fn calculate_cost_impact(
        &self,
        project: &Project,
        resource_changes: &ResourceChanges,
        resource_types: &[ResourceType],
    ) -> CostImpact {
        let original_duration = self.calculate_project_duration(project, resource_types);
        CostComparison::new(&project.resources, resource_changes, resource_types)
            .execute(original_duration)
    }

    pub fn assess_risk_factors(&self, project: &Project, resource_types: &[ResourceType]) -> Vec<Risk> {
        RiskAssessment::new(&self.config, resource_types).execute(&project.resources)
    }

    /// `start_date` plus `duration_weeks * 7` calendar days, fractional days dropped.
    pub fn calculate_new_end_date(start_date: NaiveDate, duration_weeks: f64) -> Option<NaiveDate> {
        let days = (duration_weeks * 7.0).trunc();
        if !days.is_finite() {
            return None;
        }
        Duration::try_days(days as i64).and_then(|delta| start_date.checked_add_signed(delta))
    }

    /// The project a caller stores when a simulated change is applied: merged
    /// allocations and the projected end date.
    pub fn apply_resource_changes(
        project: &Project,
        resource_changes: &ResourceChanges,
        report: &ImpactReport,
    ) -> Project {
        Project {
            resources: merge_resource_changes(&project.resources, resource_changes),
            end_date: report.new_end_date.or(project.end_date),
            ..project.clone()
        }
    }

    /// Duration for each candidate headcount of one resource type, other
    /// allocations unchanged.
    pub fn duration_curve(
        &self,
        project: &Project,
        resource_type_id: &str,
        resource_types: &[ResourceType],
        headcounts: RangeInclusive<u32>,
    ) -> Vec<(u32, f64)> {
        headcounts
            .map(|headcount| {
                let changes = ResourceChanges::from([(resource_type_id.to_string(), headcount)]);
                let candidate = Project {
                    resources: merge_resource_changes(&project.resources, &changes),
                    ..project.clone()
                };
                (headcount, self.calculate_project_duration(&candidate, resource_types))
            })
            .collect()
    }

    /// Current duration estimate of every project, in portfolio order.
    pub fn portfolio_durations(&self, portfolio: &Portfolio) -> Vec<(String, f64)> {
        portfolio
            .projects
            .par_iter()
            .map(|project| {
                (
                    project.id.clone(),
                    self.calculate_project_duration(project, &portfolio.resource_types),
                )
            })
            .collect()
    }
}

/// Copy of `resources` with `allocated` overridden for the ids present in both.
fn merge_resource_changes(resources: &ResourceMap, resource_changes: &ResourceChanges) -> ResourceMap {
    let mut merged = resources.clone();
    for (resource_type_id, &allocated) in resource_changes {
        if let Some(allocation) = merged.get_mut(resource_type_id) {
            allocation.allocated = allocated;
        }
    }
    merged
}
