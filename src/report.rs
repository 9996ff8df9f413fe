use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskKind {
    OverAllocation,
    UnderAllocation,
    TeamSize,
    NoResources,
}

impl RiskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskKind::OverAllocation => "over-allocation",
            RiskKind::UnderAllocation => "under-allocation",
            RiskKind::TeamSize => "team-size",
            RiskKind::NoResources => "no-resources",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(rename = "type")]
    pub kind: RiskKind,
    pub severity: Severity,
    pub message: String,
}

impl Risk {
    pub fn new(kind: RiskKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Risk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.severity.as_str(), self.kind.as_str(), self.message)
    }
}

/// Cost comparison at a fixed duration, so only the staffing rate differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostImpact {
    pub original_cost: f64,
    pub new_cost: f64,
    pub cost_change: f64,
    pub percentage_change: f64,
}

/// Result of simulating an allocation change. Durations are in weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub original_duration: f64,
    pub new_duration: f64,
    pub duration_change: f64,
    pub percentage_change: f64,
    /// `None` when the new duration cannot be placed on the calendar.
    pub new_end_date: Option<NaiveDate>,
    pub cost_impact: CostImpact,
    pub risk_factors: Vec<Risk>,
}

impl ImpactReport {
    pub fn highest_severity(&self) -> Option<Severity> {
        self.risk_factors.iter().map(|risk| risk.severity).max()
    }

    pub fn has_risk(&self, kind: RiskKind) -> bool {
        self.risk_factors.iter().any(|risk| risk.kind == kind)
    }

    /// Every number in the report is finite and the end date exists.
    pub fn is_finite(&self) -> bool {
        [
            self.original_duration,
            self.new_duration,
            self.duration_change,
            self.percentage_change,
            self.cost_impact.original_cost,
            self.cost_impact.new_cost,
            self.cost_impact.cost_change,
            self.cost_impact.percentage_change,
        ]
        .iter()
        .all(|v| v.is_finite())
            && self.new_end_date.is_some()
    }

    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!(
            "duration={:.1}w->{:.1}w ({:+.1}w, {:+.1}%)",
            self.original_duration, self.new_duration, self.duration_change, self.percentage_change
        ));
        match self.new_end_date {
            Some(date) => parts.push(format!("end={}", date)),
            None => parts.push("end=n/a".to_string()),
        }
        parts.push(format!(
            "cost={:.0}->{:.0} ({:+.0}, {:+.1}%)",
            self.cost_impact.original_cost,
            self.cost_impact.new_cost,
            self.cost_impact.cost_change,
            self.cost_impact.percentage_change
        ));
        if !self.risk_factors.is_empty() {
            parts.push(format!("risks={}", self.risk_factors.len()));
        }
        parts.join(", ")
    }
}
