use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Tunable constants of the impact model, held per calculator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorConfig {
    /// Efficiency lost per team member beyond the second.
    #[serde(default = "default_communication_overhead")]
    pub communication_overhead: f64,
    /// Efficiency loss for new team members. Not used by any formula.
    #[serde(default = "default_ramp_up_time")]
    pub ramp_up_time: f64,
    /// Team size above which the Brooks' Law penalty applies.
    #[serde(default = "default_optimal_team_size")]
    pub optimal_team_size: u32,
}

fn default_communication_overhead() -> f64 {
    0.1
}

fn default_ramp_up_time() -> f64 {
    0.2
}

fn default_optimal_team_size() -> u32 {
    7
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            communication_overhead: default_communication_overhead(),
            ramp_up_time: default_ramp_up_time(),
            optimal_team_size: default_optimal_team_size(),
        }
    }
}

impl CalculatorConfig {
    pub fn with_communication_overhead(mut self, overhead: f64) -> Self {
        self.communication_overhead = overhead;
        self
    }

    pub fn with_optimal_team_size(mut self, size: u32) -> Self {
        self.optimal_team_size = size;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads a config file; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::persistence::PersistenceResult<Self> {
        let file = File::open(path.as_ref())?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config
            .validate()
            .map_err(|err| crate::persistence::PersistenceError::InvalidData(err.to_string()))?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded calculator config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.communication_overhead.is_finite() || self.communication_overhead < 0.0 {
            return Err(ValidationError::new(format!(
                "communicationOverhead must be a finite non-negative number (got {})",
                self.communication_overhead
            )));
        }
        if !self.ramp_up_time.is_finite() || self.ramp_up_time < 0.0 {
            return Err(ValidationError::new(format!(
                "rampUpTime must be a finite non-negative number (got {})",
                self.ramp_up_time
            )));
        }
        Ok(())
    }
}
