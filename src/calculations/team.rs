use crate::config::CalculatorConfig;

/// Headcount above which a single allocation sees diminishing returns.
const LARGE_ALLOCATION: u32 = 5;
const LARGE_ALLOCATION_PENALTY: f64 = 0.05;
const OVERSIZE_PENALTY: f64 = 0.05;
const MIN_EFFICIENCY: f64 = 0.1;
const MIN_TEAM_SIZE_FACTOR: f64 = 0.3;

pub struct TeamDynamics<'a> {
    config: &'a CalculatorConfig,
}

impl<'a> TeamDynamics<'a> {
    pub fn new(config: &'a CalculatorConfig) -> Self {
        Self { config }
    }

    /// Per-person efficiency of an allocation joining a team that already has
    /// `current_team_size` members.
    pub fn resource_efficiency(&self, allocated: u32, current_team_size: u32) -> f64 {
        let mut efficiency = 1.0;

        let communication_penalty =
            ((current_team_size as f64 - 2.0) * self.config.communication_overhead).max(0.0);
        efficiency -= communication_penalty;

        if allocated > LARGE_ALLOCATION {
            efficiency *= 1.0 - (allocated - LARGE_ALLOCATION) as f64 * LARGE_ALLOCATION_PENALTY;
        }

        efficiency.max(MIN_EFFICIENCY)
    }

    /// Brooks' Law throughput factor for the whole team.
    pub fn team_size_factor(&self, team_size: u32) -> f64 {
        if team_size == 0 {
            return 0.0;
        }
        if team_size <= self.config.optimal_team_size {
            return 1.0;
        }
        let oversize_penalty = (team_size - self.config.optimal_team_size) as f64 * OVERSIZE_PENALTY;
        (1.0 - oversize_penalty).max(MIN_TEAM_SIZE_FACTOR)
    }
}
