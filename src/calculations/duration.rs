use super::complexity::{estimate_project_complexity, original_weeks};
use super::round_to_tenth;
use super::team::TeamDynamics;
use crate::config::CalculatorConfig;
use crate::project::Project;
use crate::resource::{ResourceType, find_resource_type};
use serde::Serialize;

const MIN_DURATION_WEEKS: f64 = 1.0;
const MIN_EFFECTIVE_CAPACITY: f64 = 0.1;

/// Intermediate values of one duration estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBreakdown {
    pub original_weeks: f64,
    pub complexity: f64,
    pub team_size: u32,
    pub effective_resources: f64,
    pub team_size_factor: f64,
    pub effective_capacity: f64,
    /// Weeks, one decimal place.
    pub duration: f64,
}

pub struct DurationEstimate<'a> {
    config: &'a CalculatorConfig,
    resource_types: &'a [ResourceType],
}

impl<'a> DurationEstimate<'a> {
    pub fn new(config: &'a CalculatorConfig, resource_types: &'a [ResourceType]) -> Self {
        Self {
            config,
            resource_types,
        }
    }

    pub fn execute(&self, project: &Project) -> DurationBreakdown {
        let complexity = estimate_project_complexity(project);
        let team = TeamDynamics::new(self.config);

        let mut effective_resources = 0.0;
        let mut team_size: u32 = 0;

        // Each allocation's efficiency sees only the members added before it.
        for (resource_type_id, allocation) in project.resources.iter() {
            if allocation.allocated == 0
                || find_resource_type(self.resource_types, resource_type_id).is_none()
            {
                continue;
            }
            let efficiency = team.resource_efficiency(allocation.allocated, team_size);
            effective_resources += allocation.allocated as f64 * efficiency;
            team_size = team_size.saturating_add(allocation.allocated);
        }

        let team_size_factor = team.team_size_factor(team_size);
        let effective_capacity = effective_resources * team_size_factor;
        let duration = (complexity / effective_capacity.max(MIN_EFFECTIVE_CAPACITY))
            .max(MIN_DURATION_WEEKS);

        DurationBreakdown {
            original_weeks: original_weeks(project),
            complexity,
            team_size,
            effective_resources,
            team_size_factor,
            effective_capacity,
            duration: round_to_tenth(duration),
        }
    }
}
