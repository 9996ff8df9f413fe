use super::round_half_up;
use crate::report::CostImpact;
use crate::resource::{ResourceChanges, ResourceMap, ResourceType, find_resource_type};

pub const HOURS_PER_WEEK: f64 = 40.0;

/// Compares staffing cost before and after a change over the same number of
/// weeks, isolating the rate effect from the timeline effect.
pub struct CostComparison<'a> {
    resources: &'a ResourceMap,
    resource_changes: &'a ResourceChanges,
    resource_types: &'a [ResourceType],
}

impl<'a> CostComparison<'a> {
    pub fn new(
        resources: &'a ResourceMap,
        resource_changes: &'a ResourceChanges,
        resource_types: &'a [ResourceType],
    ) -> Self {
        Self {
            resources,
            resource_changes,
            resource_types,
        }
    }

    pub fn execute(&self, duration_weeks: f64) -> CostImpact {
        let mut original_cost = 0.0;
        let mut new_cost = 0.0;

        for (resource_type_id, allocation) in self.resources.iter() {
            let Some(resource_type) = find_resource_type(self.resource_types, resource_type_id)
            else {
                continue;
            };

            original_cost += weekly_cost(allocation.allocated, resource_type) * duration_weeks;

            let new_allocated = self
                .resource_changes
                .get(resource_type_id)
                .copied()
                .unwrap_or(allocation.allocated);
            new_cost += weekly_cost(new_allocated, resource_type) * duration_weeks;
        }

        CostImpact {
            original_cost: round_half_up(original_cost),
            new_cost: round_half_up(new_cost),
            cost_change: round_half_up(new_cost - original_cost),
            percentage_change: if original_cost > 0.0 {
                (new_cost - original_cost) / original_cost * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Cost of `headcount` people of one type for a 40 hour week.
pub fn weekly_cost(headcount: u32, resource_type: &ResourceType) -> f64 {
    headcount as f64 * resource_type.hourly_rate * HOURS_PER_WEEK
}
