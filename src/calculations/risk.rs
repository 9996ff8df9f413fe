use crate::config::CalculatorConfig;
use crate::report::{Risk, RiskKind, Severity};
use crate::resource::{ResourceMap, ResourceType, find_resource_type};

pub struct RiskAssessment<'a> {
    config: &'a CalculatorConfig,
    resource_types: &'a [ResourceType],
}

impl<'a> RiskAssessment<'a> {
    pub fn new(config: &'a CalculatorConfig, resource_types: &'a [ResourceType]) -> Self {
        Self {
            config,
            resource_types,
        }
    }

    /// Risks in allocation order (over- then under-allocation per entry),
    /// followed by the team-wide checks.
    pub fn execute(&self, resources: &ResourceMap) -> Vec<Risk> {
        let mut risks = Vec::new();
        let mut total_team_size: u32 = 0;

        for (resource_type_id, allocation) in resources.iter() {
            total_team_size = total_team_size.saturating_add(allocation.allocated);

            let resource_type = find_resource_type(self.resource_types, resource_type_id);
            // No capacity on the catalog entry means nothing to exceed.
            if let Some((rt, capacity)) =
                resource_type.and_then(|rt| rt.capacity.map(|capacity| (rt, capacity)))
            {
                if allocation.allocated > capacity {
                    risks.push(Risk::new(
                        RiskKind::OverAllocation,
                        Severity::High,
                        format!(
                            "{}: {} allocated but only {} available",
                            rt.name, allocation.allocated, capacity
                        ),
                    ));
                }
            }

            if allocation.required > allocation.allocated {
                let label = resource_type
                    .map(|rt| rt.name.as_str())
                    .filter(|name| !name.is_empty())
                    .unwrap_or(resource_type_id);
                risks.push(Risk::new(
                    RiskKind::UnderAllocation,
                    Severity::Medium,
                    format!(
                        "{}: {} required but only {} allocated",
                        label, allocation.required, allocation.allocated
                    ),
                ));
            }
        }

        if total_team_size > self.config.optimal_team_size.saturating_mul(2) {
            risks.push(Risk::new(
                RiskKind::TeamSize,
                Severity::High,
                format!(
                    "Team size ({}) may be too large, causing communication overhead",
                    total_team_size
                ),
            ));
        }

        if total_team_size == 0 {
            risks.push(Risk::new(
                RiskKind::NoResources,
                Severity::Critical,
                "No resources allocated to project",
            ));
        }

        risks
    }
}
