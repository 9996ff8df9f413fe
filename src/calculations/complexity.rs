use crate::project::Project;

/// Complexity units per planned week.
const UNITS_PER_WEEK: f64 = 10.0;
const MILESTONE_WEIGHT: f64 = 0.1;

/// Planned span in whole weeks, rounded up. Zero when a date is missing.
pub fn original_weeks(project: &Project) -> f64 {
    project
        .span_days()
        .map_or(0.0, |days| (days as f64 / 7.0).ceil())
}

/// Effort estimate derived from the planned span, priority, and milestone count.
pub fn estimate_project_complexity(project: &Project) -> f64 {
    let mut complexity = original_weeks(project) * UNITS_PER_WEEK;
    complexity *= project.priority.complexity_factor();
    complexity *= 1.0 + project.milestones.len() as f64 * MILESTONE_WEIGHT;
    complexity
}
