use crate::project::Project;
use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;

/// Parses a `YYYY-MM` label into the first day of that month.
pub fn parse_month(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d").ok()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Budgeted hours per calendar month across a set of projects.
///
/// A project contributes the sum of its allocation hours to every month whose
/// first day falls inside `[start_date, end_date]`; undated projects
/// contribute nothing. Columns: `month` (`YYYY-MM`)
/// and `hours`.
pub fn monthly_resource_hours(
    projects: &[Project],
    first_month: NaiveDate,
    last_month: NaiveDate,
) -> Result<DataFrame, PolarsError> {
    let last_month = first_of_month(last_month);
    let mut month = first_of_month(first_month);

    let mut labels: Vec<String> = Vec::new();
    let mut hours: Vec<f64> = Vec::new();

    while month <= last_month {
        let total: f64 = projects
            .iter()
            .filter(|project| match (project.start_date, project.end_date) {
                (Some(start), Some(end)) => start <= month && month <= end,
                _ => false,
            })
            .map(|project| project.resources.total_hours())
            .sum();
        labels.push(month.format("%Y-%m").to_string());
        hours.push(total);

        month = match month.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    df!(
        "month" => labels,
        "hours" => hours
    )
}
