use chrono::NaiveDate;
use portfolio_impact::{
    CalculatorConfig, ImpactCalculator, ImpactError, Milestone, Portfolio, Priority, Project,
    ResourceAllocation, ResourceChanges, ResourceMap, ResourceType, RiskKind, Severity,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn changes(entries: &[(&str, u32)]) -> ResourceChanges {
    entries
        .iter()
        .map(|(id, n)| (id.to_string(), *n))
        .collect()
}

fn developer_catalog() -> Vec<ResourceType> {
    vec![ResourceType::new("developers", "Developers", 100.0, 20)]
}

/// 2025-01-01 .. 2025-03-31: 89 days, 13 weeks, complexity 130.
fn quarter_project(allocated: u32) -> Project {
    Project::new("q1", "Quarter", d(2025, 1, 1), d(2025, 3, 31))
        .with_resource("developers", ResourceAllocation::new(allocated, allocated))
}

fn scenario_project() -> Project {
    Project::new("p-e2e", "Scenario", d(2025, 1, 1), d(2025, 6, 30))
        .with_priority(Priority::High)
        .with_milestones(vec![Milestone::default()])
        .with_resource("developers", ResourceAllocation::new(4, 4).with_hours(640.0))
}

fn scenario_catalog() -> Vec<ResourceType> {
    vec![ResourceType::new("developers", "Developers", 100.0, 8)]
}

#[test]
fn repeated_calls_return_identical_reports() {
    let portfolio = Portfolio::sample();
    let calculator = ImpactCalculator::new();
    let project = portfolio.find_project("proj-002").unwrap();
    let delta = changes(&[("developers", 6), ("designers", 4)]);

    let first = calculator.calculate_timeline_impact(project, &delta, &portfolio.resource_types);
    let second = calculator.calculate_timeline_impact(project, &delta, &portfolio.resource_types);
    assert_eq!(first, second);
    assert_eq!(first.new_duration.to_bits(), second.new_duration.to_bits());
    assert_eq!(
        first.cost_impact.new_cost.to_bits(),
        second.cost_impact.new_cost.to_bits()
    );
}

#[test]
fn inputs_are_left_untouched() {
    let portfolio = Portfolio::sample();
    let project = portfolio.find_project("proj-001").unwrap().clone();
    let delta = changes(&[("developers", 8), ("unknown", 3)]);
    let types = portfolio.resource_types.clone();

    let (project_before, delta_before, types_before) = (project.clone(), delta.clone(), types.clone());
    let _ = ImpactCalculator::new().calculate_timeline_impact(&project, &delta, &types);

    assert_eq!(project, project_before);
    assert_eq!(delta, delta_before);
    assert_eq!(types, types_before);
}

#[test]
fn duration_falls_with_headcount_up_to_optimal_team_size() {
    let calculator = ImpactCalculator::new();
    let types = developer_catalog();

    let breakdown = calculator.duration_breakdown(&quarter_project(5), &types);
    assert_eq!(breakdown.original_weeks, 13.0);
    assert_eq!(breakdown.complexity, 130.0);

    let durations: Vec<f64> = (1..=7)
        .map(|n| calculator.calculate_project_duration(&quarter_project(n), &types))
        .collect();
    assert_eq!(durations, vec![130.0, 65.0, 43.3, 32.5, 26.0, 22.8, 20.6]);
    for pair in durations.windows(2) {
        assert!(pair[1] < pair[0], "{:?}", durations);
    }

    for n in 8..=12 {
        let breakdown = calculator.duration_breakdown(&quarter_project(n), &types);
        assert!(breakdown.team_size_factor < 1.0);
    }
    assert_eq!(
        calculator.calculate_project_duration(&quarter_project(12), &types),
        22.2
    );
    assert!(
        calculator.calculate_project_duration(&quarter_project(12), &types) > durations[6]
    );
}

#[test]
fn empty_allocation_map_raises_single_critical_risk() {
    let project = Project::new("empty", "Empty", d(2025, 1, 1), d(2025, 1, 8));
    let report = ImpactCalculator::new().calculate_timeline_impact(
        &project,
        &ResourceChanges::new(),
        &developer_catalog(),
    );

    assert_eq!(report.risk_factors.len(), 1);
    assert_eq!(report.risk_factors[0].kind, RiskKind::NoResources);
    assert_eq!(report.risk_factors[0].severity, Severity::Critical);
    // 10 complexity units over the 0.1 capacity floor.
    assert_eq!(report.original_duration, 100.0);
    assert_eq!(report.cost_impact.original_cost, 0.0);
    assert_eq!(report.cost_impact.percentage_change, 0.0);
}

#[test]
fn allocation_above_capacity_is_flagged() {
    let types = vec![ResourceType::new("designers", "Designers", 90.0, 3)];
    let project = Project::new("p", "P", d(2025, 1, 1), d(2025, 3, 31))
        .with_resource("designers", ResourceAllocation::new(5, 5));

    let report = ImpactCalculator::new().calculate_timeline_impact(&project, &ResourceChanges::new(), &types);
    let risk = report
        .risk_factors
        .iter()
        .find(|risk| risk.kind == RiskKind::OverAllocation)
        .expect("over-allocation risk");
    assert_eq!(risk.severity, Severity::High);
    assert_eq!(risk.message, "Designers: 5 allocated but only 3 available");
    assert!(!report.has_risk(RiskKind::UnderAllocation));
}

#[test]
fn no_changes_means_no_cost_delta() {
    let portfolio = Portfolio::sample();
    let calculator = ImpactCalculator::new();
    for project in &portfolio.projects {
        let report =
            calculator.calculate_timeline_impact(project, &ResourceChanges::new(), &portfolio.resource_types);
        assert_eq!(report.cost_impact.new_cost, report.cost_impact.original_cost);
        assert_eq!(report.cost_impact.cost_change, 0.0);
        assert_eq!(report.duration_change, 0.0);
    }
}

#[test]
fn doubling_developers_doubles_cost_at_fixed_duration() {
    let project = scenario_project();
    let report = ImpactCalculator::new().calculate_timeline_impact(
        &project,
        &changes(&[("developers", 8)]),
        &scenario_catalog(),
    );

    // 26 weeks * 10 * 1.2 (high) * 1.1 (one milestone) = 343.2 units.
    assert_eq!(report.original_duration, 85.8);
    assert_eq!(report.new_duration, 53.1);
    assert!((report.duration_change - (53.1 - 85.8)).abs() < 1e-9);
    assert_eq!(report.new_end_date, Some(d(2026, 1, 7)));

    assert_eq!(report.cost_impact.original_cost, 1_372_800.0);
    assert_eq!(report.cost_impact.new_cost, 2_745_600.0);
    assert_eq!(report.cost_impact.new_cost, 2.0 * report.cost_impact.original_cost);
    assert_eq!(report.cost_impact.cost_change, 1_372_800.0);
    assert_eq!(report.cost_impact.percentage_change, 100.0);
    assert!(report.risk_factors.is_empty());
}

#[test]
fn restating_current_allocations_changes_nothing() {
    let portfolio = Portfolio::sample();
    let calculator = ImpactCalculator::new();
    for project in &portfolio.projects {
        let same: ResourceChanges = project
            .resources
            .iter()
            .map(|(id, allocation)| (id.to_string(), allocation.allocated))
            .collect();
        let report = calculator.calculate_timeline_impact(project, &same, &portfolio.resource_types);
        assert_eq!(report.duration_change, 0.0, "{}", project.id);
        assert_eq!(report.percentage_change, 0.0, "{}", project.id);
        assert_eq!(report.cost_impact.cost_change, 0.0, "{}", project.id);
    }
}

#[test]
fn allocation_order_changes_duration() {
    let types = vec![
        ResourceType::new("developers", "Developers", 100.0, 8),
        ResourceType::new("designers", "Designers", 90.0, 3),
    ];
    let developers_first = Project::new("a", "A", d(2025, 1, 1), d(2025, 3, 31))
        .with_resource("developers", ResourceAllocation::new(4, 4))
        .with_resource("designers", ResourceAllocation::new(2, 2));
    let designers_first = Project::new("b", "B", d(2025, 1, 1), d(2025, 3, 31))
        .with_resource("designers", ResourceAllocation::new(2, 2))
        .with_resource("developers", ResourceAllocation::new(4, 4));

    let calculator = ImpactCalculator::new();
    assert_eq!(calculator.calculate_project_duration(&developers_first, &types), 23.2);
    assert_eq!(calculator.calculate_project_duration(&designers_first, &types), 21.7);
}

#[test]
fn changes_for_unallocated_types_are_ignored() {
    let project = scenario_project();
    let report = ImpactCalculator::new().calculate_timeline_impact(
        &project,
        &changes(&[("designers", 3)]),
        &scenario_catalog(),
    );
    assert_eq!(report.duration_change, 0.0);
    assert_eq!(report.cost_impact.cost_change, 0.0);
}

#[test]
fn change_to_zero_removes_cost_and_capacity() {
    let project = scenario_project();
    let report = ImpactCalculator::new().calculate_timeline_impact(
        &project,
        &changes(&[("developers", 0)]),
        &scenario_catalog(),
    );
    assert_eq!(report.cost_impact.new_cost, 0.0);
    assert_eq!(report.cost_impact.percentage_change, -100.0);
    assert_eq!(report.new_duration, 3432.0);
    assert!(report.has_risk(RiskKind::NoResources));
    assert!(report.has_risk(RiskKind::UnderAllocation));
}

#[test]
fn oversized_team_is_flagged_after_allocation_risks() {
    let types = vec![
        ResourceType::new("developers", "Developers", 100.0, 20),
        ResourceType::new("qa", "QA Engineers", 85.0, 2),
    ];
    let project = Project::new("big", "Big", d(2025, 1, 1), d(2025, 6, 30))
        .with_resource("developers", ResourceAllocation::new(12, 12))
        .with_resource("qa", ResourceAllocation::new(4, 3));

    let report = ImpactCalculator::new().calculate_timeline_impact(&project, &ResourceChanges::new(), &types);
    let kinds: Vec<RiskKind> = report.risk_factors.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![RiskKind::OverAllocation, RiskKind::UnderAllocation, RiskKind::TeamSize]
    );
    assert_eq!(report.highest_severity(), Some(Severity::High));
}

#[test]
fn smaller_optimal_team_size_lengthens_duration() {
    let types = developer_catalog();
    let default_calc = ImpactCalculator::new();
    let tight = ImpactCalculator::with_config(CalculatorConfig::default().with_optimal_team_size(3));

    let project = quarter_project(6);
    assert!(
        tight.calculate_project_duration(&project, &types)
            > default_calc.calculate_project_duration(&project, &types)
    );
}

#[test]
fn strict_mode_accepts_sample_portfolio() {
    let portfolio = Portfolio::sample();
    let calculator = ImpactCalculator::new();
    for project in &portfolio.projects {
        let report = calculator
            .try_calculate_timeline_impact(project, &changes(&[("developers", 5)]), &portfolio.resource_types)
            .unwrap();
        assert!(report.is_finite());
    }
}

#[test]
fn strict_mode_rejects_bad_rates_and_config() {
    let project = scenario_project();
    let calculator = ImpactCalculator::new();

    let bad_types = vec![ResourceType::new("developers", "Developers", f64::NAN, 8)];
    let err = calculator
        .try_calculate_timeline_impact(&project, &ResourceChanges::new(), &bad_types)
        .unwrap_err();
    assert!(matches!(err, ImpactError::DegenerateInput(_)));

    let bad_config = ImpactCalculator::with_config(
        CalculatorConfig::default().with_communication_overhead(f64::INFINITY),
    );
    let err = bad_config
        .try_calculate_timeline_impact(&project, &ResourceChanges::new(), &scenario_catalog())
        .unwrap_err();
    assert!(matches!(err, ImpactError::InvalidConfig(_)));
}

#[test]
fn permissive_mode_degrades_instead_of_failing() {
    let project = scenario_project();
    let bad_types = vec![ResourceType::new("developers", "Developers", f64::NAN, 8)];
    let report =
        ImpactCalculator::new().calculate_timeline_impact(&project, &ResourceChanges::new(), &bad_types);
    assert!(report.cost_impact.original_cost.is_nan());
    assert!(!report.is_finite());
}

#[test]
fn zero_length_project_still_takes_a_week() {
    let project = Project::new("same-day", "Same day", d(2025, 5, 1), d(2025, 5, 1))
        .with_resource("developers", ResourceAllocation::new(2, 2));
    let report = ImpactCalculator::new().calculate_timeline_impact(
        &project,
        &changes(&[("developers", 4)]),
        &developer_catalog(),
    );
    assert_eq!(report.original_duration, 1.0);
    assert_eq!(report.new_duration, 1.0);
    assert_eq!(report.percentage_change, 0.0);
    assert_eq!(report.new_end_date, Some(d(2025, 5, 8)));
}

#[test]
fn applying_changes_writes_allocations_and_end_date() {
    let project = scenario_project();
    let delta = changes(&[("developers", 8)]);
    let report = ImpactCalculator::new().calculate_timeline_impact(&project, &delta, &scenario_catalog());

    let applied = ImpactCalculator::apply_resource_changes(&project, &delta, &report);
    assert_eq!(applied.end_date, Some(d(2026, 1, 7)));
    assert_eq!(applied.start_date, project.start_date);
    assert_eq!(
        applied.resources.get("developers"),
        Some(&ResourceAllocation::new(4, 8).with_hours(640.0))
    );
    assert_eq!(project.resources.get("developers").map(|a| a.allocated), Some(4));

    let mut portfolio = Portfolio::new(vec![project], Vec::new(), scenario_catalog());
    assert!(portfolio.replace_project(applied.clone()));
    assert_eq!(portfolio.find_project("p-e2e"), Some(&applied));
}

#[test]
fn duration_curve_walks_each_headcount() {
    let calculator = ImpactCalculator::new();
    let curve = calculator.duration_curve(&quarter_project(2), "developers", &developer_catalog(), 1..=4);
    assert_eq!(curve, vec![(1, 130.0), (2, 65.0), (3, 43.3), (4, 32.5)]);

    let flat = calculator.duration_curve(&quarter_project(2), "designers", &developer_catalog(), 1..=3);
    assert!(flat.iter().all(|(_, duration)| *duration == 65.0));
}

#[test]
fn portfolio_durations_follow_portfolio_order() {
    let portfolio = Portfolio::sample();
    let calculator = ImpactCalculator::new();
    let durations = calculator.portfolio_durations(&portfolio);

    let ids: Vec<&str> = durations.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["proj-001", "proj-002", "proj-003", "proj-004"]);
    for (project, (_, duration)) in portfolio.projects.iter().zip(&durations) {
        assert_eq!(
            *duration,
            calculator.calculate_project_duration(project, &portfolio.resource_types)
        );
    }
}

#[test]
fn json_allocations_keep_document_order_and_coalesce_numbers() {
    let json = r#"{
        "id": "p-json",
        "name": "From export",
        "startDate": "2025-01-01",
        "endDate": "2025-03-31",
        "priority": "High",
        "milestones": null,
        "resources": {
            "designers": {"required": 2, "allocated": 2, "hours": null},
            "developers": {"required": 4.7, "allocated": 4, "hours": -10},
            "qa": {"allocated": -3}
        }
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();

    assert_eq!(project.priority, Priority::Medium);
    assert!(project.milestones.is_empty());
    assert_eq!(
        project.resources.keys().collect::<Vec<_>>(),
        vec!["designers", "developers", "qa"]
    );
    assert_eq!(project.resources.get("developers"), Some(&ResourceAllocation::new(4, 4)));
    assert_eq!(project.resources.get("qa"), Some(&ResourceAllocation::new(0, 0)));

    let types = vec![
        ResourceType::new("developers", "Developers", 100.0, 8),
        ResourceType::new("designers", "Designers", 90.0, 3),
    ];
    // Designers first: 2 + 4 * 1.0 = 6 effective people.
    assert_eq!(ImpactCalculator::new().calculate_project_duration(&project, &types), 21.7);

    let round_trip: ResourceMap =
        serde_json::from_str(&serde_json::to_string(&project.resources).unwrap()).unwrap();
    assert_eq!(round_trip, project.resources);
}

#[test]
fn undated_project_degrades_to_one_week_without_end_date() {
    let mut project = scenario_project();
    project.start_date = None;
    let calculator = ImpactCalculator::new();
    let delta = changes(&[("developers", 8)]);

    let report = calculator.calculate_timeline_impact(&project, &delta, &scenario_catalog());
    assert_eq!(report.original_duration, 1.0);
    assert_eq!(report.new_duration, 1.0);
    assert_eq!(report.new_end_date, None);
    assert_eq!(report.cost_impact.new_cost, 2.0 * report.cost_impact.original_cost);

    let applied = ImpactCalculator::apply_resource_changes(&project, &delta, &report);
    assert_eq!(applied.end_date, project.end_date);

    let err = calculator
        .try_calculate_timeline_impact(&project, &delta, &scenario_catalog())
        .unwrap_err();
    assert!(matches!(err, ImpactError::DegenerateInput(ref msg) if msg.contains("date")));

    project.start_date = Some(d(2025, 1, 1));
    project.end_date = None;
    assert!(
        calculator
            .try_calculate_timeline_impact(&project, &delta, &scenario_catalog())
            .is_err()
    );
}
