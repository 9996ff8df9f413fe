use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame};
use portfolio_impact::{
    CalculatorConfig, ImpactCalculator, Portfolio, Project, ResourceChanges, logging,
    load_portfolio_from_json, monthly_resource_hours, parse_month, save_allocations_to_csv,
    save_portfolio_to_json,
};
use std::io::{self, Write};

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cell = |ci: usize, row_idx: usize| -> String {
        match columns[ci].get(row_idx) {
            Ok(AnyValue::Null) | Err(_) => String::new(),
            Ok(AnyValue::String(s)) => s.to_string(),
            Ok(AnyValue::Float64(v)) => format!("{:.1}", v),
            Ok(av) => av.to_string(),
        }
    };

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for ci in 0..columns.len() {
        for row_idx in 0..df.height() {
            widths[ci] = widths[ci].max(cell(ci, row_idx).len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[i]));
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for ci in 0..columns.len() {
            out.push_str(&format!(" {:>width$} |", cell(ci, row_idx), width = widths[ci]));
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  projects                           List projects with current duration estimates\n  types                              List resource types\n  select <project_id>                Select a project and clear pending changes\n  set <type_id> <count>              Stage a new allocated count for the selected project\n  reset                              Clear pending changes\n  impact                             Show the impact of pending changes\n  apply                              Write pending changes and new end date to the project\n  curve <type_id> <max>              Duration for 1..=max of one resource type\n  hours <YYYY-MM> <YYYY-MM>          Budgeted hours per month across the portfolio\n  config show                        Show calculator configuration\n  config load <json_path>            Load calculator configuration from JSON file\n  load <json_path>                   Load portfolio export\n  save <json_path>                   Save portfolio export\n  export csv <path>                  Write allocations to CSV\n  quit|exit                          Exit"
    );
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "n/a".to_string(), |date| date.to_string())
}

fn print_projects(portfolio: &Portfolio, calculator: &ImpactCalculator) {
    let durations = calculator.portfolio_durations(portfolio);
    for (project, (_, duration)) in portfolio.projects.iter().zip(durations) {
        println!(
            "  {:<10} {:<32} {:<6} {} .. {}  {:.1}w",
            project.id,
            project.name,
            project.priority.as_str(),
            display_date(project.start_date),
            display_date(project.end_date),
            duration
        );
    }
}

fn print_types(portfolio: &Portfolio) {
    for resource_type in &portfolio.resource_types {
        let capacity = resource_type
            .capacity
            .map_or_else(|| "-".to_string(), |capacity| capacity.to_string());
        println!(
            "  {:<14} {:<20} rate={:<8} capacity={}",
            resource_type.id, resource_type.name, resource_type.hourly_rate, capacity
        );
    }
}

fn print_allocations(project: &Project, changes: &ResourceChanges) {
    println!("{} ({})", project.name, project.id);
    for (type_id, allocation) in project.resources.iter() {
        let pending = match changes.get(type_id) {
            Some(n) if *n != allocation.allocated => format!(" -> {}", n),
            _ => String::new(),
        };
        println!(
            "  {:<14} required={} allocated={}{}",
            type_id, allocation.required, allocation.allocated, pending
        );
    }
}

fn print_impact(
    portfolio: &Portfolio,
    calculator: &ImpactCalculator,
    project: &Project,
    changes: &ResourceChanges,
) {
    let report = calculator.calculate_timeline_impact(project, changes, &portfolio.resource_types);
    println!("Impact: {}", report.to_cli_summary());
    for risk in &report.risk_factors {
        println!("  {}", risk);
    }
}

fn selected_project<'a>(portfolio: &'a Portfolio, selected: &Option<String>) -> Option<&'a Project> {
    selected.as_deref().and_then(|id| portfolio.find_project(id))
}

fn main() {
    let verbose = std::env::args().skip(1).any(|arg| arg == "-v" || arg == "--verbose");
    logging::init(verbose);

    let mut portfolio = Portfolio::sample();
    let mut calculator = ImpactCalculator::new();
    let mut selected: Option<String> = None;
    let mut changes = ResourceChanges::new();

    println!("Portfolio Impact (CLI) - type 'help' for commands\n");
    print_projects(&portfolio, &calculator);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "projects" => print_projects(&portfolio, &calculator),
            "types" => print_types(&portfolio),
            "select" => match parts.next() {
                Some(id) => match portfolio.find_project(id) {
                    Some(project) => {
                        selected = Some(project.id.clone());
                        changes.clear();
                        println!("Selected project {}.", project.id);
                        print_allocations(project, &changes);
                    }
                    None => println!("Project {} not found.", id),
                },
                None => println!("Usage: select <project_id>"),
            },
            "set" => {
                let Some(project) = selected_project(&portfolio, &selected) else {
                    println!("No project selected. Use 'select <project_id>'.");
                    continue;
                };
                match (parts.next(), parts.next()) {
                    (Some(type_id), Some(count_s)) => {
                        let count: u32 = match count_s.parse() {
                            Ok(v) => v,
                            Err(_) => {
                                println!("Invalid count");
                                continue;
                            }
                        };
                        if !project.resources.contains_key(type_id) {
                            println!("Project {} has no allocation for {}.", project.id, type_id);
                            continue;
                        }
                        changes.insert(type_id.to_string(), count);
                        print_impact(&portfolio, &calculator, project, &changes);
                    }
                    _ => println!("Usage: set <type_id> <count>"),
                }
            }
            "reset" => {
                changes.clear();
                println!("Pending changes cleared.");
            }
            "impact" => match selected_project(&portfolio, &selected) {
                Some(project) => {
                    print_allocations(project, &changes);
                    print_impact(&portfolio, &calculator, project, &changes);
                }
                None => println!("No project selected. Use 'select <project_id>'."),
            },
            "apply" => {
                let Some(project) = selected_project(&portfolio, &selected) else {
                    println!("No project selected. Use 'select <project_id>'.");
                    continue;
                };
                let report =
                    calculator.calculate_timeline_impact(project, &changes, &portfolio.resource_types);
                let updated = ImpactCalculator::apply_resource_changes(project, &changes, &report);
                let project_id = updated.id.clone();
                let end_date = display_date(updated.end_date);
                portfolio.replace_project(updated);
                changes.clear();
                println!("Applied changes to {} (end date {}).", project_id, end_date);
            }
            "curve" => {
                let Some(project) = selected_project(&portfolio, &selected) else {
                    println!("No project selected. Use 'select <project_id>'.");
                    continue;
                };
                match (parts.next(), parts.next().map(str::parse::<u32>)) {
                    (Some(type_id), Some(Ok(max))) if max >= 1 => {
                        let curve = calculator.duration_curve(
                            project,
                            type_id,
                            &portfolio.resource_types,
                            1..=max,
                        );
                        for (headcount, duration) in curve {
                            println!("  {:>3}  {:.1}w", headcount, duration);
                        }
                    }
                    _ => println!("Usage: curve <type_id> <max>"),
                }
            }
            "hours" => {
                let from = parts.next().and_then(parse_month);
                let to = parts.next().and_then(parse_month);
                match (from, to) {
                    (Some(from), Some(to)) => {
                        match monthly_resource_hours(&portfolio.projects, from, to) {
                            Ok(df) => println!("{}", render_df_as_text_table(&df)),
                            Err(e) => println!("Error computing hours: {}", e),
                        }
                    }
                    _ => println!("Usage: hours <YYYY-MM> <YYYY-MM>"),
                }
            }
            "config" => match parts.next() {
                Some("show") | None => match serde_json::to_string_pretty(calculator.config()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => println!("Error serializing config: {}", e),
                },
                Some("load") => match parts.next() {
                    Some(path) => match CalculatorConfig::from_json_file(path) {
                        Ok(config) => {
                            calculator.set_config(config);
                            println!("Config loaded from {}.", path);
                        }
                        Err(e) => println!("Error loading config: {}", e),
                    },
                    None => println!("Usage: config load <json_path>"),
                },
                Some(other) => {
                    println!("Unknown config command '{}'.", other);
                    println!("Usage: config show|load <json_path>");
                }
            },
            "save" => match parts.next() {
                Some(path) => match save_portfolio_to_json(&portfolio, path) {
                    Ok(_) => println!("Portfolio saved to {}.", path),
                    Err(e) => println!("Error saving portfolio: {}", e),
                },
                None => println!("Usage: save <json_path>"),
            },
            "load" => match parts.next() {
                Some(path) => match load_portfolio_from_json(path) {
                    Ok(loaded) => {
                        portfolio = loaded;
                        if selected_project(&portfolio, &selected).is_none() {
                            selected = None;
                        }
                        changes.clear();
                        println!("Portfolio loaded from {}.", path);
                        print_projects(&portfolio, &calculator);
                    }
                    Err(e) => println!("Error loading portfolio: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "export" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => match save_allocations_to_csv(&portfolio, path) {
                    Ok(_) => println!("Allocations exported to {}.", path),
                    Err(e) => println!("Error exporting allocations: {}", e),
                },
                _ => println!("Usage: export csv <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
}
