use crate::project::{Milestone, Priority, Project, ValueStream};
use crate::resource::{ResourceAllocation, ResourceType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the planning tool exports: projects, value streams, and the resource catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub projects: Vec<Project>,
    pub value_streams: Vec<ValueStream>,
    pub resource_types: Vec<ResourceType>,
}

impl Portfolio {
    pub fn new(
        projects: Vec<Project>,
        value_streams: Vec<ValueStream>,
        resource_types: Vec<ResourceType>,
    ) -> Self {
        Self {
            projects,
            value_streams,
            resource_types,
        }
    }

    pub fn find_project(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == project_id)
    }

    /// Replaces the project with the same id. Returns `false` when no such project exists.
    pub fn replace_project(&mut self, project: Project) -> bool {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                *existing = project;
                true
            }
            None => false,
        }
    }

    pub fn projects_in_stream<'a>(&'a self, value_stream_id: &'a str) -> impl Iterator<Item = &'a Project> {
        self.projects
            .iter()
            .filter(move |p| p.value_stream_id.as_deref() == Some(value_stream_id))
    }

    /// Earliest start and latest end across all dated projects.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.projects.iter().filter_map(|p| p.start_date).min()?;
        let end = self.projects.iter().filter_map(|p| p.end_date).max()?;
        Some((start, end))
    }

    /// Demo portfolio the CLI starts with.
    pub fn sample() -> Self {
        let value_streams = vec![
            stream("tech-platform", "Technology Platform", "#8B5CF6"),
            stream("customer-experience", "Customer Experience", "#06B6D4"),
            stream("data-analytics", "Data & Analytics", "#10B981"),
            stream("infrastructure", "Infrastructure", "#F59E0B"),
        ];

        let resource_types = vec![
            ResourceType::new("developers", "Developers", 100.0, 8).with_color("#3B82F6"),
            ResourceType::new("designers", "Designers", 90.0, 3).with_color("#EC4899"),
            ResourceType::new("qa", "QA Engineers", 85.0, 4).with_color("#10B981"),
            ResourceType::new("dataEngineers", "Data Engineers", 110.0, 4).with_color("#F59E0B"),
            ResourceType::new("analysts", "Business Analysts", 80.0, 6).with_color("#06B6D4"),
        ];

        let projects = vec![
            Project::new(
                "proj-001",
                "API Gateway Modernization",
                date(2025, 1, 1),
                date(2025, 6, 30),
            )
            .with_value_stream("tech-platform")
            .with_priority(Priority::High)
            .with_resource("developers", ResourceAllocation::new(4, 4).with_hours(640.0))
            .with_resource("architects", ResourceAllocation::new(1, 1))
            .with_resource("devops", ResourceAllocation::new(2, 2))
            .with_milestones(vec![
                Milestone::new("ms-001", "Architecture Design Complete", date(2025, 2, 15)),
                Milestone::new("ms-002", "MVP Implementation", date(2025, 4, 15)),
                Milestone::new("ms-003", "Production Deployment", date(2025, 6, 15)),
            ]),
            Project::new("proj-002", "Mobile App Redesign", date(2025, 2, 1), date(2025, 8, 31))
                .with_value_stream("customer-experience")
                .with_priority(Priority::High)
                .with_resource("developers", ResourceAllocation::new(4, 3).with_hours(480.0))
                .with_resource("designers", ResourceAllocation::new(2, 2).with_hours(320.0))
                .with_resource("pm", ResourceAllocation::new(1, 1))
                .with_milestones(vec![
                    Milestone::new("ms-004", "UX Research Complete", date(2025, 3, 1)),
                    Milestone::new("ms-005", "Design System Ready", date(2025, 4, 1)),
                    Milestone::new("ms-006", "Beta Release", date(2025, 7, 1)),
                    Milestone::new("ms-007", "App Store Launch", date(2025, 8, 15)),
                ]),
            Project::new(
                "proj-003",
                "Real-time Analytics Platform",
                date(2025, 3, 1),
                date(2025, 9, 30),
            )
            .with_value_stream("data-analytics")
            .with_resource("developers", ResourceAllocation::new(3, 2).with_hours(320.0))
            .with_resource("dataEngineers", ResourceAllocation::new(2, 2).with_hours(320.0))
            .with_resource("analysts", ResourceAllocation::new(1, 1).with_hours(160.0))
            .with_milestones(vec![
                Milestone::new("ms-008", "Data Pipeline Setup", date(2025, 4, 15)),
                Milestone::new("ms-009", "Dashboard MVP", date(2025, 6, 30)),
                Milestone::new("ms-010", "Advanced Analytics", date(2025, 9, 15)),
            ]),
            Project::new(
                "proj-004",
                "Customer Portal Enhancement",
                date(2025, 4, 1),
                date(2025, 7, 31),
            )
            .with_value_stream("customer-experience")
            .with_priority(Priority::Low)
            .with_resource("developers", ResourceAllocation::new(3, 2).with_hours(320.0))
            .with_resource("designers", ResourceAllocation::new(1, 1).with_hours(160.0))
            .with_resource("qa", ResourceAllocation::new(1, 0)),
        ];

        Self::new(projects, value_streams, resource_types)
    }
}

fn stream(id: &str, name: &str, color: &str) -> ValueStream {
    let mut stream = ValueStream::new(id, name);
    stream.color = color.to_string();
    stream
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid sample date")
}
