use crate::resource::{ResourceAllocation, ResourceMap};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Only exact `high` and `low` change complexity; any other value reads as medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Multiplier applied to a project's base complexity.
    pub fn complexity_factor(&self) -> f64 {
        match self {
            Priority::High => 1.2,
            Priority::Low => 0.8,
            Priority::Medium => 1.0,
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .and_then(Priority::from_str)
            .unwrap_or_default())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the number of milestones feeds the model; the fields are carried for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_rock_ids: Vec<String>,
}

impl Milestone {
    pub fn new(id: impl Into<String>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            date: Some(date),
            status: None,
            linked_rock_ids: Vec::new(),
        }
    }
}

/// Planning unit placed on the portfolio timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_stream_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `None` when the export carries `null`, nothing, or an unreadable date.
    #[serde(default, deserialize_with = "deserialize_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, deserialize_with = "deserialize_milestones")]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub resources: ResourceMap,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value_stream_id: None,
            description: None,
            status: None,
            start_date: Some(start_date),
            end_date: Some(end_date),
            priority: Priority::default(),
            milestones: Vec::new(),
            resources: ResourceMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_milestones(mut self, milestones: Vec<Milestone>) -> Self {
        self.milestones = milestones;
        self
    }

    pub fn with_resource(mut self, resource_type_id: impl Into<String>, allocation: ResourceAllocation) -> Self {
        self.resources.insert(resource_type_id, allocation);
        self
    }

    pub fn with_value_stream(mut self, value_stream_id: impl Into<String>) -> Self {
        self.value_stream_id = Some(value_stream_id.into());
        self
    }

    /// Calendar days between start and end; negative when the dates are
    /// inverted, `None` when either date is missing.
    pub fn span_days(&self) -> Option<i64> {
        Some((self.end_date? - self.start_date?).num_days())
    }
}

/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps. Anything else reads as no date.
fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|timestamp| timestamp.date_naive())
    });
    if date.is_none() {
        tracing::warn!(value, "unreadable project date, treating as missing");
    }
    Ok(date)
}

fn deserialize_milestones<'de, D>(deserializer: D) -> Result<Vec<Milestone>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Milestone>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueStream {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
}

impl ValueStream {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: String::new(),
            description: String::new(),
        }
    }
}
