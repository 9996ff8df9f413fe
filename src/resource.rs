use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Proposed `allocated` headcount per resource type id.
pub type ResourceChanges = HashMap<String, u32>;

/// Catalog entry for a category of staffable capacity (developers, designers, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceType {
    /// Unique key referenced by project allocations.
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Currency per hour. Negative or missing values are read as zero.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub hourly_rate: f64,
    /// Maximum number of people that can be allocated concurrently. `None`
    /// when the catalog entry has no capacity field, which disables the
    /// over-allocation check for the type.
    #[serde(
        default,
        deserialize_with = "deserialize_capacity",
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity: Option<u32>,
    /// Display only.
    #[serde(default)]
    pub color: String,
}

impl ResourceType {
    pub fn new(id: impl Into<String>, name: impl Into<String>, hourly_rate: f64, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hourly_rate,
            capacity: Some(capacity),
            color: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Looks up a resource type by id. Catalogs are small, so a linear scan is fine.
pub fn find_resource_type<'a>(resource_types: &'a [ResourceType], id: &str) -> Option<&'a ResourceType> {
    resource_types.iter().find(|rt| rt.id == id)
}

/// How one resource type is budgeted and staffed on one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceAllocation {
    /// Desired headcount.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub required: u32,
    /// Headcount actually assigned.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub allocated: u32,
    /// Total hours budgeted for the resource on the project.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub hours: f64,
}

impl ResourceAllocation {
    pub fn new(required: u32, allocated: u32) -> Self {
        Self {
            required,
            allocated,
            hours: 0.0,
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.hours = hours;
        self
    }
}

/// Allocations keyed by resource type id, kept in insertion order.
///
/// The duration model walks allocations with a running team size, so the
/// iteration order is part of the result. Serialization writes a JSON object
/// in that order and deserialization keeps document order; a repeated key
/// replaces the earlier value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceMap {
    entries: Vec<(String, ResourceAllocation)>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, resource_type_id: &str) -> Option<&ResourceAllocation> {
        self.entries
            .iter()
            .find(|(id, _)| id == resource_type_id)
            .map(|(_, allocation)| allocation)
    }

    pub fn get_mut(&mut self, resource_type_id: &str) -> Option<&mut ResourceAllocation> {
        self.entries
            .iter_mut()
            .find(|(id, _)| id == resource_type_id)
            .map(|(_, allocation)| allocation)
    }

    pub fn contains_key(&self, resource_type_id: &str) -> bool {
        self.get(resource_type_id).is_some()
    }

    /// Inserts or replaces in place. Returns the previous allocation, if any.
    pub fn insert(
        &mut self,
        resource_type_id: impl Into<String>,
        allocation: ResourceAllocation,
    ) -> Option<ResourceAllocation> {
        let resource_type_id = resource_type_id.into();
        match self.get_mut(&resource_type_id) {
            Some(existing) => Some(std::mem::replace(existing, allocation)),
            None => {
                self.entries.push((resource_type_id, allocation));
                None
            }
        }
    }

    pub fn remove(&mut self, resource_type_id: &str) -> Option<ResourceAllocation> {
        let idx = self.entries.iter().position(|(id, _)| id == resource_type_id)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceAllocation)> {
        self.entries
            .iter()
            .map(|(id, allocation)| (id.as_str(), allocation))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Sum of `allocated` across every entry, known to the catalog or not.
    pub fn total_allocated(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, (_, allocation)| acc.saturating_add(allocation.allocated))
    }

    pub fn total_hours(&self) -> f64 {
        self.entries.iter().map(|(_, allocation)| allocation.hours).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, ResourceAllocation)> for ResourceMap {
    fn from_iter<T: IntoIterator<Item = (K, ResourceAllocation)>>(iter: T) -> Self {
        let mut map = ResourceMap::new();
        for (id, allocation) in iter {
            map.insert(id, allocation);
        }
        map
    }
}

impl Serialize for ResourceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, allocation) in &self.entries {
            map.serialize_entry(id, allocation)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResourceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResourceMapVisitor;

        impl<'de> Visitor<'de> for ResourceMapVisitor {
            type Value = ResourceMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of resource type ids to allocations")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(ResourceMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ResourceMap::new();
                while let Some((id, allocation)) =
                    access.next_entry::<String, ResourceAllocation>()?
                {
                    map.insert(id, allocation);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_any(ResourceMapVisitor)
    }
}

/// Reads a headcount. Missing, `null`, negative and non-finite values become 0;
/// fractional values are truncated.
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v.is_finite() && v > 0.0 => v.trunc() as u32,
        _ => 0,
    })
}

/// A present capacity field reads like a headcount, so `null` and negative
/// values become `Some(0)`. An absent field stays `None` via `#[serde(default)]`.
fn deserialize_capacity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_count(deserializer).map(Some)
}

/// Reads a non-negative amount (hours, rates). Missing, `null` and negative values become 0.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if v > 0.0 => v,
        _ => 0.0,
    })
}
