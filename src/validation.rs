use crate::portfolio::Portfolio;
use crate::project::Project;
use crate::resource::ResourceType;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn validate_resource_type(resource_type: &ResourceType) -> Result<(), ValidationError> {
    if resource_type.id.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "resource type '{}' requires a non-empty id",
            resource_type.name
        )));
    }
    if !resource_type.hourly_rate.is_finite() || resource_type.hourly_rate < 0.0 {
        return Err(ValidationError::new(format!(
            "resource type {} has invalid hourly rate {}",
            resource_type.id, resource_type.hourly_rate
        )));
    }
    Ok(())
}

pub fn validate_resource_types(resource_types: &[ResourceType]) -> Result<(), ValidationError> {
    let mut seen_ids = HashSet::with_capacity(resource_types.len());
    for resource_type in resource_types {
        if !seen_ids.insert(resource_type.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate resource type id {}",
                resource_type.id
            )));
        }
        validate_resource_type(resource_type)?;
    }
    Ok(())
}

/// Checks the numbers the impact model reads. The model tolerates missing or
/// inverted dates and unknown resource type ids, so those pass.
pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.id.trim().is_empty() {
        return Err(ValidationError::new(format!(
            "project '{}' requires a non-empty id",
            project.name
        )));
    }
    for (resource_type_id, allocation) in project.resources.iter() {
        if resource_type_id.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "project {} has an allocation with an empty resource type id",
                project.id
            )));
        }
        if !allocation.hours.is_finite() || allocation.hours < 0.0 {
            return Err(ValidationError::new(format!(
                "project {} allocation for '{}' has invalid hours {}",
                project.id, resource_type_id, allocation.hours
            )));
        }
    }
    Ok(())
}

pub fn validate_portfolio(portfolio: &Portfolio) -> Result<(), ValidationError> {
    validate_resource_types(&portfolio.resource_types)?;

    let mut stream_ids = HashSet::with_capacity(portfolio.value_streams.len());
    for stream in &portfolio.value_streams {
        if !stream_ids.insert(stream.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate value stream id {}",
                stream.id
            )));
        }
    }

    let mut project_ids = HashSet::with_capacity(portfolio.projects.len());
    for project in &portfolio.projects {
        if !project_ids.insert(project.id.as_str()) {
            return Err(ValidationError::new(format!(
                "duplicate project id {}",
                project.id
            )));
        }
        validate_project(project)?;
    }
    Ok(())
}
