use super::{PersistenceError, PersistenceResult, PortfolioStore};
use crate::calculations::cost::weekly_cost;
use crate::project::{Project, ValueStream};
use crate::resource::{ResourceAllocation, ResourceType, find_resource_type};
use crate::validation;
use crate::Portfolio;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioExport<'a> {
    projects: &'a [Project],
    value_streams: &'a [ValueStream],
    resource_types: &'a [ResourceType],
    export_date: String,
    version: &'a str,
}

impl<'a> PortfolioExport<'a> {
    fn from_portfolio(portfolio: &'a Portfolio) -> PersistenceResult<Self> {
        super::validate_portfolio(portfolio)?;
        Ok(Self {
            projects: &portfolio.projects,
            value_streams: &portfolio.value_streams,
            resource_types: &portfolio.resource_types,
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: EXPORT_VERSION,
        })
    }
}

/// Export files from any version are accepted as long as the three
/// collections are present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioImport {
    projects: Option<Vec<Project>>,
    value_streams: Option<Vec<ValueStream>>,
    resource_types: Option<Vec<ResourceType>>,
}

impl PortfolioImport {
    fn into_portfolio(self) -> PersistenceResult<Portfolio> {
        let (Some(projects), Some(value_streams), Some(resource_types)) =
            (self.projects, self.value_streams, self.resource_types)
        else {
            return Err(PersistenceError::InvalidData(
                "export file requires projects, valueStreams and resourceTypes".into(),
            ));
        };
        let portfolio = Portfolio::new(projects, value_streams, resource_types);
        super::validate_portfolio(&portfolio)?;
        Ok(portfolio)
    }
}

pub fn export_portfolio_json(portfolio: &Portfolio) -> PersistenceResult<String> {
    let export = PortfolioExport::from_portfolio(portfolio)?;
    Ok(serde_json::to_string_pretty(&export)?)
}

pub fn import_portfolio_json(json: &str) -> PersistenceResult<Portfolio> {
    let import: PortfolioImport = serde_json::from_str(json)?;
    let portfolio = import.into_portfolio()?;
    tracing::info!(
        projects = portfolio.projects.len(),
        value_streams = portfolio.value_streams.len(),
        resource_types = portfolio.resource_types.len(),
        "imported portfolio"
    );
    Ok(portfolio)
}

pub fn save_portfolio_to_json<P: AsRef<Path>>(portfolio: &Portfolio, path: P) -> PersistenceResult<()> {
    let export = PortfolioExport::from_portfolio(portfolio)?;
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.flush()?;
    tracing::info!(path = %path.as_ref().display(), "saved portfolio");
    Ok(())
}

pub fn load_portfolio_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Portfolio> {
    let json = fs::read_to_string(path)?;
    import_portfolio_json(&json)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AllocationCsvRecord {
    project_id: String,
    project_name: String,
    resource_type_id: String,
    required: u32,
    allocated: u32,
    hours: f64,
    /// Empty for resource types missing from the catalog.
    #[serde(default)]
    hourly_rate: Option<f64>,
    #[serde(default)]
    weekly_cost: Option<f64>,
}

impl AllocationCsvRecord {
    fn new(
        project: &Project,
        resource_type_id: &str,
        allocation: &ResourceAllocation,
        resource_type: Option<&ResourceType>,
    ) -> Self {
        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            resource_type_id: resource_type_id.to_string(),
            required: allocation.required,
            allocated: allocation.allocated,
            hours: allocation.hours,
            hourly_rate: resource_type.map(|rt| rt.hourly_rate),
            weekly_cost: resource_type.map(|rt| weekly_cost(allocation.allocated, rt)),
        }
    }

    fn allocation(&self) -> ResourceAllocation {
        ResourceAllocation::new(self.required, self.allocated).with_hours(self.hours)
    }
}

/// One row per project allocation, in portfolio and allocation order.
pub fn save_allocations_to_csv<P: AsRef<Path>>(portfolio: &Portfolio, path: P) -> PersistenceResult<()> {
    super::validate_portfolio(portfolio)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for project in &portfolio.projects {
        for (resource_type_id, allocation) in project.resources.iter() {
            let resource_type = find_resource_type(&portfolio.resource_types, resource_type_id);
            writer.serialize(AllocationCsvRecord::new(
                project,
                resource_type_id,
                allocation,
                resource_type,
            ))?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes allocation rows back onto the matching projects. Returns the
/// number of rows applied.
pub fn load_allocations_from_csv<P: AsRef<Path>>(
    portfolio: &mut Portfolio,
    path: P,
) -> PersistenceResult<usize> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for record in reader.deserialize::<AllocationCsvRecord>() {
        let record = record?;
        if record.resource_type_id.trim().is_empty() {
            return Err(PersistenceError::InvalidData(format!(
                "allocation for project {} requires a resource_type_id",
                record.project_id
            )));
        }
        if portfolio.find_project(&record.project_id).is_none() {
            return Err(PersistenceError::InvalidData(format!(
                "allocation references unknown project {}",
                record.project_id
            )));
        }
        records.push(record);
    }

    // Rows land on copies first so a bad row leaves the portfolio untouched.
    let mut updated: Vec<Project> = Vec::new();
    for record in &records {
        let position = match updated.iter().position(|p| p.id == record.project_id) {
            Some(position) => position,
            None => match portfolio.find_project(&record.project_id) {
                Some(project) => {
                    updated.push(project.clone());
                    updated.len() - 1
                }
                None => continue,
            },
        };
        updated[position]
            .resources
            .insert(record.resource_type_id.clone(), record.allocation());
    }

    for project in &updated {
        validation::validate_project(project)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    }
    for project in updated {
        portfolio.replace_project(project);
    }
    Ok(records.len())
}

/// Portfolio kept in a single JSON export file.
pub struct JsonPortfolioStore {
    path: PathBuf,
}

impl JsonPortfolioStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PortfolioStore for JsonPortfolioStore {
    fn save_portfolio(&self, portfolio: &Portfolio) -> PersistenceResult<()> {
        save_portfolio_to_json(portfolio, &self.path)
    }

    fn load_portfolio(&self) -> PersistenceResult<Option<Portfolio>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_portfolio_from_json(&self.path).map(Some)
    }
}
