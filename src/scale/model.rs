//! Wire shapes exchanged with the Scale REST API.
//!
//! Optional fields are skipped when unset so that definitions written by hand
//! round-trip without gaining nulls. Fields this client does not model are kept
//! in `extra` and sent back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_long_running: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_code: Option<String>,
    #[serde(default)]
    pub docker_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scheduled: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tries: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus_required: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_required: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_out_const_required: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_out_mult_required: Option<f64>,
    #[serde(default)]
    pub interface: JobTypeInterface,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_mapping: Option<ErrorMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_rule: Option<TriggerRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobType {
    /// Display name used in listings: the title when present.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTypeInterface {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub command_arguments: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_data: Vec<InputData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_data: Vec<OutputData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_resources: Vec<SharedResource>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputData {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorMapping {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub exit_codes: std::collections::BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub configuration: Value,
}

/// Inputs and outputs for a queued job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_data: Vec<JobInputData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_data: Vec<JobOutputData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInputData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutputData {
    pub name: String,
    pub workspace_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewJob<'a> {
    pub job_type_id: i64,
    pub job_data: &'a JobData,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRecipe<'a> {
    pub recipe_type_id: i64,
    pub recipe_data: &'a Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub definition: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_rule: Option<TriggerRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub json_config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An ingest process watching a location for new files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strike {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub configuration: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub details: String,
}

/// Body of a validation endpoint. Older servers answer with a single `detail`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationResponse {
    #[serde(default)]
    pub warnings: Vec<Warning>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ValidationResponse {
    pub fn into_warnings(self) -> Vec<Warning> {
        let mut warnings = self.warnings;
        if let Some(detail) = self.detail.filter(|d| !d.is_empty()) {
            warnings.push(Warning {
                id: "detail".to_string(),
                details: detail,
            });
        }
        warnings
    }
}
