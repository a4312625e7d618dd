//! # Command Layer
//!
//! One module per command group. Each operation takes explicit inputs (paths,
//! client, container tool) and returns a [`CmdResult`]: structured data plus
//! user-facing messages. Nothing here writes to stdout or exits the process.

use crate::config::ScaleConfig;
use crate::model::{JobType, RecipeType, Strike, Warning, Workspace};
use serde_json::Value;
use std::path::PathBuf;

pub mod config;
pub mod deploy;
pub mod init;
pub mod jobs;
pub mod label;
pub mod recipes;
pub mod strikes;
pub mod workspaces;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One line of a resource listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: Option<i64>,
    pub name: String,
    pub version: String,
    pub title: String,
}

impl From<&JobType> for ListRow {
    fn from(jt: &JobType) -> Self {
        Self {
            id: jt.id,
            name: jt.name.clone(),
            version: jt.version.clone(),
            title: jt.display_title().to_string(),
        }
    }
}

impl From<&RecipeType> for ListRow {
    fn from(rt: &RecipeType) -> Self {
        Self {
            id: rt.id,
            name: rt.name.clone(),
            version: rt.version.clone(),
            title: rt.title.clone().unwrap_or_default(),
        }
    }
}

impl From<&Workspace> for ListRow {
    fn from(ws: &Workspace) -> Self {
        Self {
            id: ws.id,
            name: ws.name.clone(),
            version: String::new(),
            title: ws.title.clone().unwrap_or_default(),
        }
    }
}

impl From<&Strike> for ListRow {
    fn from(strike: &Strike) -> Self {
        Self {
            id: strike.id,
            name: strike.name.clone(),
            version: String::new(),
            title: strike.title.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub rows: Vec<ListRow>,
    /// A single resource or decoded label, rendered as pretty JSON
    pub record: Option<Value>,
    pub written_paths: Vec<PathBuf>,
    pub config: Option<ScaleConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_rows(mut self, rows: Vec<ListRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_written_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.written_paths = paths;
        self
    }

    pub fn with_config(mut self, config: ScaleConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Turns validation warnings into messages; a clean result gets a success line.
pub(crate) fn validation_result(subject: &str, warnings: Vec<Warning>) -> CmdResult {
    let mut result = CmdResult::default();
    if warnings.is_empty() {
        result.add_message(CmdMessage::success(format!("{} is valid", subject)));
        return result;
    }
    for warning in warnings {
        result.add_message(CmdMessage::warning(format!("{}: {}", warning.id, warning.details)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_result() {
        let clean = validation_result("Job type ingest", vec![]);
        assert_eq!(clean.messages.len(), 1);
        assert_eq!(clean.messages[0].level, MessageLevel::Success);

        let warned = validation_result(
            "x",
            vec![Warning {
                id: "media_type".into(),
                details: "unknown".into(),
            }],
        );
        assert_eq!(warned.messages[0].level, MessageLevel::Warning);
        assert_eq!(warned.messages[0].content, "media_type: unknown");
    }

    #[test]
    fn test_row_from_job_type_uses_title() {
        let jt = JobType {
            id: Some(2),
            name: "ingest".into(),
            version: "1.0".into(),
            title: Some("Ingest".into()),
            ..JobType::default()
        };
        let row = ListRow::from(&jt);
        assert_eq!(row.id, Some(2));
        assert_eq!(row.title, "Ingest");
    }
}
