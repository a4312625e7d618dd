use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaleError {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line} exceeds the {limit} byte line limit")]
    LineTooLong { line: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("No .json, .yml or .yaml file found for {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Both JSON and YAML files exist for {}; remove one", .0.display())]
    ConfigAmbiguous(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("{} has no {label} label to update", path.display())]
    LabelMissing { path: PathBuf, label: String },

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ScaleError {
    /// Process exit status for this error, applied once by the binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaleError::Parse { .. }
            | ScaleError::Json(_)
            | ScaleError::Yaml(_)
            | ScaleError::Template(_)
            | ScaleError::TemplateNotFound(_)
            | ScaleError::ConfigNotFound(_)
            | ScaleError::ConfigAmbiguous(_)
            | ScaleError::Config(_)
            | ScaleError::LabelMissing { .. }
            | ScaleError::InvalidInput(_) => 2,
            ScaleError::Http(_) | ScaleError::Api { .. } => 3,
            ScaleError::LineTooLong { .. } | ScaleError::Io(_) | ScaleError::Command(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaleError>;
