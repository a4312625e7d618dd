//! Loads definition records (job types, job data, workspaces, ...) from a base
//! name that may exist as `<base>.json`, `<base>.yml` or `<base>.yaml`.

use crate::error::{Result, ScaleError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const JSON_EXT: &str = "json";
const YAML_EXTS: [&str; 2] = ["yml", "yaml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

/// Finds the single file backing `base`.
///
/// A base that already names an existing file with a known extension is used
/// as is.
pub fn resolve(base: &Path) -> Result<(PathBuf, Format)> {
    if base.is_file() {
        if let Some(format) = format_of(base) {
            return Ok((base.to_path_buf(), format));
        }
    }

    let candidate = |ext: &str| {
        let mut name = base.as_os_str().to_owned();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    };

    let json = Some(candidate(JSON_EXT)).filter(|p| p.is_file());
    let yamls: Vec<PathBuf> = YAML_EXTS
        .iter()
        .map(|ext| candidate(ext))
        .filter(|p| p.is_file())
        .collect();

    match (json, yamls.as_slice()) {
        (None, []) => Err(ScaleError::ConfigNotFound(base.to_path_buf())),
        (Some(json), []) => Ok((json, Format::Json)),
        (None, [yaml]) => Ok((yaml.clone(), Format::Yaml)),
        _ => Err(ScaleError::ConfigAmbiguous(base.to_path_buf())),
    }
}

fn format_of(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case(JSON_EXT) {
        Some(Format::Json)
    } else if YAML_EXTS.iter().any(|y| ext.eq_ignore_ascii_case(y)) {
        Some(Format::Yaml)
    } else {
        None
    }
}

/// Loads the record behind `base` as a generic JSON value.
pub fn load_record(base: &Path) -> Result<Value> {
    let (path, format) = resolve(base)?;
    debug!(path = %path.display(), ?format, "loading record");
    let content = fs::read_to_string(&path)?;
    let value = match format {
        Format::Json => serde_json::from_str(&content)?,
        Format::Yaml => serde_yaml::from_str(&content)?,
    };
    Ok(value)
}

/// Loads the record behind `base` into a typed structure.
pub fn load_as<T: DeserializeOwned>(base: &Path) -> Result<T> {
    let value = load_record(base)?;
    Ok(serde_json::from_value(value)?)
}
