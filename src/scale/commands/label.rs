//! `jobs label`: shows or writes the job type definition embedded in a job
//! directory's `Dockerfile`.

use crate::commands::{CmdMessage, CmdResult};
use crate::dockerfile::LABEL;
use crate::error::{Result, ScaleError};
use crate::label::{self, JOB_TYPE_LABEL};
use crate::loader;
use crate::model::JobType;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DOCKERFILE: &str = "Dockerfile";
pub const JOB_TYPE_RECORD: &str = "job_type";

pub fn dockerfile_path(dir: &Path) -> PathBuf {
    dir.join(DOCKERFILE)
}

fn missing(path: &Path) -> ScaleError {
    ScaleError::LabelMissing {
        path: path.to_path_buf(),
        label: JOB_TYPE_LABEL.to_string(),
    }
}

/// Decoded label text, `None` when the label exists but is empty.
fn read_label(dir: &Path) -> Result<Option<String>> {
    let path = dockerfile_path(dir);
    let raw = label::get_field(&path, LABEL, JOB_TYPE_LABEL)?.ok_or_else(|| missing(&path))?;
    Ok(Some(raw).filter(|r| !r.trim().is_empty()))
}

pub fn show(dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match read_label(dir)? {
        Some(raw) => {
            let value: Value = serde_json::from_str(&raw)?;
            result = result.with_record(value);
        }
        None => result.add_message(CmdMessage::info(format!(
            "The {} label in {} is empty",
            JOB_TYPE_LABEL,
            dockerfile_path(dir).display()
        ))),
    }
    Ok(result)
}

/// Writes the job type stored under `record` into the label.
pub fn set(dir: &Path, record: &Path) -> Result<CmdResult> {
    let job_type: JobType = loader::load_as(record)?;
    let path = write_label(dir, &job_type)?;

    let mut result = CmdResult::default().with_written_paths(vec![path.clone()]);
    result.add_message(CmdMessage::success(format!(
        "Wrote {} {} to {}",
        job_type.name,
        job_type.version,
        path.display()
    )));
    Ok(result)
}

/// Serializes `value` as compact JSON into the label. Fails when the
/// `Dockerfile` has no label line to update.
pub(crate) fn write_label<T: Serialize>(dir: &Path, value: &T) -> Result<PathBuf> {
    let path = dockerfile_path(dir);
    let json = serde_json::to_string(value)?;
    if !label::set_field(&path, LABEL, JOB_TYPE_LABEL, &json)? {
        return Err(missing(&path));
    }
    Ok(path)
}

/// The job type of a job directory: the label when filled in, else the
/// `job_type` record next to the `Dockerfile`.
pub(crate) fn job_type_from_dir(dir: &Path) -> Result<JobType> {
    let from_label = match read_label(dir) {
        Ok(label) => label,
        Err(ScaleError::LabelMissing { .. }) | Err(ScaleError::Io(_)) => None,
        Err(e) => return Err(e),
    };
    match from_label {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => loader::load_as(&dir.join(JOB_TYPE_RECORD)),
    }
}
