//! `jobs deploy`: publishes a job directory to Scale.
//!
//! 1. Load the `job_type` record and point its `docker_image` at the registry
//! 2. Embed the definition in the `Dockerfile` label
//! 3. Build and push the image (each step can be skipped)
//! 4. Create the job type, or update the one with the same name and version

use crate::client::ScaleClient;
use crate::commands::label::{dockerfile_path, write_label, JOB_TYPE_RECORD};
use crate::commands::{CmdMessage, CmdResult};
use crate::docker::ContainerTool;
use crate::error::{Result, ScaleError};
use crate::loader;
use crate::model::JobType;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    pub registry: Option<String>,
    pub tag: Option<String>,
    pub no_build: bool,
    pub no_push: bool,
}

/// `<registry>/<name>:<tag>`, the tag defaulting to the job type version.
pub fn image_name(registry: Option<&str>, job_type: &JobType, tag: Option<&str>) -> Result<String> {
    if job_type.name.trim().is_empty() {
        return Err(ScaleError::InvalidInput("job type has no name".to_string()));
    }
    let tag = tag.filter(|t| !t.is_empty()).unwrap_or(&job_type.version);
    if tag.is_empty() {
        return Err(ScaleError::InvalidInput(format!(
            "job type {} has no version and no tag was given",
            job_type.name
        )));
    }

    let repository = match registry.map(|r| r.trim_end_matches('/')).filter(|r| !r.is_empty()) {
        Some(registry) => format!("{}/{}", registry, job_type.name),
        None => job_type.name.clone(),
    };
    Ok(format!("{}:{}", repository, tag))
}

pub fn run<T: ContainerTool + ?Sized>(
    client: &ScaleClient,
    tool: &T,
    dir: &Path,
    options: &DeployOptions,
) -> Result<CmdResult> {
    let mut job_type: JobType = loader::load_as(&dir.join(JOB_TYPE_RECORD))?;
    let image = image_name(options.registry.as_deref(), &job_type, options.tag.as_deref())?;
    job_type.docker_image = image.clone();
    // Server-assigned ids never belong in the label
    job_type.id = None;

    let dockerfile = write_label(dir, &job_type)?;
    let mut result = CmdResult::default().with_written_paths(vec![dockerfile.clone()]);
    result.add_message(CmdMessage::info(format!(
        "Updated job type label in {}",
        dockerfile.display()
    )));

    if options.no_build {
        result.add_message(CmdMessage::info("Skipping image build"));
    } else {
        tool.build(dir, &dockerfile_path(dir), &image)?;
        result.add_message(CmdMessage::success(format!("Built {}", image)));
    }

    if options.no_push {
        result.add_message(CmdMessage::info("Skipping image push"));
    } else {
        tool.push(&image)?;
        result.add_message(CmdMessage::success(format!("Pushed {}", image)));
    }

    let registered = match client.find_job_type(&job_type.name, &job_type.version)? {
        Some(existing) => {
            let id = existing.id.ok_or_else(|| {
                ScaleError::InvalidInput(format!("server returned job type {} without an id", existing.name))
            })?;
            info!(id, name = %job_type.name, "updating job type");
            let updated = client.update_job_type(id, &job_type)?;
            result.add_message(CmdMessage::success(format!(
                "Updated job type {} {} (id {})",
                job_type.name, job_type.version, id
            )));
            updated
        }
        None => {
            info!(name = %job_type.name, "creating job type");
            let created = client.create_job_type(&job_type)?;
            result.add_message(CmdMessage::success(format!(
                "Created job type {} {}{}",
                job_type.name,
                job_type.version,
                created.id.map(|id| format!(" (id {})", id)).unwrap_or_default()
            )));
            created
        }
    };

    Ok(result.with_record(serde_json::to_value(registered)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::with_client;
    use crate::docker::{RecordingTool, ToolCall};
    use crate::label;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn job_type(name: &str, version: &str) -> JobType {
        JobType {
            name: name.into(),
            version: version.into(),
            ..JobType::default()
        }
    }

    fn job_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Dockerfile"),
            "FROM alpine\nLABEL com.ngageoint.scale.job-type=\"\" \\\n      maintainer=\"ops\"\nCOPY entryPoint.sh ./\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("job_type.yml"),
            "name: ingest\nversion: \"1.0\"\ninterface:\n  command: ./entryPoint.sh\n  command_arguments: \"${input_file}\"\n",
        )
        .unwrap();
        dir
    }

    async fn listing(server: &MockServer, results: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/job-types/"))
            .and(query_param("name", "ingest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1, "next": null, "previous": null, "results": results
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn test_image_name() {
        let jt = job_type("ingest", "1.0");
        assert_eq!(image_name(Some("reg:5000/"), &jt, None).unwrap(), "reg:5000/ingest:1.0");
        assert_eq!(image_name(Some("reg"), &jt, Some("dev")).unwrap(), "reg/ingest:dev");
        assert_eq!(image_name(None, &jt, Some("")).unwrap(), "ingest:1.0");
        assert!(matches!(
            image_name(None, &job_type("ingest", ""), None),
            Err(ScaleError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_deploy_creates_new_job_type() {
        let dir = job_dir();
        let server = MockServer::start().await;
        listing(&server, json!([])).await;
        Mock::given(method("POST"))
            .and(path("/job-types/"))
            .and(body_partial_json(json!({"docker_image": "reg/ingest:1.0"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 21, "name": "ingest", "version": "1.0", "docker_image": "reg/ingest:1.0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job_dir = dir.path().to_path_buf();
        let (result, calls) = with_client(server.uri(), move |client| {
            let tool = RecordingTool::new();
            let options = DeployOptions {
                registry: Some("reg".into()),
                ..DeployOptions::default()
            };
            let result = run(&client, &tool, &job_dir, &options).unwrap();
            (result, tool.calls())
        })
        .await;

        assert_eq!(result.record.unwrap()["id"], 21);
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], ToolCall::Build { image, .. } if image == "reg/ingest:1.0"));
        assert_eq!(calls[1], ToolCall::Push("reg/ingest:1.0".into()));

        // the label carries the image, the other label pair survives
        let dockerfile = dir.path().join("Dockerfile");
        let raw = label::get_field(&dockerfile, "LABEL", label::JOB_TYPE_LABEL)
            .unwrap()
            .unwrap();
        let embedded: JobType = serde_json::from_str(&raw).unwrap();
        assert_eq!(embedded.docker_image, "reg/ingest:1.0");
        assert_eq!(embedded.interface.command_arguments, "${input_file}");
        assert_eq!(
            label::get_field(&dockerfile, "LABEL", "maintainer").unwrap().as_deref(),
            Some("ops")
        );
    }

    #[tokio::test]
    async fn test_deploy_updates_existing_job_type() {
        let dir = job_dir();
        let server = MockServer::start().await;
        listing(
            &server,
            json!([{"id": 5, "name": "ingest", "version": "1.0", "docker_image": "old"}]),
        )
        .await;
        Mock::given(method("PATCH"))
            .and(path("/job-types/5/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "name": "ingest", "version": "1.0", "docker_image": "ingest:dev"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let job_dir = dir.path().to_path_buf();
        let (result, calls) = with_client(server.uri(), move |client| {
            let tool = RecordingTool::new();
            let options = DeployOptions {
                tag: Some("dev".into()),
                no_build: true,
                no_push: true,
                ..DeployOptions::default()
            };
            let result = run(&client, &tool, &job_dir, &options).unwrap();
            (result, tool.calls())
        })
        .await;

        assert!(calls.is_empty());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content == "Updated job type ingest 1.0 (id 5)"));
    }

    #[tokio::test]
    async fn test_deploy_stops_when_push_fails() {
        let dir = job_dir();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/job-types/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let job_dir = dir.path().to_path_buf();
        let err = with_client(server.uri(), move |client| {
            let tool = RecordingTool {
                fail_push: true,
                ..RecordingTool::default()
            };
            run(&client, &tool, &job_dir, &DeployOptions::default()).unwrap_err()
        })
        .await;
        assert!(matches!(err, ScaleError::Command(_)));
    }

    #[tokio::test]
    async fn test_deploy_requires_label_line() {
        let dir = job_dir();
        fs::write(dir.path().join("Dockerfile"), "FROM alpine\n").unwrap();
        let server = MockServer::start().await;

        let job_dir = dir.path().to_path_buf();
        let (err, calls) = with_client(server.uri(), move |client| {
            let tool = RecordingTool::new();
            let err = run(&client, &tool, &job_dir, &DeployOptions::default()).unwrap_err();
            (err, tool.calls())
        })
        .await;
        assert!(matches!(err, ScaleError::LabelMissing { .. }));
        assert!(calls.is_empty());
    }
}
