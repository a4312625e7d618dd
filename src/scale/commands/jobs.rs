use crate::client::ScaleClient;
use crate::commands::label::job_type_from_dir;
use crate::commands::{validation_result, CmdMessage, CmdResult, ListRow};
use crate::error::Result;
use crate::loader;
use crate::model::JobData;
use std::path::Path;

pub fn list(client: &ScaleClient, name: Option<&str>) -> Result<CmdResult> {
    let job_types = client.list_job_types(name)?;
    let rows = job_types.iter().map(ListRow::from).collect();
    Ok(CmdResult::default().with_rows(rows))
}

pub fn get(client: &ScaleClient, id: i64) -> Result<CmdResult> {
    let job_type = client.get_job_type(id)?;
    Ok(CmdResult::default().with_record(serde_json::to_value(job_type)?))
}

pub fn validate(client: &ScaleClient, dir: &Path) -> Result<CmdResult> {
    let job_type = job_type_from_dir(dir)?;
    let warnings = client.validate_job_type(&job_type)?;
    Ok(validation_result(
        &format!("Job type {} {}", job_type.name, job_type.version),
        warnings,
    ))
}

/// Queues a job of type `job_type_id`, with inputs from `data` when given.
pub fn run(client: &ScaleClient, job_type_id: i64, data: Option<&Path>) -> Result<CmdResult> {
    let job_data: JobData = match data {
        Some(base) => loader::load_as(base)?,
        None => JobData::default(),
    };

    let location = client.queue_job(job_type_id, &job_data)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Job queued: {}", location)));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::with_client;
    use crate::commands::MessageLevel;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/job-types/"))
            .and(query_param("name", "ingest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1, "next": null, "previous": null,
                "results": [{"id": 1, "name": "ingest", "version": "1.0", "docker_image": "x"}]
            })))
            .mount(&server)
            .await;

        let result = with_client(server.uri(), |client| list(&client, Some("ingest")).unwrap()).await;
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].title, "ingest");
    }

    #[tokio::test]
    async fn test_validate_from_record() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("job_type.json"),
            r#"{"name": "ingest", "version": "1.0"}"#,
        )
        .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/job-types/validation/"))
            .and(body_partial_json(json!({"name": "ingest"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"warnings": []})))
            .mount(&server)
            .await;

        let job_dir = dir.path().to_path_buf();
        let result = with_client(server.uri(), move |client| validate(&client, &job_dir).unwrap()).await;
        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[0].content, "Job type ingest 1.0 is valid");
    }

    #[tokio::test]
    async fn test_run_with_data_record() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("data.yml"),
            "version: \"1.0\"\ninput_data:\n  - name: input_file\n    file_id: 4\n",
        )
        .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/queue/new-job/"))
            .and(body_json(json!({
                "job_type_id": 3,
                "job_data": {"version": "1.0", "input_data": [{"name": "input_file", "file_id": 4}]}
            })))
            .respond_with(ResponseTemplate::new(201).insert_header("Location", "/jobs/8/"))
            .mount(&server)
            .await;

        let data = dir.path().join("data");
        let result = with_client(server.uri(), move |client| run(&client, 3, Some(&data)).unwrap()).await;
        assert_eq!(result.messages[0].content, "Job queued: /jobs/8/");
    }
}
