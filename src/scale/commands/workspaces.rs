use crate::client::ScaleClient;
use crate::commands::{validation_result, CmdMessage, CmdResult, ListRow};
use crate::error::Result;
use crate::loader;
use crate::model::Workspace;
use std::path::Path;

pub fn list(client: &ScaleClient) -> Result<CmdResult> {
    let workspaces = client.list_workspaces()?;
    let rows = workspaces.iter().map(ListRow::from).collect();
    Ok(CmdResult::default().with_rows(rows))
}

pub fn get(client: &ScaleClient, id: i64) -> Result<CmdResult> {
    let workspace = client.get_workspace(id)?;
    Ok(CmdResult::default().with_record(serde_json::to_value(workspace)?))
}

pub fn validate(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let workspace: Workspace = loader::load_as(record)?;
    let warnings = client.validate_workspace(&workspace)?;
    Ok(validation_result(&format!("Workspace {}", workspace.name), warnings))
}

pub fn create(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let workspace: Workspace = loader::load_as(record)?;
    let created = client.create_workspace(&workspace)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created workspace {}{}",
        created.name,
        created.id.map(|id| format!(" (id {})", id)).unwrap_or_default()
    )));
    Ok(result.with_record(serde_json::to_value(created)?))
}

pub fn update(client: &ScaleClient, id: i64, record: &Path) -> Result<CmdResult> {
    let workspace: Workspace = loader::load_as(record)?;
    let updated = client.update_workspace(id, &workspace)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated workspace {} (id {})",
        updated.name, id
    )));
    Ok(result.with_record(serde_json::to_value(updated)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::with_client;
    use crate::commands::MessageLevel;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_validate_reports_warnings() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("workspace.json"),
            r#"{"name": "raw", "json_config": {"broker": {"type": "nfs"}}}"#,
        )
        .unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/workspaces/validation/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "warnings": [{"id": "broker", "details": "nfs_path is missing"}]
            })))
            .mount(&server)
            .await;

        let record = dir.path().join("workspace");
        let result = with_client(server.uri(), move |client| validate(&client, &record).unwrap()).await;
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.messages[0].content, "broker: nfs_path is missing");
    }

    #[tokio::test]
    async fn test_list_workspaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/workspaces/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 1, "next": null, "previous": null,
                "results": [{"id": 1, "name": "raw", "title": "Raw Data"}]
            })))
            .mount(&server)
            .await;

        let result = with_client(server.uri(), |client| list(&client).unwrap()).await;
        assert_eq!(result.rows[0].title, "Raw Data");
        assert_eq!(result.rows[0].version, "");
    }
}
