use crate::client::ScaleClient;
use crate::commands::{validation_result, CmdMessage, CmdResult, ListRow};
use crate::error::Result;
use crate::loader;
use crate::model::Strike;
use std::path::Path;

pub fn list(client: &ScaleClient) -> Result<CmdResult> {
    let strikes = client.list_strikes()?;
    let rows = strikes.iter().map(ListRow::from).collect();
    Ok(CmdResult::default().with_rows(rows))
}

pub fn get(client: &ScaleClient, id: i64) -> Result<CmdResult> {
    let strike = client.get_strike(id)?;
    Ok(CmdResult::default().with_record(serde_json::to_value(strike)?))
}

pub fn validate(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let strike: Strike = loader::load_as(record)?;
    let warnings = client.validate_strike(&strike)?;
    Ok(validation_result(&format!("Strike {}", strike.name), warnings))
}

pub fn create(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let strike: Strike = loader::load_as(record)?;
    let created = client.create_strike(&strike)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created strike {}{}",
        created.name,
        created.id.map(|id| format!(" (id {})", id)).unwrap_or_default()
    )));
    Ok(result.with_record(serde_json::to_value(created)?))
}

pub fn update(client: &ScaleClient, id: i64, record: &Path) -> Result<CmdResult> {
    let strike: Strike = loader::load_as(record)?;
    let updated = client.update_strike(id, &strike)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Updated strike {} (id {})",
        updated.name, id
    )));
    Ok(result.with_record(serde_json::to_value(updated)?))
}
