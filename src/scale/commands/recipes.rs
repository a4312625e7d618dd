use crate::client::ScaleClient;
use crate::commands::{validation_result, CmdMessage, CmdResult, ListRow};
use crate::error::Result;
use crate::loader;
use crate::model::RecipeType;
use serde_json::Value;
use std::path::Path;

pub fn list(client: &ScaleClient) -> Result<CmdResult> {
    let recipe_types = client.list_recipe_types()?;
    let rows = recipe_types.iter().map(ListRow::from).collect();
    Ok(CmdResult::default().with_rows(rows))
}

pub fn get(client: &ScaleClient, id: i64) -> Result<CmdResult> {
    let recipe_type = client.get_recipe_type(id)?;
    Ok(CmdResult::default().with_record(serde_json::to_value(recipe_type)?))
}

pub fn validate(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let recipe_type: RecipeType = loader::load_as(record)?;
    let warnings = client.validate_recipe_type(&recipe_type)?;
    Ok(validation_result(
        &format!("Recipe type {}", recipe_type.name),
        warnings,
    ))
}

pub fn create(client: &ScaleClient, record: &Path) -> Result<CmdResult> {
    let recipe_type: RecipeType = loader::load_as(record)?;
    let created = client.create_recipe_type(&recipe_type)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Created recipe type {}{}",
        created.name,
        created.id.map(|id| format!(" (id {})", id)).unwrap_or_default()
    )));
    Ok(result.with_record(serde_json::to_value(created)?))
}

/// Queues a recipe with the data stored under `data`, or an empty data set.
pub fn run(client: &ScaleClient, recipe_type_id: i64, data: Option<&Path>) -> Result<CmdResult> {
    let recipe_data = match data {
        Some(base) => loader::load_record(base)?,
        None => Value::Object(Default::default()),
    };

    let location = client.queue_recipe(recipe_type_id, &recipe_data)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Recipe queued: {}", location)));
    Ok(result)
}
