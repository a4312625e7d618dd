use crate::commands::{CmdMessage, CmdResult};
use crate::config::ScaleConfig;
use crate::error::{Result, ScaleError};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = ScaleConfig::load(config_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = ScaleConfig::load(config_dir)?;
            let value = config
                .get(&key)
                .ok_or_else(|| ScaleError::Config(format!("Unknown config key: {}", key)))?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = ScaleConfig::load(config_dir)?;
            config.set(&key, &value)?;
            config.save(config_dir)?;

            let display_val = config
                .get(&key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "(unset)".to_string());
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            Ok(result)
        }
    }
}
