//! # API Facade
//!
//! [`ScaleApi`] is the single entry point UI code uses. It owns the resolved
//! settings and the container tool, builds the HTTP client on demand, and
//! dispatches to the command layer.
//!
//! The facade does no I/O of its own and no formatting: every method returns a
//! [`CmdResult`](crate::commands::CmdResult). It is generic over
//! [`ContainerTool`] so that tests can deploy without a container engine.
//!
//! Local operations (`init`, `label`, `config`) work without a server URL; the
//! remote ones fail with a configuration error when none is set.

use crate::client::ScaleClient;
use crate::commands::{self, CmdResult};
use crate::config::ScaleConfig;
use crate::docker::ContainerTool;
use crate::error::{Result, ScaleError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use crate::commands::config::ConfigAction;
pub use crate::commands::deploy::DeployOptions;
pub use crate::commands::init::InitOptions;

pub struct ScaleApi<T: ContainerTool> {
    config: ScaleConfig,
    config_dir: PathBuf,
    tool: T,
}

impl<T: ContainerTool> ScaleApi<T> {
    pub fn new(config: ScaleConfig, config_dir: PathBuf, tool: T) -> Self {
        Self {
            config,
            config_dir,
            tool,
        }
    }

    pub fn config(&self) -> &ScaleConfig {
        &self.config
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    fn client(&self) -> Result<ScaleClient> {
        let url = self.config.url.as_deref().ok_or_else(|| {
            ScaleError::Config(
                "No Scale URL configured. Use --url, SCALE_URL or `scale config url <URL>`"
                    .to_string(),
            )
        })?;
        ScaleClient::new(url, Duration::from_secs(self.config.timeout_secs))
    }

    /// Template search path: the configured one, else `<config dir>/templates`.
    fn template_search_path(&self) -> OsString {
        match &self.config.template_path {
            Some(path) => OsString::from(path),
            None => self
                .config_dir
                .join(crate::template::TEMPLATES_DIR)
                .into_os_string(),
        }
    }

    pub fn init_job(
        &self,
        target: &Path,
        template: Option<String>,
        force: bool,
        args: Vec<String>,
    ) -> Result<CmdResult> {
        let options = InitOptions {
            template,
            search_path: Some(self.template_search_path()),
            force,
            args,
        };
        commands::init::run(target, &options)
    }

    pub fn show_label(&self, dir: &Path) -> Result<CmdResult> {
        commands::label::show(dir)
    }

    pub fn set_label(&self, dir: &Path, record: &Path) -> Result<CmdResult> {
        commands::label::set(dir, record)
    }

    pub fn list_jobs(&self, name: Option<&str>) -> Result<CmdResult> {
        commands::jobs::list(&self.client()?, name)
    }

    pub fn get_job(&self, id: i64) -> Result<CmdResult> {
        commands::jobs::get(&self.client()?, id)
    }

    pub fn validate_job(&self, dir: &Path) -> Result<CmdResult> {
        commands::jobs::validate(&self.client()?, dir)
    }

    pub fn deploy_job(&self, dir: &Path, no_build: bool, no_push: bool) -> Result<CmdResult> {
        let options = DeployOptions {
            registry: self.config.registry.clone(),
            tag: self.config.tag.clone(),
            no_build,
            no_push,
        };
        commands::deploy::run(&self.client()?, &self.tool, dir, &options)
    }

    pub fn run_job(&self, job_type_id: i64, data: Option<&Path>) -> Result<CmdResult> {
        commands::jobs::run(&self.client()?, job_type_id, data)
    }

    pub fn list_recipes(&self) -> Result<CmdResult> {
        commands::recipes::list(&self.client()?)
    }

    pub fn get_recipe(&self, id: i64) -> Result<CmdResult> {
        commands::recipes::get(&self.client()?, id)
    }

    pub fn validate_recipe(&self, record: &Path) -> Result<CmdResult> {
        commands::recipes::validate(&self.client()?, record)
    }

    pub fn create_recipe(&self, record: &Path) -> Result<CmdResult> {
        commands::recipes::create(&self.client()?, record)
    }

    pub fn run_recipe(&self, recipe_type_id: i64, data: Option<&Path>) -> Result<CmdResult> {
        commands::recipes::run(&self.client()?, recipe_type_id, data)
    }

    pub fn list_workspaces(&self) -> Result<CmdResult> {
        commands::workspaces::list(&self.client()?)
    }

    pub fn get_workspace(&self, id: i64) -> Result<CmdResult> {
        commands::workspaces::get(&self.client()?, id)
    }

    pub fn validate_workspace(&self, record: &Path) -> Result<CmdResult> {
        commands::workspaces::validate(&self.client()?, record)
    }

    pub fn create_workspace(&self, record: &Path) -> Result<CmdResult> {
        commands::workspaces::create(&self.client()?, record)
    }

    pub fn update_workspace(&self, id: i64, record: &Path) -> Result<CmdResult> {
        commands::workspaces::update(&self.client()?, id, record)
    }

    pub fn list_strikes(&self) -> Result<CmdResult> {
        commands::strikes::list(&self.client()?)
    }

    pub fn get_strike(&self, id: i64) -> Result<CmdResult> {
        commands::strikes::get(&self.client()?, id)
    }

    pub fn validate_strike(&self, record: &Path) -> Result<CmdResult> {
        commands::strikes::validate(&self.client()?, record)
    }

    pub fn create_strike(&self, record: &Path) -> Result<CmdResult> {
        commands::strikes::create(&self.client()?, record)
    }

    pub fn update_strike(&self, id: i64, record: &Path) -> Result<CmdResult> {
        commands::strikes::update(&self.client()?, id, record)
    }

    pub fn config_action(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }
}
