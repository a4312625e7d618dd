//! # CLI Layer
//!
//! The only place that knows about terminal I/O and logging setup.
//!
//! - `run()`: parses arguments, installs logging, dispatches
//! - `init_context()`: resolves settings (file, environment, flags) into a [`ScaleApi`]
//! - `handle_*()`: call the API and print the result
//!
//! Exit codes are applied by `main` from the returned error.

use super::render::{print_config, print_messages, print_record, print_rows};
use super::setup::{Cli, Commands, DefinitionCommands, JobCommands, RecipeCommands};
use clap::Parser;
use scale::api::{ConfigAction, ScaleApi};
use scale::commands::CmdResult;
use scale::config::{self, Overrides, ScaleConfig};
use scale::docker::Docker;
use scale::error::{Result, ScaleError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: ScaleApi<Docker>,
}

/// Which definition resource a shared subcommand targets.
#[derive(Debug, Clone, Copy)]
enum Definition {
    Workspace,
    Strike,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::Jobs(cmd) => handle_jobs(&ctx, cmd),
        Commands::Recipes(cmd) => handle_recipes(&ctx, cmd),
        Commands::Workspaces(cmd) => handle_definitions(&ctx, Definition::Workspace, cmd),
        Commands::Strikes(cmd) => handle_definitions(&ctx, Definition::Strike, cmd),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
    }
}

/// Logs go to stderr: `RUST_LOG` when set, else `warn` (`debug` with `-v`).
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => config::default_config_dir().ok_or_else(|| {
            ScaleError::Config("Could not determine the user config directory".to_string())
        })?,
    };
    debug!(config_dir = %config_dir.display(), "loading settings");

    let template_path = match &cli.command {
        Commands::Jobs(JobCommands::Init { template_path, .. }) => template_path.clone(),
        _ => None,
    };
    let overrides = Overrides {
        url: cli.url.clone(),
        registry: cli.registry.clone(),
        tag: cli.tag.clone(),
        template_path,
        timeout_secs: cli.timeout,
    };
    let config = ScaleConfig::load(&config_dir)?.with_overrides(overrides);

    Ok(AppContext {
        api: ScaleApi::new(config, config_dir, Docker::from_env()),
    })
}

fn handle_jobs(ctx: &AppContext, cmd: JobCommands) -> Result<()> {
    let result = match cmd {
        JobCommands::Init {
            dir,
            template,
            force,
            args,
            ..
        } => ctx.api.init_job(&dir, template, force, args)?,
        JobCommands::List { name } => ctx.api.list_jobs(name.as_deref())?,
        JobCommands::Get { id } => ctx.api.get_job(id)?,
        JobCommands::Label { dir, set } => match set {
            Some(record) => ctx.api.set_label(&dir.dir, &record)?,
            None => ctx.api.show_label(&dir.dir)?,
        },
        JobCommands::Validate { dir } => ctx.api.validate_job(&dir.dir)?,
        JobCommands::Deploy {
            dir,
            no_build,
            no_push,
        } => ctx.api.deploy_job(&dir.dir, no_build, no_push)?,
        JobCommands::Run { job_type_id, data } => {
            ctx.api.run_job(job_type_id, data.as_deref())?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_recipes(ctx: &AppContext, cmd: RecipeCommands) -> Result<()> {
    let result = match cmd {
        RecipeCommands::List => ctx.api.list_recipes()?,
        RecipeCommands::Get { id } => ctx.api.get_recipe(id)?,
        RecipeCommands::Validate { record } => ctx.api.validate_recipe(&record)?,
        RecipeCommands::Create { record } => ctx.api.create_recipe(&record)?,
        RecipeCommands::Run {
            recipe_type_id,
            data,
        } => ctx.api.run_recipe(recipe_type_id, data.as_deref())?,
    };
    print_result(&result);
    Ok(())
}

fn handle_definitions(ctx: &AppContext, kind: Definition, cmd: DefinitionCommands) -> Result<()> {
    let api = &ctx.api;
    let result = match (kind, cmd) {
        (Definition::Workspace, DefinitionCommands::List) => api.list_workspaces()?,
        (Definition::Workspace, DefinitionCommands::Get { id }) => api.get_workspace(id)?,
        (Definition::Workspace, DefinitionCommands::Validate { record }) => {
            api.validate_workspace(&record)?
        }
        (Definition::Workspace, DefinitionCommands::Create { record }) => {
            api.create_workspace(&record)?
        }
        (Definition::Workspace, DefinitionCommands::Update { id, record }) => {
            api.update_workspace(id, &record)?
        }
        (Definition::Strike, DefinitionCommands::List) => api.list_strikes()?,
        (Definition::Strike, DefinitionCommands::Get { id }) => api.get_strike(id)?,
        (Definition::Strike, DefinitionCommands::Validate { record }) => {
            api.validate_strike(&record)?
        }
        (Definition::Strike, DefinitionCommands::Create { record }) => api.create_strike(&record)?,
        (Definition::Strike, DefinitionCommands::Update { id, record }) => {
            api.update_strike(id, &record)?
        }
    };
    print_result(&result);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config_action(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
    if !result.rows.is_empty() || (result.record.is_none() && result.messages.is_empty()) {
        print_rows(&result.rows);
    }
    if let Some(record) = &result.record {
        print_record(record);
    }
    for path in &result.written_paths {
        debug!(path = %path.display(), "written");
    }
}
