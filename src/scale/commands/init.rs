use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::template::{self, TargetState};
use std::ffi::OsString;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Template name or directory; the built-in files are used when `None`
    pub template: Option<String>,
    pub search_path: Option<OsString>,
    pub force: bool,
    /// Raw `key=value` template arguments
    pub args: Vec<String>,
}

pub fn run(target: &Path, options: &InitOptions) -> Result<CmdResult> {
    // Resolve the template before touching the target
    let template_dir = match &options.template {
        Some(name) => Some(template::find_template(name, options.search_path.as_deref())?),
        None => None,
    };

    let mut result = CmdResult::default();
    if template::prepare_target(target, options.force)? == TargetState::Overwritten {
        result.add_message(CmdMessage::warning(format!(
            "Target directory {} exists, overwriting contents",
            target.display()
        )));
    }

    let (context, warnings) = template::parse_args(&options.args);
    for warning in warnings {
        result.add_message(CmdMessage::warning(warning));
    }

    let written = match &template_dir {
        Some(dir) => template::render_dir(dir, target, &context)?,
        None => template::render_builtin(target, &context)?,
    };

    result.add_message(CmdMessage::success(format!(
        "Initialized job in {} ({} files)",
        target.display(),
        written.len()
    )));
    Ok(result.with_written_paths(written))
}
