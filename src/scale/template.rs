//! # Job Scaffolding
//!
//! `jobs init` renders a template directory into a new job directory. Every
//! file is a minijinja template rendered against the `-a key=value` arguments;
//! sub-directories are recreated. Without a named template the built-in
//! `Dockerfile`, `entryPoint.sh` and `job_type.yml` are used.
//!
//! Named templates are looked up on a search path (`--template-path`,
//! `SCALE_TEMPLATE_PATH`, or `<config dir>/templates`), entries separated the
//! way `PATH` is.

use crate::error::{Result, ScaleError};
use minijinja::{AutoEscape, Environment};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TEMPLATES_DIR: &str = "templates";

const BUILTIN_DOCKERFILE: &str = include_str!("templates/Dockerfile.tmp");
const BUILTIN_ENTRYPOINT: &str = include_str!("templates/entryPoint.sh.tmp");
const BUILTIN_JOB_TYPE: &str = include_str!("templates/job_type.yml.tmp");

/// Built-in files, in the order they are written.
pub const BUILTINS: &[(&str, &str)] = &[
    ("Dockerfile", BUILTIN_DOCKERFILE),
    ("entryPoint.sh", BUILTIN_ENTRYPOINT),
    ("job_type.yml", BUILTIN_JOB_TYPE),
];

pub type Context = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Created,
    Overwritten,
}

/// Resolves a template name to a directory.
///
/// A name that is itself a directory wins; otherwise each search path entry is
/// tried in order.
pub fn find_template(name: &str, search_path: Option<&OsStr>) -> Result<PathBuf> {
    let direct = Path::new(name);
    if direct.is_dir() {
        return Ok(direct.to_path_buf());
    }

    if let Some(search_path) = search_path {
        for dir in std::env::split_paths(search_path) {
            let candidate = dir.join(name);
            debug!(candidate = %candidate.display(), "looking for template");
            if candidate.is_dir() {
                return Ok(candidate);
            }
        }
    }

    Err(ScaleError::TemplateNotFound(name.to_string()))
}

/// Makes sure `dir` can receive the rendered files.
pub fn prepare_target(dir: &Path, force: bool) -> Result<TargetState> {
    match fs::metadata(dir) {
        Ok(meta) if !meta.is_dir() => Err(ScaleError::InvalidInput(format!(
            "Target {} exists and is not a directory",
            dir.display()
        ))),
        Ok(_) if force => Ok(TargetState::Overwritten),
        Ok(_) => Err(ScaleError::InvalidInput(format!(
            "Target directory {} exists. Use -f to overwrite",
            dir.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(dir)?;
            Ok(TargetState::Created)
        }
        Err(e) => Err(e.into()),
    }
}

/// Splits `key=value` arguments. Entries without exactly one `=` or with an
/// empty key are returned as warnings and left out of the context.
pub fn parse_args(args: &[String]) -> (Context, Vec<String>) {
    let mut context = Context::new();
    let mut warnings = Vec::new();

    for arg in args {
        let parts: Vec<&str> = arg.split('=').collect();
        match parts.as_slice() {
            [key, value] if !key.trim().is_empty() => {
                context.insert(key.trim().to_string(), (*value).to_string());
            }
            _ => warnings.push(format!("Invalid arg {:?}, expected key=value", arg)),
        }
    }

    (context, warnings)
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    // job files are never markup, whatever their extension
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env
}

fn render(env: &mut Environment<'static>, name: &str, source: &str, context: &Context) -> Result<String> {
    env.add_template_owned(name.to_string(), source.to_string())?;
    let rendered = env.get_template(name)?.render(context)?;
    Ok(rendered)
}

/// Writes the built-in job files into `target`. Returns the written paths.
pub fn render_builtin(target: &Path, context: &Context) -> Result<Vec<PathBuf>> {
    let mut env = environment();
    let mut written = Vec::with_capacity(BUILTINS.len());

    for (name, source) in BUILTINS {
        info!(file = name, "rendering built-in template");
        let out = target.join(name);
        fs::write(&out, render(&mut env, name, source, context)?)?;
        if name.ends_with(".sh") {
            make_executable(&out)?;
        }
        written.push(out);
    }

    Ok(written)
}

/// Renders every file under `template` into the same relative path under
/// `target`, keeping file modes. Files that are not UTF-8 are copied as they
/// are. Returns the written files.
pub fn render_dir(template: &Path, target: &Path, context: &Context) -> Result<Vec<PathBuf>> {
    let mut env = environment();
    let mut written = Vec::new();
    render_tree(&mut env, template, template, target, context, &mut written)?;
    Ok(written)
}

fn render_tree(
    env: &mut Environment<'static>,
    root: &Path,
    dir: &Path,
    target: &Path,
    context: &Context,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let rel = path.strip_prefix(root).unwrap_or(&path);
        let out = target.join(rel);

        if entry.file_type()?.is_dir() {
            fs::create_dir_all(&out)?;
            render_tree(env, root, &path, target, context, written)?;
            continue;
        }

        match String::from_utf8(fs::read(&path)?) {
            Ok(source) => {
                info!(file = %rel.display(), "rendering template");
                let name = rel.to_string_lossy().into_owned();
                fs::write(&out, render(env, &name, &source, context)?)?;
            }
            Err(binary) => {
                info!(file = %rel.display(), "copying binary file");
                fs::write(&out, binary.into_bytes())?;
            }
        }
        fs::set_permissions(&out, entry.metadata()?.permissions())?;
        written.push(out);
    }

    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
