//! # CLI Behavior
//!
//! This is one UI client for the library. It is the only place that knows about
//! terminal I/O, logging setup and output formatting.
//!
//! ## Settings
//!
//! Remote commands need the API URL. It comes from `--url`, `SCALE_URL` or
//! `scale config url <URL>`, in that order of precedence. `jobs init`, `jobs label`
//! and `config` never contact the server.
//!
//! ## Module Structure
//!
//! - `commands`: dispatch and per-command handlers
//! - `render`: output formatting (tables, colors, messages)
//! - `setup`: argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
