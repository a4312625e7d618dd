//! # Scale
//!
//! Client library for the Scale job-processing platform. Its core is the label
//! codec: a job type definition is stored as JSON inside a `LABEL` of the job's
//! `Dockerfile`, so the image carries its own registration.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (src/scale/cli/, binary only)                          │
//! │  - clap parsing, logging setup, rendering, exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API facade (api.rs)                                        │
//! │  - Resolved settings, lazily built HTTP client              │
//! │  - Dispatches to commands, returns `CmdResult`              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*)                                      │
//! │  - init, label, deploy, jobs, recipes, workspaces, strikes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Building blocks                                            │
//! │  - dockerfile + label: build file parsing and rewriting     │
//! │  - loader: json/yaml records   - template: job scaffolding  │
//! │  - client: REST calls          - docker: image build/push   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing below the CLI writes to stdout or exits the process. Errors are one
//! [`error::ScaleError`] enum whose `exit_code()` the binary applies.
//!
//! ## Testing
//!
//! - Building blocks and commands: unit tests with `tempfile` directories
//! - HTTP: `wiremock` servers, with blocking calls moved off the async runtime
//! - Binary: `assert_cmd` tests in `tests/`

pub mod api;
pub mod client;
pub mod commands;
pub mod config;
pub mod docker;
pub mod dockerfile;
pub mod error;
pub mod label;
pub mod loader;
pub mod model;
pub mod template;
