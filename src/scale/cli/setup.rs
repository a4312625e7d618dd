use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scale", bin_name = "scale", version)]
#[command(about = "Command-line client for the Scale job-processing platform", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the Scale API (e.g. http://scale.local/api/v5)
    #[arg(long, env = "SCALE_URL", global = true, help_heading = "Options")]
    pub url: Option<String>,

    /// Registry prefix for job images
    #[arg(long, env = "DOCKER_REGISTRY", global = true, help_heading = "Options")]
    pub registry: Option<String>,

    /// Image tag (defaults to the job type version)
    #[arg(long, env = "DOCKER_TAG", global = true, help_heading = "Options")]
    pub tag: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", global = true, help_heading = "Options")]
    pub timeout: Option<u64>,

    /// Directory holding config.json and templates
    #[arg(long, env = "SCALE_CONFIG_DIR", global = true, hide = true)]
    pub config_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Job types: scaffold, label, validate, deploy and run
    #[command(subcommand, display_order = 1)]
    Jobs(JobCommands),

    /// Recipe types
    #[command(subcommand, display_order = 2)]
    Recipes(RecipeCommands),

    /// Storage workspaces
    #[command(subcommand, display_order = 3)]
    Workspaces(DefinitionCommands),

    /// Ingest strikes
    #[command(subcommand, display_order = 4)]
    Strikes(DefinitionCommands),

    /// Get or set configuration
    #[command(display_order = 5)]
    Config {
        /// Configuration key (url, registry, tag, template-path, timeout)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct JobDir {
    /// Job directory
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Initialize a new job type directory. Does not contact Scale.
    #[command(alias = "i")]
    Init {
        /// Destination directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Template name or directory; the built-in files are used if omitted
        #[arg(long)]
        template: Option<String>,

        /// Template search path
        #[arg(long, env = "SCALE_TEMPLATE_PATH")]
        template_path: Option<String>,

        /// Overwrite an existing destination directory
        #[arg(short, long)]
        force: bool,

        /// Template argument in key=value form
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,
    },

    /// List job types
    #[command(alias = "ls")]
    List {
        /// Only job types with this name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a job type
    Get { id: i64 },

    /// Show the job type label of a job directory, or set it from a record
    Label {
        #[command(flatten)]
        dir: JobDir,

        /// Record (base name of a .json/.yml/.yaml file) to write into the label
        #[arg(long, value_name = "FILEBASE")]
        set: Option<PathBuf>,
    },

    /// Validate the job type of a job directory
    Validate {
        #[command(flatten)]
        dir: JobDir,
    },

    /// Build and push the job image, then register the job type
    Deploy {
        #[command(flatten)]
        dir: JobDir,

        /// Do not build the image
        #[arg(long)]
        no_build: bool,

        /// Do not push the image
        #[arg(long)]
        no_push: bool,
    },

    /// Queue a job
    Run {
        job_type_id: i64,

        /// Job data record (base name of a .json/.yml/.yaml file)
        #[arg(long, value_name = "FILEBASE")]
        data: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommands {
    /// List recipe types
    #[command(alias = "ls")]
    List,

    /// Show a recipe type
    Get { id: i64 },

    /// Validate a recipe type record
    Validate {
        #[arg(value_name = "FILEBASE")]
        record: PathBuf,
    },

    /// Create a recipe type from a record
    Create {
        #[arg(value_name = "FILEBASE")]
        record: PathBuf,
    },

    /// Queue a recipe
    Run {
        recipe_type_id: i64,

        /// Recipe data record
        #[arg(long, value_name = "FILEBASE")]
        data: Option<PathBuf>,
    },
}

/// Operations shared by workspaces and strikes.
#[derive(Subcommand, Debug)]
pub enum DefinitionCommands {
    /// List definitions
    #[command(alias = "ls")]
    List,

    /// Show a definition
    Get { id: i64 },

    /// Validate a record
    Validate {
        #[arg(value_name = "FILEBASE")]
        record: PathBuf,
    },

    /// Create from a record
    Create {
        #[arg(value_name = "FILEBASE")]
        record: PathBuf,
    },

    /// Update from a record
    Update {
        id: i64,

        #[arg(value_name = "FILEBASE")]
        record: PathBuf,
    },
}
