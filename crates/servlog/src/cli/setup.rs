use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "servlog",
    bin_name = "servlog",
    version = get_version(),
    disable_help_subcommand = true,
    about = "Vehicle service logs: autosaving drafts, validated records, filterable history",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text, help_heading = "Options")]
    pub output: OutputFormat,

    /// Data directory (overrides SERVLOG_DATA and the config file)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with drafts
    #[command(subcommand)]
    Draft(DraftCommands),

    /// Turn the active draft into a service log
    Promote,

    /// Work with service logs
    #[command(subcommand)]
    Log(LogCommands),

    /// Interactive editor with live autosave
    Session,

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Create an empty draft and make it active
    New,

    /// List drafts, newest first (* marks the active one)
    #[command(alias = "ls")]
    List,

    /// Show a draft and its validation errors (default: active draft)
    Show {
        /// Index, id or id prefix
        selector: Option<String>,
    },

    /// Make a draft the active one
    Select {
        /// Index, id or id prefix
        selector: String,
    },

    /// Set one field (endDate follows startDate and cannot be set)
    Set {
        /// providerId, serviceOrder, carId, odometer, engineHours, startDate, type, serviceDescription
        field: String,

        /// New value (empty clears numbers and type)
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Draft to edit (default: active draft)
        #[arg(long = "draft", value_name = "SEL")]
        draft: Option<String>,
    },

    /// Validate a draft without changing it (default: active draft)
    Check {
        /// Index, id or id prefix
        selector: Option<String>,
    },

    /// Delete a draft (default: active draft)
    #[command(alias = "rm")]
    Delete {
        /// Index, id or id prefix
        selector: Option<String>,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },

    /// Delete every draft
    Clear {
        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// List service logs, newest first
    #[command(alias = "ls")]
    List(LogFilterArgs),

    /// Show one service log
    Show {
        /// Index, id or id prefix
        selector: String,
    },

    /// Change fields of a service log
    Edit {
        /// Index, id or id prefix
        selector: String,

        /// FIELD=VALUE pairs, e.g. carId=TRUCK-2 startDate=2024-05-01
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Delete a service log
    #[command(alias = "rm")]
    Delete {
        /// Index, id or id prefix
        selector: String,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct LogFilterArgs {
    /// Case-insensitive text in provider, order, car or description
    #[arg(short, long)]
    pub search: Option<String>,

    /// all, planned, unplanned or emergency
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub service_type: Option<String>,

    /// Earliest start date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Latest start date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
}

#[derive(Args, Debug, Default, Clone, Copy)]
pub struct ConfirmArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
