use crate::validation::NamingPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Per-file results and a summary
    #[default]
    Human,
    /// The full report as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "validate-agents")]
#[command(about = "Validate agent definition files (Markdown with YAML frontmatter)", long_about = None)]
#[command(version = env!("VALIDATE_AGENTS_VERSION"))]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "\
EXIT CODES:
  0  every agent definition is valid
  1  at least one agent definition failed validation
  2  invocation error (bad path, no files found, invalid configuration)

EXAMPLES:
  validate-agents                     Validate ./agents
  validate-agents agents/reviewer.md  Validate a single file
  validate-agents --strict            Treat warnings as errors
  validate-agents --format json -o report.json")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// File or directory to validate [default: agents]
    pub path: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// How a name that differs from its filename is reported
    #[arg(long, value_name = "POLICY", value_parser = ["error", "warn", "off"])]
    pub naming: Option<String>,

    /// Parse frontmatter as flat key: value pairs only
    #[arg(long)]
    pub basic_parser: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Succeed when no agent definitions are found
    #[arg(long)]
    pub allow_empty: bool,

    /// Only show failing files and the summary
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Config file to load on top of the global and project configs
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logs on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

impl Cli {
    /// The `--naming` flag, already checked by clap.
    pub fn naming_policy(&self) -> Option<NamingPolicy> {
        self.naming.as_deref().and_then(|s| s.parse().ok())
    }
}
