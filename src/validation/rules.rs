use crate::agents::ParserMode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tool names a host assistant understands out of the box.
pub const DEFAULT_KNOWN_TOOLS: &[&str] = &[
    "Read",
    "Write",
    "Edit",
    "MultiEdit",
    "Bash",
    "Grep",
    "Glob",
    "WebFetch",
    "WebSearch",
    "TodoWrite",
    "ExitPlanMode",
    "NotebookRead",
    "NotebookEdit",
    "LS",
    "Task",
];

/// How a `name` that differs from the file stem is reported.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    #[default]
    Error,
    #[serde(alias = "warning")]
    Warn,
    #[serde(alias = "none")]
    Off,
}

impl NamingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingPolicy::Error => "error",
            NamingPolicy::Warn => "warn",
            NamingPolicy::Off => "off",
        }
    }
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(NamingPolicy::Error),
            "warn" | "warning" => Ok(NamingPolicy::Warn),
            "off" | "none" => Ok(NamingPolicy::Off),
            other => Err(format!(
                "invalid naming policy '{}' (must be 'error', 'warn' or 'off')",
                other
            )),
        }
    }
}

/// Everything that decides how a file is judged.
///
/// A `RuleSet` is built once from configuration and passed by reference to
/// the validator; it is never mutated during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    /// Promote every warning to an error
    pub strict: bool,
    pub naming: NamingPolicy,
    pub parser: ParserMode,
    /// Report files that share a `name`
    pub unique_names: bool,
    pub required_fields: Vec<String>,
    pub known_tools: Vec<String>,
    /// Path components containing any of these are not scanned
    pub exclude: Vec<String>,
    /// Run the description/body quality checks
    pub content_checks: bool,
    pub require_proactive_hint: bool,
    pub description_min_chars: usize,
    pub description_max_chars: usize,
    pub body_min_chars: usize,
    pub body_max_chars: usize,
    pub max_tools: usize,
    pub recommended_sections: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            strict: false,
            naming: NamingPolicy::default(),
            parser: ParserMode::default(),
            unique_names: true,
            required_fields: default_required_fields(),
            known_tools: DEFAULT_KNOWN_TOOLS.iter().map(|t| t.to_string()).collect(),
            exclude: default_exclude(),
            content_checks: true,
            require_proactive_hint: true,
            description_min_chars: 20,
            description_max_chars: 500,
            body_min_chars: 100,
            body_max_chars: 10_000,
            max_tools: 10,
            recommended_sections: default_recommended_sections(),
        }
    }
}

impl RuleSet {
    pub fn is_known_tool(&self, tool: &str) -> bool {
        self.known_tools.iter().any(|known| known == tool)
    }
}

pub fn default_required_fields() -> Vec<String> {
    vec!["name".to_string(), "description".to_string()]
}

pub fn default_exclude() -> Vec<String> {
    vec!["template".to_string(), "docs".to_string()]
}

pub fn default_recommended_sections() -> Vec<String> {
    vec![
        "Core Expertise".to_string(),
        "Working Principles".to_string(),
        "Task Approach".to_string(),
    ]
}
