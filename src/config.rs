use crate::agents::ParserMode;
use crate::cli::{Cli, OutputFormat};
use crate::error::{Result, ValidatorError};
use crate::logging::LoggingConfig;
use crate::utils::path;
use crate::validation::rules::{
    default_exclude, default_recommended_sections, default_required_fields, RuleSet,
    DEFAULT_KNOWN_TOOLS,
};
use crate::validation::NamingPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".validate-agents.toml";

/// Effective configuration after every layer has been applied.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default file or directory to validate
    pub path: String,
    pub strict: bool,
    pub naming: NamingPolicy,
    pub parser: ParserMode,
    /// An empty tree is a success instead of an invocation error
    pub allow_empty: bool,
    pub unique_names: bool,
    pub rules: RulesConfig,
    pub logging: LoggingConfig,

    // Runtime only, set from the command line
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: default_path(),
            strict: false,
            naming: NamingPolicy::default(),
            parser: ParserMode::default(),
            allow_empty: false,
            unique_names: true,
            rules: RulesConfig::default(),
            logging: LoggingConfig::default(),
            format: OutputFormat::default(),
            output: None,
            quiet: false,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub required_fields: Vec<String>,
    /// Tool names accepted in addition to the built-in list
    pub extra_tools: Vec<String>,
    pub exclude: Vec<String>,
    pub content_checks: bool,
    pub require_proactive_hint: bool,
    pub description_min_chars: usize,
    pub description_max_chars: usize,
    pub body_min_chars: usize,
    pub body_max_chars: usize,
    pub max_tools: usize,
    pub recommended_sections: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            required_fields: default_required_fields(),
            extra_tools: Vec::new(),
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

fn default_path() -> String {
    "agents".to_string()
}

/// One config file as written. A key that is absent leaves the layers below
/// it untouched; a key that is present replaces them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub path: Option<String>,
    pub strict: Option<bool>,
    pub naming: Option<NamingPolicy>,
    pub parser: Option<ParserMode>,
    pub allow_empty: Option<bool>,
    pub unique_names: Option<bool>,

    #[serde(default)]
    pub rules: RulesFile,

    #[serde(default)]
    pub logging: LoggingFile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    pub required_fields: Option<Vec<String>>,
    /// Accumulates across layers instead of replacing
    pub extra_tools: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub content_checks: Option<bool>,
    pub require_proactive_hint: Option<bool>,
    pub description_min_chars: Option<usize>,
    pub description_max_chars: Option<usize>,
    pub body_min_chars: Option<usize>,
    pub body_max_chars: Option<usize>,
    pub max_tools: Option<usize>,
    pub recommended_sections: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingFile {
    pub level: Option<String>,
    pub format: Option<String>,
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_cli_overrides)
    /// 2. Environment variables
    /// 3. Explicit config file (--config)
    /// 4. Project config (.validate-agents.toml in the working directory)
    /// 5. Global config (~/.validate-agents.toml)
    /// 6. Built-in defaults
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                config = config.merge(Self::from_file(&global_config)?);
            }
        }

        let project_config = project_root.join(CONFIG_FILE_NAME);
        if project_config.exists() {
            config = config.merge(Self::from_file(&project_config)?);
        }

        if let Some(explicit) = explicit {
            let explicit = path::resolve(&explicit.to_string_lossy());
            if !explicit.exists() {
                return Err(ValidatorError::InvalidConfig(format!(
                    "Config file not found: {}",
                    explicit.display()
                )));
            }
            config = config.merge(Self::from_file(&explicit)?);
        }

        config = config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        path::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Parse one TOML config file.
    pub fn from_file(path: &Path) -> Result<ConfigFile> {
        let contents = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(file)
    }

    /// Apply a config file on top of this one (the file takes precedence)
    pub fn merge(mut self, file: ConfigFile) -> Self {
        replace(&mut self.path, file.path);
        replace(&mut self.strict, file.strict);
        replace(&mut self.naming, file.naming);
        replace(&mut self.parser, file.parser);
        replace(&mut self.allow_empty, file.allow_empty);
        replace(&mut self.unique_names, file.unique_names);

        // Rules
        let rules = file.rules;
        replace(&mut self.rules.required_fields, rules.required_fields);
        if let Some(extra_tools) = rules.extra_tools {
            self.rules.extra_tools.extend(extra_tools);
        }
        replace(&mut self.rules.exclude, rules.exclude);
        replace(&mut self.rules.content_checks, rules.content_checks);
        replace(
            &mut self.rules.require_proactive_hint,
            rules.require_proactive_hint,
        );
        replace(
            &mut self.rules.description_min_chars,
            rules.description_min_chars,
        );
        replace(
            &mut self.rules.description_max_chars,
            rules.description_max_chars,
        );
        replace(&mut self.rules.body_min_chars, rules.body_min_chars);
        replace(&mut self.rules.body_max_chars, rules.body_max_chars);
        replace(&mut self.rules.max_tools, rules.max_tools);
        replace(
            &mut self.rules.recommended_sections,
            rules.recommended_sections,
        );

        // Logging
        replace(&mut self.logging.level, file.logging.level);
        replace(&mut self.logging.format, file.logging.format);

        self
    }

    /// Apply environment variable overrides
    fn merge_env(mut self) -> Result<Self> {
        if let Ok(strict) = std::env::var("VALIDATE_AGENTS_STRICT") {
            match strict.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.strict = true,
                "0" | "false" | "no" | "" => self.strict = false,
                other => {
                    return Err(ValidatorError::InvalidConfig(format!(
                        "VALIDATE_AGENTS_STRICT must be true or false, got '{}'",
                        other
                    )))
                }
            }
        }

        if let Ok(naming) = std::env::var("VALIDATE_AGENTS_NAMING") {
            self.naming = naming
                .parse()
                .map_err(|e| ValidatorError::InvalidConfig(format!("VALIDATE_AGENTS_NAMING: {}", e)))?;
        }

        Ok(self)
    }

    /// Reject settings no run could satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(ValidatorError::InvalidConfig(
                "path cannot be empty".to_string(),
            ));
        }
        if self.rules.description_min_chars > self.rules.description_max_chars {
            return Err(ValidatorError::InvalidConfig(format!(
                "rules.description_min_chars ({}) exceeds rules.description_max_chars ({})",
                self.rules.description_min_chars, self.rules.description_max_chars
            )));
        }
        if self.rules.body_min_chars > self.rules.body_max_chars {
            return Err(ValidatorError::InvalidConfig(format!(
                "rules.body_min_chars ({}) exceeds rules.body_max_chars ({})",
                self.rules.body_min_chars, self.rules.body_max_chars
            )));
        }
        if let Some(field) = self.rules.required_fields.iter().find(|f| f.trim().is_empty()) {
            return Err(ValidatorError::InvalidConfig(format!(
                "rules.required_fields contains an empty entry: '{}'",
                field
            )));
        }
        self.logging.validate()
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        self.verbose = cli.verbose;
        self.quiet = cli.quiet;
        self.format = cli.format;
        self.output = cli.output.clone();

        if let Some(path) = &cli.path {
            self.path = path.to_string_lossy().into_owned();
        }
        if cli.strict {
            self.strict = true;
        }
        if cli.allow_empty {
            self.allow_empty = true;
        }
        if cli.basic_parser {
            self.parser = ParserMode::Basic;
        }
        if let Some(naming) = cli.naming_policy() {
            self.naming = naming;
        }

        self
    }

    /// The directory or file a run should validate.
    pub fn target_path(&self) -> PathBuf {
        path::resolve(&self.path)
    }

    /// The rule set a run uses.
    pub fn rule_set(&self) -> RuleSet {
        let mut known_tools: Vec<String> = DEFAULT_KNOWN_TOOLS.iter().map(|t| t.to_string()).collect();
        for tool in &self.rules.extra_tools {
            let tool = tool.trim();
            if !tool.is_empty() && !known_tools.iter().any(|known| known == tool) {
                known_tools.push(tool.to_string());
            }
        }

        RuleSet {
            strict: self.strict,
            naming: self.naming,
            parser: self.parser,
            unique_names: self.unique_names,
            required_fields: self
                .rules
                .required_fields
                .iter()
                .map(|f| f.trim().to_string())
                .collect(),
            known_tools,
            exclude: self.rules.exclude.clone(),
            content_checks: self.rules.content_checks,
            require_proactive_hint: self.rules.require_proactive_hint,
            description_min_chars: self.rules.description_min_chars,
            description_max_chars: self.rules.description_max_chars,
            body_min_chars: self.rules.body_min_chars,
            body_max_chars: self.rules.body_max_chars,
            max_tools: self.rules.max_tools,
            recommended_sections: self.rules.recommended_sections.clone(),
        }
    }
}
