use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Path not found or not readable: {0}")]
    RootNotFound(PathBuf),

    #[error("No agent definitions found under {0}")]
    NoAgentFiles(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ValidatorError {
    /// Exit code for errors that abort the whole invocation.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Why a frontmatter block could not be turned into an agent definition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("File must start with YAML frontmatter (---)")]
    MissingFrontmatter,

    #[error("Frontmatter is not terminated by a closing ---")]
    Unterminated,

    #[error("Invalid YAML in frontmatter: {0}")]
    Yaml(String),

    #[error("Frontmatter must be a YAML mapping")]
    NotAMapping,

    #[error("Field `{field}` has an unexpected type: {message}")]
    FieldType { field: String, message: String },
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        ParseError::Yaml(err.to_string())
    }
}
