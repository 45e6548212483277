#![forbid(unsafe_code)]

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod validation;
pub mod version;

pub use error::{Result, ValidatorError};
pub use validation::{validate, validate_file, RuleSet, ValidationReport};
