//! Rule checking for agent definition files.
//!
//! A run is a pure function from a path and a [`RuleSet`] to a
//! [`ValidationReport`]. Problems with individual files become findings in
//! the report; only a missing root aborts the run.

pub mod checks;
pub mod report;
pub mod rules;
pub mod validator;

pub use report::{FileReport, FileStatus, Finding, FindingKind, Severity, Summary, ValidationReport};
pub use rules::{NamingPolicy, RuleSet, DEFAULT_KNOWN_TOOLS};
pub use validator::{validate, validate_file, Validator};
