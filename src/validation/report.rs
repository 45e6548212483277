//! Validation results and their human and JSON renderings.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Frontmatter missing, unterminated or not parseable
    Parse,
    MissingField,
    NamingMismatch,
    Io,
    InvalidName,
    InvalidFilename,
    InvalidExtension,
    UnknownTool,
    InvalidTools,
    DuplicateName,
    InvalidVersion,
    /// Frontmatter the basic parser skipped
    UnsupportedYaml,
    /// Description and body quality advice
    Content,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Parse => "parse",
            FindingKind::MissingField => "missing_field",
            FindingKind::NamingMismatch => "naming_mismatch",
            FindingKind::Io => "io",
            FindingKind::InvalidName => "invalid_name",
            FindingKind::InvalidFilename => "invalid_filename",
            FindingKind::InvalidExtension => "invalid_extension",
            FindingKind::UnknownTool => "unknown_tool",
            FindingKind::InvalidTools => "invalid_tools",
            FindingKind::DuplicateName => "duplicate_name",
            FindingKind::InvalidVersion => "invalid_version",
            FindingKind::UnsupportedYaml => "unsupported_yaml",
            FindingKind::Content => "content",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One rule outcome for one file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            field: None,
            message: message.into(),
        }
    }

    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: FileStatus,
    pub findings: Vec<Finding>,
}

impl FileReport {
    /// Build a report; the status follows from whether any finding is an error.
    pub fn new(path: PathBuf, findings: Vec<Finding>) -> Self {
        let status = if findings.iter().any(Finding::is_error) {
            FileStatus::Fail
        } else {
            FileStatus::Pass
        };
        Self {
            path,
            status,
            findings,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == FileStatus::Pass
    }

    pub fn violations(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    /// Add a finding after construction, keeping the status consistent.
    pub(crate) fn push(&mut self, finding: Finding) {
        if finding.is_error() {
            self.status = FileStatus::Fail;
        }
        self.findings.push(finding);
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub violations: usize,
    pub warnings: usize,
}

impl Summary {
    fn from_files(files: &[FileReport]) -> Self {
        let passed = files.iter().filter(|f| f.passed()).count();
        Self {
            total: files.len(),
            passed,
            failed: files.len() - passed,
            violations: files.iter().map(|f| f.violations().count()).sum(),
            warnings: files.iter().map(|f| f.warnings().count()).sum(),
        }
    }
}

/// The outcome of validating a file or directory tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub root: PathBuf,
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

impl ValidationReport {
    pub fn new(root: PathBuf, mut files: Vec<FileReport>) -> Self {
        files.sort_by(|a, b| a.path.cmp(&b.path));
        let summary = Summary::from_files(&files);
        Self {
            root,
            files,
            summary,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.summary.failed == 0
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, path: &Path) -> Option<&FileReport> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Path of `file` relative to the report root, for display.
    pub fn display_path<'a>(&self, file: &'a FileReport) -> &'a Path {
        file.path
            .strip_prefix(&self.root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(file.path.as_path())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable rendering. With `quiet`, passing files are omitted.
    pub fn render_human(&self, quiet: bool) -> String {
        let mut out = String::new();

        for file in &self.files {
            if quiet && file.passed() {
                continue;
            }

            let marker = if file.passed() { "✓" } else { "✗" };
            let _ = writeln!(out, "{} {}", marker, self.display_path(file).display());

            for finding in file.violations() {
                let _ = writeln!(out, "  ERROR: {}", finding.message);
            }
            if !quiet {
                for finding in file.warnings() {
                    let _ = writeln!(out, "  WARNING: {}", finding.message);
                }
            }
        }

        let summary = &self.summary;
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out, "Total agents: {}", summary.total);
        let _ = writeln!(out, "Passed: {}", summary.passed);
        let _ = writeln!(out, "Failed: {}", summary.failed);
        let _ = writeln!(out, "Total warnings: {}", summary.warnings);
        let _ = writeln!(out);

        if self.all_passed() {
            let _ = writeln!(out, "✓ All agents passed validation!");
        } else {
            let _ = writeln!(out, "✗ {} agents failed validation", summary.failed);
        }

        out
    }
}
