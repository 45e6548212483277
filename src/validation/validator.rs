use super::checks;
use super::report::{FileReport, Finding, FindingKind, Severity, ValidationReport};
use super::rules::RuleSet;
use crate::agents::{discover_agent_files, frontmatter, parse_frontmatter, Discovery};
use crate::error::{Result, ValidatorError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Validate a single file or every agent definition under a directory.
///
/// Per-file problems end up in the report; only a missing or unreadable
/// root is an error.
pub fn validate(path: &Path, rules: &RuleSet) -> Result<ValidationReport> {
    Validator::new(rules).validate(path)
}

/// Validate one file without touching any other.
pub fn validate_file(path: &Path, rules: &RuleSet) -> FileReport {
    let (mut report, _) = check_file(path, rules);
    promote_if_strict(&mut report, rules);
    report
}

/// Runs validations against a fixed rule set.
pub struct Validator<'a> {
    rules: &'a RuleSet,
}

impl<'a> Validator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Resolve `path` into the list of files a run would check.
    pub fn collect_files(&self, path: &Path) -> Result<Discovery> {
        if !path.exists() {
            return Err(ValidatorError::RootNotFound(path.to_path_buf()));
        }

        if path.is_file() {
            return Ok(Discovery::single(path.to_path_buf()));
        }

        // An unreadable root is not an empty tree.
        if let Err(e) = std::fs::read_dir(path) {
            tracing::warn!(root = %path.display(), error = %e, "cannot read root directory");
            return Err(ValidatorError::RootNotFound(path.to_path_buf()));
        }

        let discovery = discover_agent_files(path, &self.rules.exclude);
        tracing::debug!(
            root = %path.display(),
            count = discovery.files.len(),
            unreadable = discovery.unreadable.len(),
            "discovered agent files"
        );
        Ok(discovery)
    }

    pub fn validate(&self, path: &Path) -> Result<ValidationReport> {
        self.validate_with(path, |_| {})
    }

    /// Like [`Validator::validate`], calling `on_file` as soon as each file
    /// has been checked. Duplicate names are marked once all files are in.
    pub fn validate_with<F>(&self, path: &Path, on_file: F) -> Result<ValidationReport>
    where
        F: FnMut(&FileReport),
    {
        let discovery = self.collect_files(path)?;
        Ok(self.validate_files(path, &discovery, on_file))
    }

    /// Check already discovered files, in order. Paths the walk could not
    /// read are reported as failed files.
    pub fn validate_files<F>(&self, root: &Path, discovery: &Discovery, mut on_file: F) -> ValidationReport
    where
        F: FnMut(&FileReport),
    {
        let mut reports = Vec::with_capacity(discovery.len());
        let mut names: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for (path, error) in &discovery.unreadable {
            let finding = Finding::error(FindingKind::Io, format!("Failed to read directory: {}", error));
            let report = FileReport::new(path.clone(), vec![finding]);
            on_file(&report);
            reports.push(report);
        }

        for path in &discovery.files {
            let (mut report, name) = check_file(path, self.rules);
            promote_if_strict(&mut report, self.rules);
            on_file(&report);
            tracing::debug!(
                path = %path.display(),
                passed = report.passed(),
                findings = report.findings.len(),
                "validated agent file"
            );
            if let Some(name) = name {
                names.entry(name.to_lowercase()).or_default().push(reports.len());
            }
            reports.push(report);
        }

        if self.rules.unique_names {
            mark_duplicates(&mut reports, &names, root);
        }

        let report = ValidationReport::new(root.to_path_buf(), reports);
        tracing::info!(
            total = report.summary.total,
            passed = report.summary.passed,
            failed = report.summary.failed,
            warnings = report.summary.warnings,
            "validation finished"
        );
        report
    }
}

/// Run every per-file rule. Returns the report and the agent name, if any,
/// for the cross-file duplicate check.
fn check_file(path: &Path, rules: &RuleSet) -> (FileReport, Option<String>) {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read agent file");
            let finding = Finding::error(FindingKind::Io, format!("Failed to read file: {}", e));
            return (FileReport::new(path.to_path_buf(), vec![finding]), None);
        }
    };

    let document = match frontmatter::split(&content) {
        Ok(document) => document,
        Err(e) => return (parse_failure(path, e), None),
    };

    let parsed = match parse_frontmatter(&document.frontmatter, rules.parser) {
        Ok(parsed) => parsed,
        Err(e) => return (parse_failure(path, e), None),
    };
    let def = &parsed.definition;

    let mut findings = Vec::new();
    checks::skipped_lines(&parsed.skipped, &mut findings);
    checks::required_fields(def, rules, &mut findings);
    checks::name_format(def, &mut findings);
    checks::name_matches_filename(def, path, rules, &mut findings);
    checks::tools(def, rules, &mut findings);
    checks::version(def, &mut findings);
    if rules.content_checks {
        checks::description(def, rules, &mut findings);
        checks::body(&document.body, rules, &mut findings);
    }
    checks::filename(path, &mut findings);

    let name = def
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    (FileReport::new(path.to_path_buf(), findings), name)
}

fn parse_failure(path: &Path, err: crate::error::ParseError) -> FileReport {
    FileReport::new(
        path.to_path_buf(),
        vec![Finding::error(FindingKind::Parse, err.to_string())],
    )
}

fn mark_duplicates(reports: &mut [FileReport], names: &BTreeMap<String, Vec<usize>>, root: &Path) {
    for indices in names.values().filter(|indices| indices.len() > 1) {
        for &idx in indices {
            let others: Vec<String> = indices
                .iter()
                .filter(|&&other| other != idx)
                .map(|&other| {
                    let path = &reports[other].path;
                    path.strip_prefix(root)
                        .unwrap_or(path.as_path())
                        .display()
                        .to_string()
                })
                .collect();
            let finding = Finding::error(
                FindingKind::DuplicateName,
                format!("Name is also used by: {}", others.join(", ")),
            )
            .with_field("name");
            reports[idx].push(finding);
        }
    }
}

fn promote_if_strict(report: &mut FileReport, rules: &RuleSet) {
    if !rules.strict {
        return;
    }
    let findings = std::mem::take(&mut report.findings)
        .into_iter()
        .map(|mut finding| {
            finding.severity = Severity::Error;
            finding
        })
        .collect();
    *report = FileReport::new(std::mem::take(&mut report.path), findings);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_BODY: &str = "# Code Reviewer\n\n## Core Expertise\n- Rust and Go reviews\n\n\
        ## Working Principles\n- Be precise and kind\n\n## Task Approach\n- Read the diff first\n\n\
        ```bash\ngit diff\n```\n";

    fn write_agent(dir: &Path, file: &str, frontmatter: &str) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, format!("---\n{}\n---\n{}", frontmatter, VALID_BODY)).unwrap();
        path
    }

    #[test]
    fn test_clean_file_has_no_findings() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_agent(
            temp.path(),
            "code-reviewer.md",
            "name: code-reviewer\ndescription: Reviews code changes. Use proactively after edits.\ntools: Read, Grep",
        );

        let report = validate_file(&path, &RuleSet::default());
        assert!(report.passed());
        assert!(report.findings.is_empty(), "{:?}", report.findings);
    }

    #[test]
    fn test_parse_failure_stops_other_checks() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("Bad_Name.md");
        fs::write(&path, "no frontmatter here").unwrap();

        let report = validate_file(&path, &RuleSet::default());
        assert!(!report.passed());
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::Parse);
    }

    #[test]
    fn test_unreadable_file_is_io_failure() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("binary.md");
        fs::write(&path, b"\xff\xfe\x00\x80").unwrap();

        let report = validate_file(&path, &RuleSet::default());
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].kind, FindingKind::Io);
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_agent(temp.path(), "foo.md", "name: foo\ndescription: Does X");

        assert!(validate_file(&path, &RuleSet::default()).passed());

        let strict = RuleSet {
            strict: true,
            ..Default::default()
        };
        let report = validate_file(&path, &strict);
        assert!(!report.passed());
        assert!(report.findings.iter().all(Finding::is_error));
    }

    #[test]
    fn test_content_checks_can_be_disabled() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("foo.md");
        fs::write(&path, "---\nname: foo\ndescription: x\n---\n").unwrap();

        let rules = RuleSet {
            content_checks: false,
            ..Default::default()
        };
        assert!(validate_file(&path, &rules).findings.is_empty());
    }

    #[test]
    fn test_duplicate_names_across_directories() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::create_dir_all(temp.path().join("b")).unwrap();
        write_agent(&temp.path().join("a"), "helper.md", "name: helper\ndescription: First. Use proactively.");
        write_agent(&temp.path().join("b"), "helper.md", "name: helper\ndescription: Second. Use proactively.");

        let report = validate(temp.path(), &RuleSet::default()).unwrap();
        assert_eq!(report.summary.failed, 2);
        let first = &report.files[0];
        let dup: Vec<_> = first
            .violations()
            .filter(|f| f.kind == FindingKind::DuplicateName)
            .collect();
        assert_eq!(dup.len(), 1);
        assert!(dup[0].message.contains("helper.md"));

        let relaxed = RuleSet {
            unique_names: false,
            ..Default::default()
        };
        assert!(validate(temp.path(), &relaxed).unwrap().all_passed());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let err = validate(&temp.path().join("nope"), &RuleSet::default()).unwrap_err();
        assert!(matches!(err, ValidatorError::RootNotFound(_)));
    }

    #[test]
    fn test_callback_runs_before_the_next_file_is_read() {
        let temp = tempfile::tempdir().unwrap();
        write_agent(temp.path(), "aaa.md", "name: aaa\ndescription: x");
        let second = write_agent(temp.path(), "bbb.md", "name: bbb\ndescription: x");

        let rules = RuleSet::default();
        let mut seen = Vec::new();
        let report = Validator::new(&rules)
            .validate_with(temp.path(), |file| {
                seen.push(file.path.clone());
                if seen.len() == 1 {
                    fs::remove_file(&second).unwrap();
                }
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert!(seen[0].ends_with("aaa.md"));
        let kinds: Vec<_> = report.file(&second).unwrap().violations().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FindingKind::Io]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unwalkable_directory_fails_the_run() {
        let temp = tempfile::tempdir().unwrap();
        write_agent(temp.path(), "aaa.md", "name: aaa\ndescription: x");
        fs::create_dir(temp.path().join("nested")).unwrap();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("nested").join("back")).unwrap();

        let rules = RuleSet::default();
        let mut ticks = 0;
        let report = Validator::new(&rules)
            .validate_with(temp.path(), |_| ticks += 1)
            .unwrap();

        assert_eq!(ticks, 2);
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.failed, 1);
        assert!(!report.all_passed());
        let looped = report.file(&temp.path().join("nested").join("back")).unwrap();
        let kinds: Vec<_> = looped.violations().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FindingKind::Io]);
        assert!(looped.findings[0].message.starts_with("Failed to read directory"));
    }
}
