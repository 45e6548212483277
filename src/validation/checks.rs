//! Individual rules. Each check appends findings and never fails.

use super::report::{Finding, FindingKind};
use super::rules::{NamingPolicy, RuleSet};
use crate::agents::fallback::SkippedLine;
use crate::agents::{AgentDefinition, ToolsField};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static KEBAB_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+").unwrap());

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 50;

pub fn required_fields(def: &AgentDefinition, rules: &RuleSet, out: &mut Vec<Finding>) {
    for field in &rules.required_fields {
        if !def.has_value(field) {
            out.push(
                Finding::error(
                    FindingKind::MissingField,
                    format!("Missing required field: {}", field),
                )
                .with_field(field.as_str()),
            );
        }
    }
}

pub fn name_format(def: &AgentDefinition, out: &mut Vec<Finding>) {
    let Some(name) = def.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return;
    };

    if !KEBAB_CASE.is_match(name) {
        out.push(
            Finding::error(
                FindingKind::InvalidName,
                "Name must contain only lowercase letters, numbers, and hyphens",
            )
            .with_field("name"),
        );
    }

    let len = name.chars().count();
    if len < NAME_MIN_CHARS {
        out.push(
            Finding::error(
                FindingKind::InvalidName,
                format!("Name must be at least {} characters long", NAME_MIN_CHARS),
            )
            .with_field("name"),
        );
    }
    if len > NAME_MAX_CHARS {
        out.push(
            Finding::error(
                FindingKind::InvalidName,
                format!("Name must be at most {} characters long", NAME_MAX_CHARS),
            )
            .with_field("name"),
        );
    }
}

/// Compare `name` with the file stem, case-insensitively.
pub fn name_matches_filename(
    def: &AgentDefinition,
    path: &Path,
    rules: &RuleSet,
    out: &mut Vec<Finding>,
) {
    if rules.naming == NamingPolicy::Off {
        return;
    }
    let Some(name) = def.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) else {
        return;
    };
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };

    if name.to_lowercase() != stem.to_lowercase() {
        let message = format!(
            "Name '{}' does not match filename '{}'",
            name,
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
        let finding = match rules.naming {
            NamingPolicy::Error => Finding::error(FindingKind::NamingMismatch, message),
            _ => Finding::warning(FindingKind::NamingMismatch, message),
        };
        out.push(finding.with_field("name"));
    }
}

pub fn description(def: &AgentDefinition, rules: &RuleSet, out: &mut Vec<Finding>) {
    let Some(desc) = def.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) else {
        return;
    };
    let len = desc.chars().count();

    if len < rules.description_min_chars {
        out.push(
            Finding::warning(
                FindingKind::Content,
                format!(
                    "Description should be at least {} characters for better auto-detection",
                    rules.description_min_chars
                ),
            )
            .with_field("description"),
        );
    }
    if len > rules.description_max_chars {
        out.push(
            Finding::warning(
                FindingKind::Content,
                format!(
                    "Description is very long (>{} chars), consider making it more concise",
                    rules.description_max_chars
                ),
            )
            .with_field("description"),
        );
    }
    if rules.require_proactive_hint && !desc.to_lowercase().contains("proactively") {
        out.push(
            Finding::warning(
                FindingKind::Content,
                "Consider adding 'use proactively' to description for automatic invocation",
            )
            .with_field("description"),
        );
    }
}

pub fn tools(def: &AgentDefinition, rules: &RuleSet, out: &mut Vec<Finding>) {
    let Some(field) = &def.tools else {
        return;
    };

    if let ToolsField::Invalid(reason) = field {
        out.push(
            Finding::error(FindingKind::InvalidTools, format!("Invalid tools field: {}", reason))
                .with_field("tools"),
        );
        return;
    }

    let names = field.names();
    let unknown: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|tool| !rules.is_known_tool(tool))
        .collect();

    if !unknown.is_empty() {
        out.push(
            Finding::error(
                FindingKind::UnknownTool,
                format!("Invalid tools: {}", unknown.join(", ")),
            )
            .with_field("tools"),
        );
    }

    if names.len() > rules.max_tools {
        out.push(
            Finding::warning(
                FindingKind::Content,
                format!(
                    "Consider if all tools are necessary (>{} tools requested)",
                    rules.max_tools
                ),
            )
            .with_field("tools"),
        );
    }
}

pub fn version(def: &AgentDefinition, out: &mut Vec<Finding>) {
    let Some(version) = def.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let bare = version.strip_prefix('v').unwrap_or(version);
    if let Err(e) = semver::Version::parse(bare) {
        out.push(
            Finding::warning(
                FindingKind::InvalidVersion,
                format!("Version '{}' is not valid semver: {}", version, e),
            )
            .with_field("version"),
        );
    }
}

pub fn skipped_lines(skipped: &[SkippedLine], out: &mut Vec<Finding>) {
    for line in skipped {
        out.push(Finding::warning(
            FindingKind::UnsupportedYaml,
            format!(
                "Basic parser skipped line {} ({}); use the YAML parser for full validation",
                line.line, line.reason
            ),
        ));
    }
}

pub fn body(body: &str, rules: &RuleSet, out: &mut Vec<Finding>) {
    if body.is_empty() {
        out.push(Finding::warning(
            FindingKind::Content,
            "Agent system prompt is empty",
        ));
        return;
    }

    let len = body.chars().count();
    if len < rules.body_min_chars {
        out.push(Finding::warning(
            FindingKind::Content,
            format!(
                "Agent system prompt is too short (<{} characters)",
                rules.body_min_chars
            ),
        ));
    }
    if len > rules.body_max_chars {
        out.push(Finding::warning(
            FindingKind::Content,
            format!(
                "Agent system prompt is very long (>{} characters)",
                rules.body_max_chars
            ),
        ));
    }

    for section in &rules.recommended_sections {
        if !body.contains(section.as_str()) {
            out.push(Finding::warning(
                FindingKind::Content,
                format!("Missing recommended section: {}", section),
            ));
        }
    }

    if !body.contains("```") {
        out.push(Finding::warning(
            FindingKind::Content,
            "No code examples found - consider adding examples for clarity",
        ));
    }
    if !HEADING.is_match(body) {
        out.push(Finding::warning(
            FindingKind::Content,
            "No main header (# Title) found in body",
        ));
    }
    if !BULLET.is_match(body) {
        out.push(Finding::warning(
            FindingKind::Content,
            "No bullet lists found - consider using lists for better organization",
        ));
    }
}

pub fn filename(path: &Path, out: &mut Vec<Finding>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    if !KEBAB_CASE.is_match(&stem) {
        out.push(Finding::error(
            FindingKind::InvalidFilename,
            "Filename should contain only lowercase letters, numbers, and hyphens",
        ));
    }

    if !path.extension().is_some_and(|ext| ext == "md") {
        out.push(Finding::error(
            FindingKind::InvalidExtension,
            "Agent files must have .md extension",
        ));
    }
}
