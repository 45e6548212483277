//! Typed view of an agent definition's frontmatter.

use super::fallback;
use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Which frontmatter parser to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParserMode {
    /// Full YAML via serde_yaml
    #[default]
    Yaml,
    /// Flat `key: value` pairs only
    Basic,
}

impl ParserMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserMode::Yaml => "yaml",
            ParserMode::Basic => "basic",
        }
    }
}

/// The `tools` field, which agents write either as a YAML list or as a
/// comma-separated string.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolsField {
    List(Vec<String>),
    CommaSeparated(String),
    /// Any other YAML shape; kept so the tools check can report it
    Invalid(String),
}

impl ToolsField {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(ToolsField::CommaSeparated(s)),
            Value::Sequence(items) => {
                let mut tools = Vec::with_capacity(items.len());
                for item in items {
                    match scalar_to_string(&item) {
                        Some(tool) => tools.push(tool),
                        None => {
                            return Some(ToolsField::Invalid(
                                "list entries must be plain strings".to_string(),
                            ))
                        }
                    }
                }
                Some(ToolsField::List(tools))
            }
            Value::Mapping(_) => Some(ToolsField::Invalid(
                "expected a list or a comma-separated string, found a mapping".to_string(),
            )),
            other => Some(ToolsField::Invalid(format!(
                "expected a list or a comma-separated string, found {}",
                describe(&other)
            ))),
        }
    }

    /// Tool names with surrounding whitespace removed and empty entries dropped.
    pub fn names(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            ToolsField::List(items) => items.iter().map(String::as_str).collect(),
            ToolsField::CommaSeparated(s) => s.split(',').collect(),
            ToolsField::Invalid(_) => Vec::new(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// An agent definition's frontmatter with its well-known fields typed.
///
/// Every field is optional here; which ones are required is a validation
/// concern, not a parsing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentDefinition {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tools: Option<ToolsField>,
    pub version: Option<String>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub expertise_level: Option<String>,

    /// Keys this crate does not interpret
    pub extra: BTreeMap<String, Value>,
}

impl AgentDefinition {
    /// Build a definition from a parsed frontmatter mapping.
    pub fn from_mapping(mapping: Mapping) -> Result<Self, ParseError> {
        let mut definition = AgentDefinition::default();

        for (key, value) in mapping {
            let key = scalar_to_string(&key).ok_or_else(|| ParseError::FieldType {
                field: format!("{:?}", key),
                message: "keys must be plain scalars".to_string(),
            })?;

            match key.as_str() {
                "name" => definition.name = scalar_field(&key, value)?,
                "description" => definition.description = scalar_field(&key, value)?,
                "tools" => definition.tools = ToolsField::from_value(value),
                // Free-form metadata: a shape we do not model is kept verbatim.
                "version" | "author" | "category" | "expertise_level" => {
                    match optional_scalar(value) {
                        Ok(scalar) => *definition.metadata_slot(&key) = scalar,
                        Err(value) => {
                            definition.extra.insert(key, value);
                        }
                    }
                }
                "tags" => match string_list(value) {
                    Ok(tags) => definition.tags = tags,
                    Err(value) => {
                        definition.extra.insert(key, value);
                    }
                },
                _ => {
                    definition.extra.insert(key, value);
                }
            }
        }

        Ok(definition)
    }

    fn metadata_slot(&mut self, field: &str) -> &mut Option<String> {
        match field {
            "version" => &mut self.version,
            "author" => &mut self.author,
            "category" => &mut self.category,
            _ => &mut self.expertise_level,
        }
    }

    /// Whether `field` is present with a non-blank value.
    pub fn has_value(&self, field: &str) -> bool {
        fn filled(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        let typed = match field {
            "name" => filled(&self.name),
            "description" => filled(&self.description),
            "version" => filled(&self.version),
            "author" => filled(&self.author),
            "category" => filled(&self.category),
            "expertise_level" => filled(&self.expertise_level),
            "tools" => self
                .tools
                .as_ref()
                .is_some_and(|t| matches!(t, ToolsField::Invalid(_)) || !t.names().is_empty()),
            "tags" => !self.tags.is_empty(),
            _ => false,
        };

        typed
            || self.extra.get(field).is_some_and(|value| match value {
                Value::Null => false,
                Value::String(s) => !s.trim().is_empty(),
                Value::Sequence(items) => !items.is_empty(),
                Value::Mapping(map) => !map.is_empty(),
                _ => true,
            })
    }
}

/// Frontmatter parsed into a definition, plus any lines the basic parser
/// had to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFrontmatter {
    pub definition: AgentDefinition,
    pub skipped: Vec<fallback::SkippedLine>,
}

/// Parse a raw frontmatter block with the requested parser.
pub fn parse_frontmatter(raw: &str, mode: ParserMode) -> Result<ParsedFrontmatter, ParseError> {
    match mode {
        ParserMode::Yaml => {
            let value: Value = serde_yaml::from_str(raw)?;
            let mapping = match value {
                // An empty block parses as null; treat it as an empty mapping so
                // the missing fields get reported by name.
                Value::Null => Mapping::new(),
                Value::Mapping(mapping) => mapping,
                _ => return Err(ParseError::NotAMapping),
            };
            Ok(ParsedFrontmatter {
                definition: AgentDefinition::from_mapping(mapping)?,
                skipped: Vec::new(),
            })
        }
        ParserMode::Basic => {
            let (mapping, skipped) = fallback::parse_flat(raw);
            Ok(ParsedFrontmatter {
                definition: AgentDefinition::from_mapping(mapping)?,
                skipped,
            })
        }
    }
}

fn scalar_field(field: &str, value: Value) -> Result<Option<String>, ParseError> {
    match value {
        Value::Null => Ok(None),
        other => scalar_to_string(&other)
            .map(Some)
            .ok_or_else(|| ParseError::FieldType {
                field: field.to_string(),
                message: format!("expected a string, found {}", describe(&other)),
            }),
    }
}

/// A scalar as a string, or the original value back when it is structured.
fn optional_scalar(value: Value) -> Result<Option<String>, Value> {
    match value {
        Value::Null => Ok(None),
        other => scalar_to_string(&other).map(Some).ok_or(other),
    }
}

/// A list or comma-separated string of plain entries, or the original value
/// back for any other shape.
fn string_list(value: Value) -> Result<Vec<String>, Value> {
    let items: Vec<String> = match value {
        Value::Null => return Ok(Vec::new()),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Sequence(items) => {
            let scalars: Option<Vec<String>> = items.iter().map(scalar_to_string).collect();
            match scalars {
                Some(scalars) => scalars,
                None => return Err(Value::Sequence(items)),
            }
        }
        other => return Err(other),
    };

    Ok(items
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        _ => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
