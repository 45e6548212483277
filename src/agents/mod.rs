//! Agent definition files: Markdown documents with YAML frontmatter.
//!
//! # Example
//!
//! ```markdown
//! ---
//! name: code-reviewer
//! description: Reviews pull requests. Use proactively after code changes.
//! tools: Read, Grep, Glob
//! ---
//! # Code Reviewer
//!
//! You review code for correctness and style...
//! ```
//!
//! The frontmatter is parsed either with full YAML or, for degraded
//! environments, with a flat `key: value` parser.

pub mod definition;
pub mod discovery;
pub mod fallback;
pub mod frontmatter;

pub use definition::{parse_frontmatter, AgentDefinition, ParsedFrontmatter, ParserMode, ToolsField};
pub use discovery::{discover_agent_files, Discovery};
pub use frontmatter::Document;
