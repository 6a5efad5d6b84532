//! Sourcecheck - heuristic project validation.
//!
//! Sourcecheck scans a project's source directory with regex and
//! token-count heuristics grouped into three families:
//!
//! - Quality: file size, line length, function length, complexity,
//!   naming conventions, duplicate imports
//! - Security: hardcoded secrets, SQL injection, unsafe functions,
//!   file permissions
//! - Duplication: duplicate functions, duplicate imports, similar files
//!
//! # Architecture
//!
//! - `config`: configuration document, defaults and project-type detection
//! - `language`: per-language pattern registry
//! - `source`: source enumeration and the `SourceAccess` capability
//! - `detect`: check families and the composite `Runner`
//! - `summary`: pass-rate and exit-status policy
//! - `report`: console, JSON and Markdown renderers
//!
//! Checks compute a full list of [`ValidationResult`]s; rendering happens
//! afterwards and never feeds back into the results.

pub mod cli;
pub mod config;
pub mod detect;
pub mod language;
pub mod report;
pub mod source;
pub mod summary;

pub use config::{ConfigError, ConfigFile, ValidationConfig};
pub use detect::{CheckFamily, CheckSelection, Family, Runner, ValidationResult};
pub use language::{Language, Support};
pub use report::{OutputFormat, ReportMeta, Theme};
pub use source::{FsSource, SourceAccess, SourceFile};
pub use summary::{exit_code, Summary};
