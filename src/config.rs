//! Validation configuration.
//!
//! A configuration describes where the sources live, which files count as
//! sources and the numeric thresholds the checks enforce. It is resolved once
//! per run and never mutated afterwards.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::language::Language;

/// Default source directory, relative to the project root.
pub const DEFAULT_SOURCE_DIR: &str = "src";
/// Default set of source file extensions.
pub const DEFAULT_FILE_EXTENSIONS: &[&str] = &[".py", ".js", ".ts", ".dart"];
pub const DEFAULT_MAX_FILE_LINES: usize = 500;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 120;
pub const DEFAULT_MAX_FUNCTION_LINES: usize = 50;
pub const DEFAULT_MAX_COMPLEXITY: usize = 10;

/// Config file names looked up under the project root when `--config` is absent.
const DEFAULT_CONFIG_NAMES: &[&str] = &[
    "validation-config.json",
    "validation-scripts/validation-config.json",
];

/// Errors raised while loading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration document as written by the project scaffolder.
///
/// Every field is optional; absent fields fall back to defaults when the
/// document is resolved into a [`ValidationConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub source_dir: Option<String>,
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub max_file_lines: Option<usize>,
    #[serde(default)]
    pub max_line_length: Option<usize>,
    #[serde(default)]
    pub max_function_lines: Option<usize>,
    #[serde(default)]
    pub max_complexity: Option<usize>,
    #[serde(default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub primary_language: Option<String>,
}

impl ConfigFile {
    /// Parse a configuration document from a JSON file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Find a configuration document under the project root.
    pub fn discover(project_root: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| project_root.join(name))
            .find(|path| path.is_file())
    }
}

/// Fully resolved configuration for one validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    pub source_dir: PathBuf,
    pub file_extensions: BTreeSet<String>,
    pub max_file_lines: usize,
    pub max_line_length: usize,
    pub max_function_lines: usize,
    pub max_complexity: usize,
    pub project_type: String,
    pub primary_language: Language,
}

impl ValidationConfig {
    /// Resolve a document against a project root, filling in defaults and
    /// detecting the project type from marker files when it is not given.
    pub fn resolve(file: ConfigFile, project_root: &Path) -> Self {
        let project_type = file
            .project_type
            .unwrap_or_else(|| detect_project_type(project_root).to_string());
        let primary_language = match file.primary_language {
            Some(lang) => Language::parse(&lang),
            None => Language::parse(language_for_project_type(&project_type)),
        };
        let file_extensions = match file.file_extensions {
            Some(exts) => exts.iter().map(|e| normalize_extension(e)).collect(),
            None => DEFAULT_FILE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        };

        Self {
            source_dir: PathBuf::from(
                file.source_dir
                    .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()),
            ),
            file_extensions,
            max_file_lines: file.max_file_lines.unwrap_or(DEFAULT_MAX_FILE_LINES),
            max_line_length: file.max_line_length.unwrap_or(DEFAULT_MAX_LINE_LENGTH),
            max_function_lines: file
                .max_function_lines
                .unwrap_or(DEFAULT_MAX_FUNCTION_LINES),
            max_complexity: file.max_complexity.unwrap_or(DEFAULT_MAX_COMPLEXITY),
            project_type,
            primary_language,
        }
    }

    /// Configuration with every default applied.
    pub fn defaults(project_root: &Path) -> Self {
        Self::resolve(ConfigFile::default(), project_root)
    }
}

/// Detect the project type from well-known marker files.
pub fn detect_project_type(project_root: &Path) -> &'static str {
    const MARKERS: &[(&str, &str)] = &[
        ("pubspec.yaml", "flutter"),
        ("package.json", "javascript"),
        ("requirements.txt", "python"),
        ("go.mod", "go"),
    ];

    MARKERS
        .iter()
        .find(|(marker, _)| project_root.join(marker).exists())
        .map(|(_, kind)| *kind)
        .unwrap_or("generic")
}

/// Map a project type (detected or scaffolded) to its primary language.
pub fn language_for_project_type(project_type: &str) -> &'static str {
    match project_type {
        "flutter" | "flutter-app" => "dart",
        "javascript" | "web-app" => "javascript",
        "python" => "python",
        "go" => "go",
        _ => "unknown",
    }
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim();
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
