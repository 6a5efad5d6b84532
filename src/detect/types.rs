//! Core types for check results.

/// A named group of checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Quality,
    Security,
    Duplication,
}

impl Family {
    /// Fixed execution order when every family runs.
    pub const ALL: [Family; 3] = [Family::Quality, Family::Security, Family::Duplication];

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Quality => "quality",
            Family::Security => "security",
            Family::Duplication => "duplication",
        }
    }

    /// Human-readable family title.
    pub fn title(&self) -> &'static str {
        match self {
            Family::Quality => "Code Quality",
            Family::Security => "Security",
            Family::Duplication => "Duplication",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Check names, in declaration order within each family.
pub mod checks {
    pub const FILE_SIZE: &str = "File Size";
    pub const LINE_LENGTH: &str = "Line Length";
    pub const FUNCTION_LENGTH: &str = "Function Length";
    pub const COMPLEXITY: &str = "Code Complexity";
    pub const NAMING: &str = "Naming Conventions";
    pub const IMPORTS: &str = "Imports";

    pub const HARDCODED_SECRETS: &str = "Hardcoded Secrets";
    pub const SQL_INJECTION: &str = "SQL Injection";
    pub const UNSAFE_FUNCTIONS: &str = "Unsafe Functions";
    pub const FILE_PERMISSIONS: &str = "File Permissions";

    pub const DUPLICATE_FUNCTIONS: &str = "Duplicate Functions";
    pub const DUPLICATE_IMPORTS: &str = "Duplicate Imports";
    pub const SIMILAR_FILES: &str = "Similar Files";
}

/// Outcome of a single check.
///
/// Passes until the first error is recorded. Warnings and info never change
/// the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    check_name: String,
    family: Family,
    passed: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
}

impl ValidationResult {
    pub fn new(check_name: impl Into<String>, family: Family) -> Self {
        Self {
            check_name: check_name.into(),
            family,
            passed: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
        }
    }

    /// A passing result for a check the language has no patterns for.
    pub fn skipped_unsupported(check_name: &str, family: Family, language: &str) -> Self {
        let mut result = Self::new(check_name, family);
        result.add_info(format!("skipped: unsupported language '{}'", language));
        result
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.passed = false;
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_info(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }

    pub fn check_name(&self) -> &str {
        &self.check_name
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }
}
