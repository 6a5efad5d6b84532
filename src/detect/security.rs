//! Security checks.
//!
//! Hardcoded secrets, SQL injection, unsafe function calls and file
//! permissions. Pattern matches only; nothing here understands scope or
//! data flow.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::language::Support;
use crate::source::SourceAccess;

use super::{checks, CheckFamily, Family, ValidationResult};

/// Group/other write bits.
const LOOSE_WRITE_BITS: u32 = 0o022;

lazy_static! {
    /// Assignments of a quoted literal to a credential-like name.
    static ref SECRET_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r#"(?i)password\s*=\s*["'][^"']+["']"#).unwrap(),
            "hardcoded password",
        ),
        (
            Regex::new(r#"(?i)api[_-]?key\s*=\s*["'][^"']+["']"#).unwrap(),
            "hardcoded API key",
        ),
        (
            Regex::new(r#"(?i)secret[_-]?key\s*=\s*["'][^"']+["']"#).unwrap(),
            "hardcoded secret key",
        ),
        (
            Regex::new(r#"(?i)token\s*=\s*["'][^"']+["']"#).unwrap(),
            "hardcoded token",
        ),
    ];

    /// Environment variable accessors. One anywhere in a file clears the
    /// whole file of secret errors.
    static ref ENV_ACCESSOR: Regex =
        Regex::new(r"process\.env|os\.environ|getenv|Platform\.environment|env::var").unwrap();

    static ref SQL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (
            Regex::new(r#"(?i)query.*\+.*["']"#).unwrap(),
            "string concatenation in query",
        ),
        (
            Regex::new(r#"(?i)execute.*\+.*["']"#).unwrap(),
            "string concatenation in execute",
        ),
        (
            Regex::new(r#"(?i)f["'].*SELECT.*\{"#).unwrap(),
            "interpolated SELECT statement",
        ),
        (
            Regex::new(r"(?i)\$.*SELECT.*\$").unwrap(),
            "template SELECT statement",
        ),
    ];
}

/// The security family.
pub struct SecurityChecks<'a, S: SourceAccess + ?Sized> {
    source: &'a S,
}

impl<'a, S: SourceAccess + ?Sized> SecurityChecks<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Error per hardcoded credential, unless the file reads the environment.
    pub fn check_hardcoded_secrets(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::HARDCODED_SECRETS, Family::Security);

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            if ENV_ACCESSOR.is_match(&content) {
                debug!(
                    file = %file.display(),
                    "environment accessor present, secrets check suppressed"
                );
                continue;
            }
            for (i, line) in content.lines().enumerate() {
                for (pattern, description) in SECRET_PATTERNS.iter() {
                    for _ in pattern.find_iter(line) {
                        result.add_error(format!(
                            "{}:{} {}",
                            file.display(),
                            i + 1,
                            description
                        ));
                    }
                }
            }
        }

        result
    }

    /// Warning per line that builds a query from strings.
    pub fn check_sql_injection(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::SQL_INJECTION, Family::Security);

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            for (i, line) in content.lines().enumerate() {
                if let Some((_, description)) =
                    SQL_PATTERNS.iter().find(|(pattern, _)| pattern.is_match(line))
                {
                    result.add_warning(format!(
                        "{}:{} possible SQL injection ({})",
                        file.display(),
                        i + 1,
                        description
                    ));
                }
            }
        }

        result
    }

    /// Warning per call to a deny-listed function.
    pub fn check_unsafe_functions(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let functions = match language.unsafe_functions() {
            Support::Supported(functions) => functions,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::UNSAFE_FUNCTIONS,
                    Family::Security,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::UNSAFE_FUNCTIONS, Family::Security);
        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            for (i, line) in content.lines().enumerate() {
                for function in functions {
                    for _ in function.call.find_iter(line) {
                        result.add_warning(format!(
                            "{}:{} uses unsafe function '{}'",
                            file.display(),
                            i + 1,
                            function.name
                        ));
                    }
                }
            }
        }

        result
    }

    /// Warning for files writable by group or others.
    pub fn check_file_permissions(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::FILE_PERMISSIONS, Family::Security);
        if !cfg!(unix) {
            result.add_info("skipped: file permissions are not checked on this platform");
            return result;
        }

        for file in self.source.enumerate_files() {
            let Some(stat) = self.source.stat_safely(&file, &mut result) else {
                continue;
            };
            if let Some(mode) = stat.mode {
                if mode & LOOSE_WRITE_BITS != 0 {
                    result.add_warning(format!(
                        "{}: permissions too open (mode {:o})",
                        file.display(),
                        mode & 0o777
                    ));
                }
            }
        }

        result
    }
}

impl<S: SourceAccess + ?Sized> CheckFamily for SecurityChecks<'_, S> {
    fn family(&self) -> Family {
        Family::Security
    }

    fn run_all(&self) -> Vec<ValidationResult> {
        vec![
            self.check_hardcoded_secrets(),
            self.check_sql_injection(),
            self.check_unsafe_functions(),
            self.check_file_permissions(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::detect::fixture;

    fn config(language: &str) -> ConfigFile {
        ConfigFile {
            primary_language: Some(language.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_hardcoded_password() {
        let (_temp, source) = fixture(
            &[("src/settings.py", "password = \"abc123\"\n")],
            config("python"),
        );

        let result = SecurityChecks::new(&source).check_hardcoded_secrets();
        assert!(!result.passed());
        assert_eq!(result.errors(), ["src/settings.py:1 hardcoded password"]);
    }

    #[test]
    fn test_env_accessor_suppresses_whole_file() {
        let (_temp, source) = fixture(
            &[(
                "src/settings.py",
                concat!(
                    "import os\n",
                    "password = \"abc123\"\n",
                    "api_key = \"k-1\"\n",
                    "\n",
                    "DEBUG = os.environ.get('DEBUG')\n",
                ),
            )],
            config("python"),
        );

        let result = SecurityChecks::new(&source).check_hardcoded_secrets();
        assert!(result.passed());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_secret_patterns_are_case_insensitive() {
        let (_temp, source) = fixture(
            &[(
                "src/client.js",
                "const API_KEY = 'live-123';\nlet authToken = \"t\";\nconst secret = 1;\n",
            )],
            config("javascript"),
        );

        let result = SecurityChecks::new(&source).check_hardcoded_secrets();
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors()[0].contains("API key"));
        assert!(result.errors()[1].contains("token"));
    }

    #[test]
    fn test_sql_injection_is_warning_only() {
        let (_temp, source) = fixture(
            &[(
                "src/db.py",
                concat!(
                    "query = \"SELECT * FROM users WHERE name = '\" + name + \"'\"\n",
                    "q = f\"SELECT * FROM t WHERE id = {x}\"\n",
                    "safe = 1\n",
                ),
            )],
            config("python"),
        );

        let result = SecurityChecks::new(&source).check_sql_injection();
        assert!(result.passed());
        assert_eq!(result.warnings().len(), 2);
        assert!(result.warnings()[0].starts_with("src/db.py:1"));
        assert!(result.warnings()[1].starts_with("src/db.py:2"));
    }

    #[test]
    fn test_sql_execute_and_template_patterns() {
        let (_temp, source) = fixture(
            &[
                (
                    "src/repo.dart",
                    "var sql = \"$prefix SELECT * FROM t WHERE id = $id\";\nvar ok = 1;\n",
                ),
                (
                    "src/db.js",
                    "db.execute(\"DELETE FROM users WHERE id = \" + id + \";\");\n",
                ),
            ],
            config("javascript"),
        );

        let result = SecurityChecks::new(&source).check_sql_injection();
        assert!(result.passed());
        assert_eq!(
            result.warnings(),
            [
                "src/db.js:1 possible SQL injection (string concatenation in execute)",
                "src/repo.dart:1 possible SQL injection (template SELECT statement)"
            ]
        );
    }

    #[test]
    fn test_unsafe_functions_per_occurrence() {
        let (_temp, source) = fixture(
            &[(
                "src/run.py",
                "value = eval(expr)\nexec(code); eval(other)\nevaluate(x)\n",
            )],
            config("python"),
        );

        let result = SecurityChecks::new(&source).check_unsafe_functions();
        assert!(result.passed());
        assert_eq!(result.warnings().len(), 3);
        assert_eq!(result.warnings()[0], "src/run.py:1 uses unsafe function 'eval'");
    }

    #[test]
    fn test_unsafe_functions_skipped_for_dart() {
        let (_temp, source) = fixture(&[("lib/main.dart", "void main() {}\n")], config("dart"));
        let result = SecurityChecks::new(&source).check_unsafe_functions();
        assert!(result.passed());
        assert_eq!(result.info(), ["skipped: unsupported language 'dart'"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_world_writable_file() {
        use std::os::unix::fs::PermissionsExt;

        let (temp, source) = fixture(
            &[("src/open.py", "x = 1\n"), ("src/closed.py", "y = 2\n")],
            config("python"),
        );
        let open = temp.path().join("src/open.py");
        std::fs::set_permissions(&open, std::fs::Permissions::from_mode(0o666)).unwrap();
        let closed = temp.path().join("src/closed.py");
        std::fs::set_permissions(&closed, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = SecurityChecks::new(&source).check_file_permissions();
        assert!(result.passed());
        assert_eq!(result.warnings().len(), 1);
        assert!(result.warnings()[0].contains("src/open.py"));
        assert!(result.warnings()[0].contains("666"));
    }
}
