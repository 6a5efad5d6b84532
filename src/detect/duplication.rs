//! Duplication checks.
//!
//! Cross-file duplicate function names, repeated import lines and files that
//! share a size and line count. The similar-files check compares no content
//! and will flag unrelated files that happen to match on both numbers.

use std::collections::HashMap;

use crate::language::Support;
use crate::source::SourceAccess;

use super::{checks, CheckFamily, Family, ValidationResult};

/// The duplication family.
pub struct DuplicationChecks<'a, S: SourceAccess + ?Sized> {
    source: &'a S,
}

impl<'a, S: SourceAccess + ?Sized> DuplicationChecks<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Warning when a function name already defined in an earlier file is
    /// defined again. The first file seen owns the name.
    pub fn check_duplicate_functions(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let definitions = match language.function_definition() {
            Support::Supported(definitions) => definitions,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::DUPLICATE_FUNCTIONS,
                    Family::Duplication,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::DUPLICATE_FUNCTIONS, Family::Duplication);
        let mut first_seen: HashMap<String, String> = HashMap::new();

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let path = file.display();
            for name in definitions.names(&content) {
                match first_seen.get(name) {
                    Some(owner) if *owner != path => {
                        result.add_warning(format!(
                            "function '{}' is defined in multiple files: {} and {}",
                            name, owner, path
                        ));
                    }
                    Some(_) => {}
                    None => {
                        first_seen.insert(name.to_string(), path.clone());
                    }
                }
            }
        }

        result
    }

    /// Warning at each line that repeats an earlier import in the same file.
    pub fn check_duplicate_imports(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let pattern = match language.import_line() {
            Support::Supported(pattern) => pattern,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::DUPLICATE_IMPORTS,
                    Family::Duplication,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::DUPLICATE_IMPORTS, Family::Duplication);
        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let mut seen: Vec<&str> = Vec::new();
            for (i, line) in content.lines().enumerate() {
                if !pattern.is_match(line) {
                    continue;
                }
                let statement = line.trim();
                if seen.contains(&statement) {
                    result.add_warning(format!(
                        "{}:{} duplicate import statement",
                        file.display(),
                        i + 1
                    ));
                }
                seen.push(statement);
            }
        }

        result
    }

    /// Warning when a file has the same byte size and line count as an
    /// earlier file.
    pub fn check_similar_files(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::SIMILAR_FILES, Family::Duplication);
        let mut first_seen: HashMap<(u64, usize), String> = HashMap::new();

        for file in self.source.enumerate_files() {
            let Some(stat) = self.source.stat_safely(&file, &mut result) else {
                continue;
            };
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let key = (stat.len, content.lines().count());
            match first_seen.get(&key) {
                Some(owner) => {
                    result.add_warning(format!(
                        "files may be similar: {} and {} (same size and line count)",
                        owner,
                        file.display()
                    ));
                }
                None => {
                    first_seen.insert(key, file.display());
                }
            }
        }

        result
    }
}

impl<S: SourceAccess + ?Sized> CheckFamily for DuplicationChecks<'_, S> {
    fn family(&self) -> Family {
        Family::Duplication
    }

    fn run_all(&self) -> Vec<ValidationResult> {
        vec![
            self.check_duplicate_functions(),
            self.check_duplicate_imports(),
            self.check_similar_files(),
        ]
    }
}
