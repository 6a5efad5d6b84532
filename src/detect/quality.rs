//! Code quality checks.
//!
//! File size, line length, function length, branching density, file naming
//! and per-file duplicate imports. All of them are line-level heuristics.

use regex::Regex;
use std::collections::HashSet;

use crate::language::Support;
use crate::source::SourceAccess;

use super::{checks, CheckFamily, Family, ValidationResult};

/// Multiplier applied to `max_complexity` for the whole-file branch count.
///
/// Empirical threshold: the count covers every function in the file, so the
/// per-function limit is scaled up. It is not a cyclomatic complexity.
pub const COMPLEXITY_MULTIPLIER: usize = 3;

/// Tokens counted as branch points by the complexity heuristic.
const BRANCH_KEYWORDS: &[&str] = &["if", "elif", "else", "for", "while", "case", "switch"];

/// Header text longer than this is truncated in messages.
const HEADER_PREVIEW_CHARS: usize = 30;

/// The quality family.
pub struct QualityChecks<'a, S: SourceAccess + ?Sized> {
    source: &'a S,
}

impl<'a, S: SourceAccess + ?Sized> QualityChecks<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Error for each file longer than `max_file_lines`.
    pub fn check_file_size(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::FILE_SIZE, Family::Quality);
        let max_lines = self.source.config().max_file_lines;

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let lines = content.lines().count();
            if lines > max_lines {
                result.add_error(format!(
                    "{}: {} lines (exceeds limit of {})",
                    file.display(),
                    lines,
                    max_lines
                ));
            }
        }

        result
    }

    /// Warning for each line longer than `max_line_length`, trailing
    /// whitespace excluded.
    pub fn check_line_length(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::LINE_LENGTH, Family::Quality);
        let max_length = self.source.config().max_line_length;

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            for (i, line) in content.lines().enumerate() {
                let length = line.trim_end().chars().count();
                if length > max_length {
                    result.add_warning(format!(
                        "{}:{} line length {} (recommended at most {})",
                        file.display(),
                        i + 1,
                        length,
                        max_length
                    ));
                }
            }
        }

        result
    }

    /// Error for each function longer than `max_function_lines`.
    pub fn check_function_length(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let header = match language.function_header() {
            Support::Supported(header) => header,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::FUNCTION_LENGTH,
                    Family::Quality,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::FUNCTION_LENGTH, Family::Quality);
        let max_lines = self.source.config().max_function_lines;

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let lines: Vec<&str> = content.lines().collect();
            for span in function_spans(&lines, header) {
                if span.length > max_lines {
                    result.add_error(format!(
                        "{}:{} function '{}...' is {} lines (exceeds limit of {})",
                        file.display(),
                        span.start + 1,
                        span.preview,
                        span.length,
                        max_lines
                    ));
                }
            }
        }

        result
    }

    /// Warning for files whose branch keyword count exceeds
    /// `max_complexity * COMPLEXITY_MULTIPLIER`.
    pub fn check_complexity(&self) -> ValidationResult {
        let mut result = ValidationResult::new(checks::COMPLEXITY, Family::Quality);
        let limit = self.source.config().max_complexity * COMPLEXITY_MULTIPLIER;

        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let count = branch_keyword_count(&content);
            if count > limit {
                result.add_warning(format!(
                    "{} may be too complex (branch keywords: {}, threshold {})",
                    file.display(),
                    count,
                    limit
                ));
            }
        }

        result
    }

    /// Warning for each file name that does not match the language's
    /// file naming rule.
    pub fn check_naming_conventions(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let convention = match language.naming_convention() {
            Support::Supported(convention) => convention,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::NAMING,
                    Family::Quality,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::NAMING, Family::Quality);
        for file in self.source.enumerate_files() {
            let name = file.file_name();
            if !convention.file.is_match(&name) {
                result.add_warning(format!(
                    "{}: file name '{}' does not follow the {} naming convention",
                    file.display(),
                    name,
                    language
                ));
            }
        }

        result
    }

    /// Warning for each file that repeats an import statement verbatim.
    pub fn check_imports(&self) -> ValidationResult {
        let language = &self.source.config().primary_language;
        let pattern = match language.import_statement() {
            Support::Supported(pattern) => pattern,
            Support::Unsupported => {
                return ValidationResult::skipped_unsupported(
                    checks::IMPORTS,
                    Family::Quality,
                    language.name(),
                )
            }
        };

        let mut result = ValidationResult::new(checks::IMPORTS, Family::Quality);
        for file in self.source.enumerate_files() {
            let Some(content) = self.source.read_file_safely(&file, &mut result) else {
                continue;
            };
            let imports: Vec<&str> = content
                .lines()
                .filter(|line| pattern.is_match(line))
                .map(str::trim)
                .collect();
            let unique: HashSet<&str> = imports.iter().copied().collect();
            if unique.len() < imports.len() {
                result.add_warning(format!("{} has duplicate import statements", file.display()));
            }
        }

        result
    }
}

impl<S: SourceAccess + ?Sized> CheckFamily for QualityChecks<'_, S> {
    fn family(&self) -> Family {
        Family::Quality
    }

    fn run_all(&self) -> Vec<ValidationResult> {
        vec![
            self.check_file_size(),
            self.check_line_length(),
            self.check_function_length(),
            self.check_complexity(),
            self.check_naming_conventions(),
            self.check_imports(),
        ]
    }
}

/// A function located by the header heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FunctionSpan {
    /// Zero-based index of the header line.
    start: usize,
    length: usize,
    preview: String,
}

/// Locate functions by indentation.
///
/// A header opens a function at its indentation. The function closes at the
/// next non-blank line indented at or below the header, or at end of file.
/// Only one function is tracked at a time, so a deeper header replaces the
/// open one.
fn function_spans(lines: &[&str], header: &Regex) -> Vec<FunctionSpan> {
    let mut spans = Vec::new();
    let mut open: Option<(usize, usize, &str)> = None;

    for (i, line) in lines.iter().enumerate() {
        let indent = indentation(line);

        if header.is_match(line) {
            if let Some((start, open_indent, text)) = open {
                if indent <= open_indent {
                    spans.push(span(start, i, text));
                }
            }
            open = Some((i, indent, line.trim()));
            continue;
        }

        if let Some((start, open_indent, text)) = open {
            if !line.trim().is_empty() && indent <= open_indent {
                spans.push(span(start, i, text));
                open = None;
            }
        }
    }

    if let Some((start, _, text)) = open {
        spans.push(span(start, lines.len(), text));
    }

    spans
}

fn span(start: usize, end: usize, header: &str) -> FunctionSpan {
    FunctionSpan {
        start,
        length: end - start,
        preview: header.chars().take(HEADER_PREVIEW_CHARS).collect(),
    }
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Count whitespace-delimited branch keywords across the whole content.
fn branch_keyword_count(content: &str) -> usize {
    content
        .split_whitespace()
        .filter(|token| BRANCH_KEYWORDS.contains(token))
        .count()
}
