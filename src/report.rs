//! Output formatting for validation results.
//!
//! Supports three output formats:
//! - Console: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - Markdown: a report document for pull requests and wikis
//!
//! Renderers only format; the result list is computed beforehand. Each
//! writer takes the sink explicitly, and colour comes from a [`Theme`]
//! value instead of process-wide state.

use chrono::{DateTime, Local};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::config::ValidationConfig;
use crate::detect::{CheckSelection, Family, ValidationResult};
use crate::summary::{PassRateTier, Summary};

const TOOL_NAME: &str = "sourcecheck";

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

/// Colour policy for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    color: bool,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// No escape codes at all.
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn is_colored(&self) -> bool {
        self.color
    }

    fn success(&self, text: &str) -> String {
        self.paint(text, |s| s.green().to_string())
    }

    fn failure(&self, text: &str) -> String {
        self.paint(text, |s| s.red().to_string())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow().to_string())
    }

    fn heading(&self, text: &str) -> String {
        self.paint(text, |s| s.bold().to_string())
    }

    fn accent(&self, text: &str) -> String {
        self.paint(text, |s| s.cyan().bold().to_string())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}

/// Run metadata shown alongside the results.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub project: String,
    pub timestamp: DateTime<Local>,
    pub selection: CheckSelection,
    pub project_type: String,
    pub language: String,
}

impl ReportMeta {
    /// Metadata for a run starting now.
    pub fn new(
        project: impl Into<String>,
        config: &ValidationConfig,
        selection: CheckSelection,
    ) -> Self {
        Self {
            project: project.into(),
            timestamp: Local::now(),
            selection,
            project_type: config.project_type.clone(),
            language: config.primary_language.name().to_string(),
        }
    }
}

/// Write results in the chosen format.
pub fn render<W: Write>(
    format: OutputFormat,
    out: &mut W,
    results: &[ValidationResult],
    meta: &ReportMeta,
    theme: Theme,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Console => write_console(out, results, meta, theme),
        OutputFormat::Json => write_json(out, results, meta),
        OutputFormat::Markdown => write_markdown(out, results, meta),
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON document.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub project: String,
    pub timestamp: String,
    pub summary: JsonSummary,
    pub results: Vec<JsonCheckResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonCheckResult {
    pub check: String,
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl JsonReport {
    pub fn build(results: &[ValidationResult], meta: &ReportMeta) -> Self {
        let summary = Summary::from_results(results);
        Self {
            project: meta.project.clone(),
            timestamp: meta.timestamp.to_rfc3339(),
            summary: JsonSummary {
                total: summary.total,
                passed: summary.passed,
                failed: summary.failed,
            },
            results: results.iter().map(result_to_json).collect(),
        }
    }
}

fn result_to_json(r: &ValidationResult) -> JsonCheckResult {
    JsonCheckResult {
        check: r.check_name().to_string(),
        passed: r.passed(),
        errors: r.errors().to_vec(),
        warnings: r.warnings().to_vec(),
        info: r.info().to_vec(),
    }
}

/// Write results as a pretty-printed JSON document.
pub fn write_json<W: Write>(
    out: &mut W,
    results: &[ValidationResult],
    meta: &ReportMeta,
) -> anyhow::Result<()> {
    let report = JsonReport::build(results, meta);
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Markdown Format
// =============================================================================

/// Write results as a Markdown report.
pub fn write_markdown<W: Write>(
    out: &mut W,
    results: &[ValidationResult],
    meta: &ReportMeta,
) -> anyhow::Result<()> {
    let summary = Summary::from_results(results);

    writeln!(out, "# Project Validation Report")?;
    writeln!(out)?;
    writeln!(out, "**Project:** {}", meta.project)?;
    writeln!(out, "**Generated:** {}", meta.timestamp.to_rfc3339())?;
    writeln!(out)?;

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "- **Total Checks:** {}", summary.total)?;
    writeln!(out, "- **Passed:** {}", summary.passed)?;
    writeln!(out, "- **Failed:** {}", summary.failed)?;
    writeln!(out)?;

    writeln!(out, "## Results")?;
    writeln!(out)?;
    for r in results {
        let mark = if r.passed() { "✅" } else { "❌" };
        writeln!(out, "### {} {}", mark, r.check_name())?;
        writeln!(out)?;
        write_markdown_list(out, "Errors", r.errors())?;
        write_markdown_list(out, "Warnings", r.warnings())?;
        write_markdown_list(out, "Info", r.info())?;
    }

    Ok(())
}

fn write_markdown_list<W: Write>(out: &mut W, title: &str, items: &[String]) -> anyhow::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(out, "**{}:**", title)?;
    for item in items {
        writeln!(out, "- {}", item)?;
    }
    writeln!(out)?;
    Ok(())
}

// =============================================================================
// Console Format
// =============================================================================

/// Write results in console (human-readable) format.
pub fn write_console<W: Write>(
    out: &mut W,
    results: &[ValidationResult],
    meta: &ReportMeta,
    theme: Theme,
) -> anyhow::Result<()> {
    let summary = Summary::from_results(results);

    write_banner(out, meta, theme)?;

    for family in Family::ALL {
        let members: Vec<&ValidationResult> =
            results.iter().filter(|r| r.family() == family).collect();
        if members.is_empty() {
            continue;
        }
        writeln!(out, "  {}", theme.heading(&format!("Running {} checks...", family.title())))?;
        for r in members {
            if r.passed() {
                writeln!(out, "    {} {}: passed", theme.success("✓"), r.check_name())?;
            } else {
                writeln!(out, "    {} {}: failed", theme.failure("✗"), r.check_name())?;
            }
        }
        writeln!(out)?;
    }

    write_summary(out, &summary, theme)?;
    write_failures(out, results, theme)?;
    write_final_status(out, &summary, theme)?;
    Ok(())
}

fn write_banner<W: Write>(out: &mut W, meta: &ReportMeta, theme: Theme) -> anyhow::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} v{}", theme.accent(TOOL_NAME), env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "  {}{}", theme.dim("Project:  "), meta.project)?;
    writeln!(out, "  {}{}", theme.dim("Checks:   "), meta.selection)?;
    writeln!(out, "  {}{}", theme.dim("Type:     "), meta.project_type)?;
    writeln!(out, "  {}{}", theme.dim("Language: "), meta.language)?;
    writeln!(out)?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, summary: &Summary, theme: Theme) -> anyhow::Result<()> {
    writeln!(out, "  {}", theme.heading("Summary:"))?;
    writeln!(out, "    Total checks: {}", summary.total)?;
    writeln!(out, "    Passed:       {}", theme.success(&summary.passed.to_string()))?;
    writeln!(out, "    Failed:       {}", theme.failure(&summary.failed.to_string()))?;

    let rate = format!("{}%", summary.pass_rate());
    let rate = match summary.tier() {
        PassRateTier::Excellent => theme.success(&rate),
        PassRateTier::Fair => theme.warning(&rate),
        PassRateTier::Poor => theme.failure(&rate),
    };
    writeln!(out, "    Pass rate:    {} ({})", rate, summary.tier().label())?;
    writeln!(out)?;
    Ok(())
}

fn write_failures<W: Write>(
    out: &mut W,
    results: &[ValidationResult],
    theme: Theme,
) -> anyhow::Result<()> {
    let failed: Vec<&ValidationResult> = results.iter().filter(|r| !r.passed()).collect();
    if failed.is_empty() {
        return Ok(());
    }

    writeln!(out, "  {} ({}):", theme.heading("Failed checks"), failed.len())?;
    writeln!(out)?;
    for r in failed {
        writeln!(out, "    {}", theme.failure(r.check_name()))?;
        for e in r.errors() {
            writeln!(out, "      {} {}", theme.failure("ERROR"), e)?;
        }
        for w in r.warnings() {
            writeln!(out, "      {} {}", theme.warning("WARN "), w)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_final_status<W: Write>(
    out: &mut W,
    summary: &Summary,
    theme: Theme,
) -> anyhow::Result<()> {
    if summary.all_passed() {
        writeln!(out, "  {}", theme.success("All checks passed!"))?;
    } else {
        writeln!(
            out,
            "  {}",
            theme.failure(&format!("{} check(s) failed", summary.failed))
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn meta() -> ReportMeta {
        ReportMeta {
            project: "/work/demo".to_string(),
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            selection: CheckSelection::All,
            project_type: "python".to_string(),
            language: "python".to_string(),
        }
    }

    fn results() -> Vec<ValidationResult> {
        let mut size = ValidationResult::new("File Size", Family::Quality);
        size.add_error("src/big.py: 900 lines (exceeds limit of 500)");
        let mut sql = ValidationResult::new("SQL Injection", Family::Security);
        sql.add_warning("src/db.py:4 possible SQL injection (string concatenation in query)");
        let mut unsafe_fns = ValidationResult::new("Unsafe Functions", Family::Security);
        unsafe_fns.add_info("skipped: unsupported language 'dart'");
        vec![size, sql, unsafe_fns]
    }

    fn render_to_string(format: OutputFormat, results: &[ValidationResult]) -> String {
        let mut buf = Vec::new();
        render(format, &mut buf, results, &meta(), Theme::plain()).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_schema() {
        let output = render_to_string(OutputFormat::Json, &results());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["project"], "/work/demo");
        assert!(value["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:30:00"));
        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["summary"]["passed"], 2);
        assert_eq!(value["summary"]["failed"], 1);

        let first = &value["results"][0];
        assert_eq!(first["check"], "File Size");
        assert_eq!(first["passed"], false);
        assert_eq!(first["errors"].as_array().unwrap().len(), 1);
        assert!(first["warnings"].as_array().unwrap().is_empty());
        assert_eq!(value["results"][2]["info"][0], "skipped: unsupported language 'dart'");
    }

    #[test]
    fn test_json_has_no_banner() {
        let output = render_to_string(OutputFormat::Json, &results());
        assert!(output.trim_start().starts_with('{'));
        assert!(!output.contains("check(s) failed"));
    }

    #[test]
    fn test_markdown_sections() {
        let output = render_to_string(OutputFormat::Markdown, &results());

        assert!(output.starts_with("# Project Validation Report\n"));
        assert!(output.contains("**Project:** /work/demo"));
        assert!(output.contains("## Summary"));
        assert!(output.contains("- **Total Checks:** 3"));
        assert!(output.contains("- **Failed:** 1"));
        assert!(output.contains("### ❌ File Size"));
        assert!(output.contains("### ✅ SQL Injection"));
        assert!(output.contains("**Errors:**\n- src/big.py: 900 lines (exceeds limit of 500)"));
        assert!(output.contains("**Warnings:**\n- src/db.py:4"));
        assert!(output.contains("**Info:**\n- skipped: unsupported language 'dart'"));
        assert!(!output.contains("All checks passed!"));
    }

    #[test]
    fn test_console_layout() {
        let output = render_to_string(OutputFormat::Console, &results());

        assert!(output.contains("sourcecheck v"));
        assert!(output.contains("Checks:   all"));
        assert!(output.contains("Running Code Quality checks..."));
        assert!(output.contains("✗ File Size: failed"));
        assert!(output.contains("Running Security checks..."));
        assert!(output.contains("✓ SQL Injection: passed"));
        assert!(!output.contains("Running Duplication checks..."));
        assert!(output.contains("Pass rate:    66% (poor)"));
        assert!(output.contains("ERROR src/big.py: 900 lines"));
        assert!(output.trim_end().ends_with("1 check(s) failed"));

        // Plain theme emits no escape codes
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_console_all_passed() {
        let results = vec![ValidationResult::new("File Size", Family::Quality)];
        let output = render_to_string(OutputFormat::Console, &results);
        assert!(output.contains("Pass rate:    100% (excellent)"));
        assert!(!output.contains("Failed checks"));
        assert!(output.trim_end().ends_with("All checks passed!"));
    }

    #[test]
    fn test_theme_plain_passthrough() {
        let theme = Theme::plain();
        assert!(!theme.is_colored());
        assert_eq!(theme.failure("x"), "x");
        assert_eq!(theme.heading("Summary:"), "Summary:");
    }
}
