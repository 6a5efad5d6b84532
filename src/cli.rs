//! Command-line interface for sourcecheck.

use anyhow::Context;
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigFile, ValidationConfig};
use crate::detect::{CheckSelection, Runner};
use crate::report::{self, OutputFormat, ReportMeta, Theme};
use crate::source::FsSource;
use crate::summary;

pub use crate::summary::{EXIT_FAILED, EXIT_SUCCESS};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SOURCECHECK_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Heuristic project validation: code quality, security and duplication checks.
///
/// Sourcecheck scans the configured source directory with pattern-based
/// checks and exits non-zero when any check reports an error.
#[derive(Parser, Debug)]
#[command(name = "sourcecheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root to validate
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Which check families to run
    #[arg(long, value_enum, default_value_t = CheckSelection::All)]
    pub check: CheckSelection,

    /// Path to a JSON configuration file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Source directory relative to the project root (overrides the config)
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
    pub output: OutputFormat,
}

/// Install the stderr log subscriber. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Load the configuration document for a run.
///
/// An explicit path wins over discovery. A document that cannot be read or
/// parsed is reported on stderr and replaced by an empty one.
fn load_config_file(explicit: Option<&Path>, project_root: &Path) -> ConfigFile {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match ConfigFile::discover(project_root) {
            Some(p) => p,
            None => return ConfigFile::default(),
        },
    };

    match ConfigFile::parse_file(&path) {
        Ok(file) => {
            info!(config = %path.display(), "loaded configuration");
            file
        }
        Err(e) => {
            warn!(error = %e, "falling back to default configuration");
            eprintln!("Warning: {}; using default configuration", e);
            ConfigFile::default()
        }
    }
}

/// Resolve the effective configuration from the file and command-line overrides.
pub fn resolve_config(cli: &Cli, project_root: &Path) -> ValidationConfig {
    let mut file = load_config_file(cli.config.as_deref(), project_root);
    if let Some(dir) = &cli.source_dir {
        file.source_dir = Some(dir.to_string_lossy().to_string());
    }
    ValidationConfig::resolve(file, project_root)
}

/// Run a validation, writing the report to stdout.
pub fn run_validate(cli: &Cli) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let color = !cli.no_color && stdout.is_terminal();
    let mut out = stdout.lock();
    run_validate_to(cli, &mut out, Theme::new(color))
}

/// Run a validation, writing the report to `out`.
pub fn run_validate_to<W: Write>(cli: &Cli, out: &mut W, theme: Theme) -> anyhow::Result<i32> {
    if !cli.path.exists() {
        eprintln!("Error: project path does not exist: {}", cli.path.display());
        return Ok(EXIT_FAILED);
    }

    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("cannot access path {}", cli.path.display()))?;

    let config = resolve_config(cli, &root);
    let meta = ReportMeta::new(root.to_string_lossy(), &config, cli.check);
    let source = FsSource::new(&root, config);

    let results = Runner::new(&source).run(cli.check);

    report::render(cli.output, out, &results, &meta, theme)?;
    out.flush()?;

    Ok(summary::exit_code(&results))
}
