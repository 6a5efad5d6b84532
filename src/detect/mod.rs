//! Detection module: check families and the composite runner.

mod duplication;
mod quality;
mod runner;
mod security;
mod types;

pub use duplication::DuplicationChecks;
pub use quality::{QualityChecks, COMPLEXITY_MULTIPLIER};
pub use runner::{CheckSelection, Runner};
pub use security::SecurityChecks;
pub use types::{checks, Family, ValidationResult};

/// A group of checks that runs in declaration order.
pub trait CheckFamily {
    fn family(&self) -> Family;

    /// Run every check of the family. Never short-circuits.
    fn run_all(&self) -> Vec<ValidationResult>;
}

/// Write `files` under a fresh project root and resolve `config` against it.
#[cfg(test)]
pub(crate) fn fixture(
    files: &[(&str, &str)],
    config: crate::config::ConfigFile,
) -> (tempfile::TempDir, crate::source::FsSource) {
    let temp = tempfile::TempDir::new().unwrap();
    for (path, content) in files {
        let full = temp.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
    let mut config = config;
    if config.source_dir.is_none() {
        config.source_dir = files
            .first()
            .and_then(|(path, _)| path.split('/').next())
            .map(str::to_string);
    }
    let resolved = crate::config::ValidationConfig::resolve(config, temp.path());
    let source = crate::source::FsSource::new(temp.path(), resolved);
    (temp, source)
}
