//! Composite validator that runs check families in a fixed order.

use std::time::Instant;
use tracing::{debug, info};

use crate::source::SourceAccess;

use super::{
    CheckFamily, DuplicationChecks, Family, QualityChecks, SecurityChecks, ValidationResult,
};

/// Which families a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CheckSelection {
    #[default]
    All,
    Quality,
    Security,
    Duplication,
}

impl CheckSelection {
    /// Families covered by this selection, in execution order.
    pub fn families(&self) -> &'static [Family] {
        match self {
            CheckSelection::All => &Family::ALL,
            CheckSelection::Quality => &[Family::Quality],
            CheckSelection::Security => &[Family::Security],
            CheckSelection::Duplication => &[Family::Duplication],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckSelection::All => "all",
            CheckSelection::Quality => "quality",
            CheckSelection::Security => "security",
            CheckSelection::Duplication => "duplication",
        }
    }
}

impl std::fmt::Display for CheckSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Executes check families against a source tree.
///
/// Every selected check runs; a failing check never stops the ones after it.
pub struct Runner<'a, S: SourceAccess + ?Sized> {
    source: &'a S,
}

impl<'a, S: SourceAccess + ?Sized> Runner<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Run the selected families and return their results in order.
    pub fn run(&self, selection: CheckSelection) -> Vec<ValidationResult> {
        let config = self.source.config();
        info!(
            root = %self.source.project_root().display(),
            source_dir = %config.source_dir.display(),
            language = %config.primary_language,
            selection = %selection,
            "starting validation"
        );

        let mut results = Vec::new();
        for family in selection.families() {
            results.extend(self.run_family(*family));
        }

        results
    }

    /// Run a single family.
    pub fn run_family(&self, family: Family) -> Vec<ValidationResult> {
        match family {
            Family::Quality => run_checks(QualityChecks::new(self.source)),
            Family::Security => run_checks(SecurityChecks::new(self.source)),
            Family::Duplication => run_checks(DuplicationChecks::new(self.source)),
        }
    }
}

fn run_checks<F: CheckFamily>(checks: F) -> Vec<ValidationResult> {
    let start = Instant::now();
    let results = checks.run_all();
    for r in &results {
        debug!(
            check = r.check_name(),
            passed = r.passed(),
            errors = r.errors().len(),
            warnings = r.warnings().len(),
            "check finished"
        );
    }
    debug!(
        family = %checks.family(),
        checks = results.len(),
        failed = results.iter().filter(|r| !r.passed()).count(),
        elapsed = ?start.elapsed(),
        "family finished"
    );
    results
}
