//! Aggregate outcome of a run: counts, pass-rate tier and exit status.

use crate::detect::ValidationResult;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;

/// Pass-rate tier boundaries (percent, inclusive lower bounds).
pub mod tiers {
    pub const EXCELLENT_MIN: u32 = 90;
    pub const FAIR_MIN: u32 = 70;
}

/// Pass/fail counts over a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }

    /// Percentage of passed checks, rounded down. Zero when nothing ran.
    pub fn pass_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.passed * 100 / self.total) as u32
    }

    pub fn tier(&self) -> PassRateTier {
        PassRateTier::from_rate(self.pass_rate())
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Display-only bucketing of the pass rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassRateTier {
    Excellent,
    Fair,
    Poor,
}

impl PassRateTier {
    pub fn from_rate(rate: u32) -> Self {
        match rate {
            r if r >= tiers::EXCELLENT_MIN => PassRateTier::Excellent,
            r if r >= tiers::FAIR_MIN => PassRateTier::Fair,
            _ => PassRateTier::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PassRateTier::Excellent => "excellent",
            PassRateTier::Fair => "fair",
            PassRateTier::Poor => "poor",
        }
    }
}

/// Process exit code for a result list: success only if every check passed.
pub fn exit_code(results: &[ValidationResult]) -> i32 {
    if results.iter().all(|r| r.passed()) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Family;

    fn results(outcomes: &[bool]) -> Vec<ValidationResult> {
        outcomes
            .iter()
            .enumerate()
            .map(|(i, ok)| {
                let mut r = ValidationResult::new(format!("check {}", i), Family::Quality);
                if !ok {
                    r.add_error("failed");
                }
                r
            })
            .collect()
    }

    #[test]
    fn test_summary_counts() {
        let summary = Summary::from_results(&results(&[true, false, true, true]));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pass_rate(), 75);
        assert_eq!(summary.tier(), PassRateTier::Fair);
    }

    #[test]
    fn test_empty_run() {
        let summary = Summary::from_results(&[]);
        assert_eq!(summary.pass_rate(), 0);
        assert_eq!(summary.tier(), PassRateTier::Poor);
        assert_eq!(exit_code(&[]), EXIT_SUCCESS);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(PassRateTier::from_rate(100), PassRateTier::Excellent);
        assert_eq!(PassRateTier::from_rate(90), PassRateTier::Excellent);
        assert_eq!(PassRateTier::from_rate(89), PassRateTier::Fair);
        assert_eq!(PassRateTier::from_rate(70), PassRateTier::Fair);
        assert_eq!(PassRateTier::from_rate(69), PassRateTier::Poor);
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&results(&[true, true])), EXIT_SUCCESS);
        assert_eq!(exit_code(&results(&[true, false])), EXIT_FAILED);

        // Warnings alone never fail a run
        let mut warned = ValidationResult::new("warned", Family::Security);
        warned.add_warning("careful");
        assert_eq!(exit_code(&[warned]), EXIT_SUCCESS);
    }
}
