//! Export summary and reporting
//!
//! Per-identifier outcomes and the batch-level rollup that is logged
//! once the whole run has finished.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{BusinessIdentifier, ExporterError};

/// Result of one identifier's export task
#[derive(Debug)]
pub enum ExportOutcome {
    /// The report file was written
    Written {
        identifier: BusinessIdentifier,
        path: PathBuf,
        bytes: usize,
    },

    /// The export failed; the rest of the batch is unaffected
    Failed {
        identifier: BusinessIdentifier,
        error: ExporterError,
    },
}

impl ExportOutcome {
    /// The identifier this outcome belongs to.
    pub fn identifier(&self) -> &BusinessIdentifier {
        match self {
            ExportOutcome::Written { identifier, .. } => identifier,
            ExportOutcome::Failed { identifier, .. } => identifier,
        }
    }

    /// Whether the export produced a file.
    pub fn is_success(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }
}

/// Summary of one export batch
#[derive(Debug)]
pub struct BatchSummary {
    /// Number of identifiers the batch was started with
    pub total: usize,

    /// Number of reports written
    pub succeeded: usize,

    /// Number of identifiers whose export failed
    pub failed: usize,

    /// Wall-clock duration of the batch
    pub duration: Duration,

    /// Every outcome, in completion-collection order
    pub outcomes: Vec<ExportOutcome>,
}

impl BatchSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self {
            total: 0,
            succeeded: 0,
            failed: 0,
            duration: Duration::from_secs(0),
            outcomes: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record one finished task
    pub fn record(&mut self, outcome: ExportOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(outcome);
    }

    /// The failed outcomes only
    pub fn failures(&self) -> impl Iterator<Item = &ExportOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Check if every identifier produced a file
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Export batch completed"
        );

        if self.failed > 0 {
            tracing::warn!(failed = self.failed, "Batch completed with failures");
            for outcome in self.failures() {
                if let ExportOutcome::Failed { identifier, error } = outcome {
                    tracing::warn!(
                        identifier = %identifier,
                        error = %error,
                        "Export failure"
                    );
                }
            }
        }
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(raw: &str) -> ExportOutcome {
        let identifier = BusinessIdentifier::parse(raw).unwrap();
        let path = PathBuf::from(format!("out/{}.pdf", identifier.id));
        ExportOutcome::Written {
            identifier,
            path,
            bytes: 1024,
        }
    }

    fn failed(raw: &str) -> ExportOutcome {
        let identifier = BusinessIdentifier::parse(raw).unwrap();
        let error = ExporterError::ExportFailed {
            identifier: identifier.id.to_string(),
            reason: "service error".to_string(),
        };
        ExportOutcome::Failed { identifier, error }
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::new();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.is_successful());
        assert_eq!(summary.success_rate(), 100.0);
    }

    #[test]
    fn test_record_counts_outcomes() {
        let mut summary = BatchSummary::new();
        summary.total = 3;
        summary.record(written("111"));
        summary.record(failed("222"));
        summary.record(written("333k"));

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_successful());
        assert_eq!(summary.outcomes.len(), 3);
    }

    #[test]
    fn test_failures_are_tagged_with_identifier() {
        let mut summary = BatchSummary::new();
        summary.total = 2;
        summary.record(written("111"));
        summary.record(failed("222"));

        let failures: Vec<_> = summary.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].identifier().id.as_str(), "222");
    }

    #[test]
    fn test_success_rate() {
        let mut summary = BatchSummary::new();
        summary.total = 4;
        summary.record(written("1"));
        summary.record(written("2"));
        summary.record(written("3"));
        summary.record(failed("4"));

        assert_eq!(summary.success_rate(), 75.0);
    }

    #[test]
    fn test_with_duration() {
        let summary = BatchSummary::new().with_duration(Duration::from_secs(90));
        assert_eq!(summary.duration, Duration::from_secs(90));
    }
}
