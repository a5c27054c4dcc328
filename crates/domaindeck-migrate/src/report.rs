use serde::Serialize;
use serde_json::Value;

/// Result of executing one statement against the remote endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatementOutcome {
    Success {
        /// 1-based position of the statement in the script.
        index: usize,
        payload: Value,
    },
    Failure {
        index: usize,
        detail: String,
    },
}

impl StatementOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Failure { index, .. } => *index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Aggregate result of running one script's statements.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MigrationReport {
    /// Number of statements in the input, attempted or not.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// One entry per failed statement, formatted `Statement <n>: <detail>`.
    pub errors: Vec<String>,
    pub outcomes: Vec<StatementOutcome>,
}

impl MigrationReport {
    /// True when a stop-on-error halt left statements unattempted.
    pub fn halted_early(&self) -> bool {
        self.succeeded + self.failed < self.total
    }

    /// One-line tally for progress output.
    pub fn summary(&self) -> String {
        let attempted = self.succeeded + self.failed;
        if attempted < self.total {
            format!(
                "{attempted} of {} statements attempted: {} succeeded, {} failed, stopped early",
                self.total, self.succeeded, self.failed
            )
        } else {
            format!(
                "{} statements: {} succeeded, {} failed",
                self.total, self.succeeded, self.failed
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MigrationReport, StatementOutcome};
    use serde_json::json;

    #[test]
    fn complete_run_is_not_halted() {
        let report = MigrationReport {
            total: 3,
            succeeded: 2,
            failed: 1,
            ..Default::default()
        };
        assert!(!report.halted_early());
        assert_eq!(report.summary(), "3 statements: 2 succeeded, 1 failed");
    }

    #[test]
    fn partial_run_reports_early_stop() {
        let report = MigrationReport {
            total: 4,
            succeeded: 1,
            failed: 1,
            ..Default::default()
        };
        assert!(report.halted_early());
        assert_eq!(
            report.summary(),
            "2 of 4 statements attempted: 1 succeeded, 1 failed, stopped early"
        );
    }

    #[test]
    fn outcome_accessors() {
        let ok = StatementOutcome::Success {
            index: 1,
            payload: json!([]),
        };
        let bad = StatementOutcome::Failure {
            index: 2,
            detail: "relation already exists".into(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.index(), 1);
        assert!(!bad.is_success());
        assert_eq!(bad.index(), 2);
    }

    #[test]
    fn report_serializes_with_tagged_outcomes() {
        let report = MigrationReport {
            total: 1,
            succeeded: 1,
            failed: 0,
            errors: vec![],
            outcomes: vec![StatementOutcome::Success {
                index: 1,
                payload: serde_json::Value::Null,
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["outcomes"][0]["status"], "success");
        assert_eq!(value["outcomes"][0]["index"], 1);
    }
}
