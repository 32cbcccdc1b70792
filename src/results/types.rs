use std::fmt;
use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one recorded request or test call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestRecord {
    pub description: String,
    pub status: TestStatus,
    /// Only passing records carry a duration.
    pub duration: Option<Duration>,
}

/// Append-only log of outcomes with running counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TestResults {
    records: Vec<TestRecord>,
    passed: u64,
    failed: u64,
    total_duration: Duration,
}

impl TestResults {
    pub(crate) fn record_pass(&mut self, description: &str, duration: Duration) {
        self.records.push(TestRecord {
            description: description.to_owned(),
            status: TestStatus::Pass,
            duration: Some(duration),
        });
        self.passed = self.passed.saturating_add(1);
        self.total_duration = self.total_duration.saturating_add(duration);
    }

    pub(crate) fn record_fail(&mut self, description: &str) {
        self.records.push(TestRecord {
            description: description.to_owned(),
            status: TestStatus::Fail,
            duration: None,
        });
        self.failed = self.failed.saturating_add(1);
    }

    #[must_use]
    pub fn records(&self) -> &[TestRecord] {
        &self.records
    }

    #[must_use]
    pub const fn passed(&self) -> u64 {
        self.passed
    }

    #[must_use]
    pub const fn failed(&self) -> u64 {
        self.failed
    }

    #[must_use]
    pub const fn total_duration(&self) -> Duration {
        self.total_duration
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
