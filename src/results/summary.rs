use super::TestResults;

/// One line per record in insertion order, then duration, pass and fail
/// totals.
#[must_use]
pub fn report_lines(results: &TestResults) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len().saturating_add(3));
    for record in results.records() {
        lines.push(format!("Test \"{}\": {}", record.description, record.status));
    }
    lines.push(format!("Duration: {}ms", results.total_duration().as_millis()));
    lines.push(format!("{} PASS", results.passed()));
    lines.push(format!("{} FAIL", results.failed()));
    lines
}
