//! Result rows and the sink that receives them as they are produced.

use crate::types::AvailabilityStatus;
use serde::Serialize;

/// One checked candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Candidate as generated (may contain non-ASCII characters)
    pub domain: String,
    /// ASCII-compatible form sent to the registrar
    pub encoded: String,
    /// Outcome of the availability check
    #[serde(flatten)]
    pub status: AvailabilityStatus,
}

impl ReportRow {
    pub fn new(domain: String, encoded: String, status: AvailabilityStatus) -> Self {
        Self {
            domain,
            encoded,
            status,
        }
    }
}

/// Rows in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

/// Status counts over a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub available: usize,
    pub unavailable: usize,
    /// Other classifications, throttled and failed checks
    pub other: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }

    /// Rows the registrar reported as registrable.
    pub fn available(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.status.is_available())
    }

    pub fn summary(&self) -> ReportSummary {
        self.rows
            .iter()
            .fold(ReportSummary::default(), |mut summary, row| {
                summary.total += 1;
                match row.status {
                    AvailabilityStatus::Available => summary.available += 1,
                    AvailabilityStatus::Unavailable => summary.unavailable += 1,
                    _ => summary.other += 1,
                }
                summary
            })
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a ReportRow;
    type IntoIter = std::slice::Iter<'a, ReportRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Where a row stands in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based position of the candidate among all generated candidates
    pub position: usize,
    /// Number of generated candidates, including ones that fail to encode
    pub total: usize,
}

/// Receives each row as soon as its check completes.
pub trait ReportSink {
    fn on_row(&mut self, row: &ReportRow, progress: Progress);
}

impl<F> ReportSink for F
where
    F: FnMut(&ReportRow, Progress),
{
    fn on_row(&mut self, row: &ReportRow, progress: Progress) {
        self(row, progress)
    }
}

/// Sink that ignores every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn on_row(&mut self, _row: &ReportRow, _progress: Progress) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(domain: &str, status: AvailabilityStatus) -> ReportRow {
        ReportRow::new(domain.to_string(), domain.to_string(), status)
    }

    #[test]
    fn test_report_keeps_insertion_order() {
        let mut report = Report::new();
        report.push(row("aa.com", AvailabilityStatus::Unavailable));
        report.push(row("a4.com", AvailabilityStatus::Available));
        report.push(row("4a.com", AvailabilityStatus::RateLimited));

        let domains: Vec<&str> = report.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(domains, vec!["aa.com", "a4.com", "4a.com"]);
        assert_eq!(report.len(), 3);
        assert_eq!(report.available().count(), 1);
    }

    #[test]
    fn test_summary() {
        let mut report = Report::new();
        report.push(row("aa.com", AvailabilityStatus::Unavailable));
        report.push(row("a4.com", AvailabilityStatus::Available));
        report.push(row("4a.com", AvailabilityStatus::RateLimited));
        report.push(row("44.com", AvailabilityStatus::Error("boom".to_string())));
        report.push(row("a0.com", AvailabilityStatus::Other("RESERVED".to_string())));

        assert_eq!(
            report.summary(),
            ReportSummary {
                total: 5,
                available: 1,
                unavailable: 1,
                other: 3,
            }
        );
        assert_eq!(Report::new().summary(), ReportSummary::default());
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |row: &ReportRow, progress: Progress| {
                seen.push((row.domain.clone(), progress.position));
            };
            sink.on_row(
                &row("aa.com", AvailabilityStatus::Available),
                Progress {
                    position: 1,
                    total: 4,
                },
            );
        }
        assert_eq!(seen, vec![("aa.com".to_string(), 1)]);
    }

    #[test]
    fn test_row_json_shape() {
        let json = serde_json::to_value(row(
            "xn--80ak6aa92e.com",
            AvailabilityStatus::Error("boom".to_string()),
        ))
        .unwrap();

        assert_eq!(json["domain"], "xn--80ak6aa92e.com");
        assert_eq!(json["status"], "error");
        assert_eq!(json["detail"], "boom");
    }
}
