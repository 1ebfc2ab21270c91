//! Main homoglyph checker implementation.
//!
//! `HomoglyphChecker` ties the pieces together for one base domain: expand it
//! into look-alike candidates, encode each one, check availability and hand
//! every row to a sink before pausing for the next candidate.

use crate::availability::AvailabilityClient;
use crate::confusables::ConfusableMap;
use crate::generate::expand;
use crate::protocols::Registrar;
use crate::report::{Progress, Report, ReportRow, ReportSink};
use crate::types::RetryPolicy;
use crate::utils::to_ascii;
use std::time::Duration;

/// Sequential look-alike checker.
///
/// # Example
///
/// ```rust,no_run
/// use homoglyph_check_lib::{
///     CheckConfig, ConfusableMap, HomoglyphChecker, RegistrarBackend, ReportRow, Progress,
/// };
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = CheckConfig::default();
///     let map = ConfusableMap::from_entries([("o", vec!["o", "0"])])?;
///     let registrar = RegistrarBackend::from_config(&config).await?;
///     let checker = HomoglyphChecker::new(map, registrar, config.retry, config.pacing);
///
///     let report = checker
///         .run("google.com", &mut |row: &ReportRow, _: Progress| {
///             println!("{} -> {}", row.domain, row.status)
///         })
///         .await;
///     println!("{} rows", report.len());
///     Ok(())
/// }
/// ```
pub struct HomoglyphChecker<R> {
    confusables: ConfusableMap,
    client: AvailabilityClient<R>,
    /// Pause between consecutive candidates
    pacing: Duration,
}

impl<R: Registrar> HomoglyphChecker<R> {
    pub fn new(
        confusables: ConfusableMap,
        registrar: R,
        retry: RetryPolicy,
        pacing: Duration,
    ) -> Self {
        Self {
            confusables,
            client: AvailabilityClient::new(registrar, retry),
            pacing,
        }
    }

    pub fn confusables(&self) -> &ConfusableMap {
        &self.confusables
    }

    pub fn client(&self) -> &AvailabilityClient<R> {
        &self.client
    }

    /// Check every encodable look-alike of `base_domain`.
    ///
    /// Candidates are processed one at a time in generation order. A
    /// candidate that cannot be encoded is skipped. Per-candidate failures
    /// end up as row statuses, so the run itself cannot fail.
    pub async fn run<S: ReportSink + ?Sized>(&self, base_domain: &str, sink: &mut S) -> Report {
        let candidates = expand(base_domain, &self.confusables);
        let total = candidates.total();
        let mut report = Report::new();

        tracing::debug!(
            "Checking {} candidates for {} via {}",
            total,
            base_domain,
            self.client.registrar().name()
        );

        let mut candidates = candidates.enumerate().peekable();
        while let Some((index, candidate)) = candidates.next() {
            let Some(encoded) = to_ascii(&candidate) else {
                tracing::debug!("Skipping '{}': not encodable", candidate);
                continue;
            };

            let status = self.client.check(&encoded).await;
            let row = ReportRow::new(candidate, encoded, status);
            sink.on_row(
                &row,
                Progress {
                    position: index + 1,
                    total,
                },
            );
            report.push(row);

            if candidates.peek().is_some() && !self.pacing.is_zero() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        report
    }
}

/// Encodable look-alikes of `base_domain` paired with their ASCII form,
/// without contacting any registrar.
pub fn encodable_candidates(base_domain: &str, map: &ConfusableMap) -> Vec<(String, String)> {
    expand(base_domain, map)
        .filter_map(|candidate| to_ascii(&candidate).map(|encoded| (candidate, encoded)))
        .collect()
}
