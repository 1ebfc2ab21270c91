//! Terminal display logic for homoglyph-check.
//!
//! Incremental result lines while the run is in progress, then the full
//! results table and a summary. Uses only the `console` crate.

use console::{measure_text_width, pad_str, style, Alignment, StyledObject};
use homoglyph_check_lib::{AvailabilityStatus, Progress, Report, ReportRow, ReportSummary};

/// Column headings of the results table.
pub const COLUMNS: [&str; 3] = ["Original Domain", "Punycode", "Availability"];

// ── Header ───────────────────────────────────────────────────────────────────

/// Print the banner shown before the first lookup.
pub fn print_header(domain: &str, candidate_count: usize, registrar: &str) {
    println!("Checking domain availability...");
    println!(
        "{}",
        style(format!(
            "{} candidate{} for {} via {}",
            candidate_count,
            if candidate_count == 1 { "" } else { "s" },
            domain,
            registrar
        ))
        .dim()
    );
    println!("{}", COLUMNS.join(" | "));
    println!("{}", "-".repeat(COLUMNS.iter().map(|c| c.len()).sum::<usize>() + 6));
}

// ── Single result line ───────────────────────────────────────────────────────

/// Print one row as soon as its check completes.
pub fn print_row(row: &ReportRow, progress: Progress) {
    println!("{}", format_row(row, progress));
}

/// Incremental result line. Only the original domain may be shortened; the
/// encoded form is what the operator copies, so it is always shown in full.
pub fn format_row(row: &ReportRow, progress: Progress) -> String {
    let domain_width = 30;
    let padded_domain = pad_str(&row.domain, domain_width, Alignment::Left, Some(".."));
    let padded_encoded = pad_str(&row.encoded, domain_width, Alignment::Left, None);

    format!(
        "{} {}  {}  {}",
        style(format!("[{}/{}]", progress.position, progress.total)).dim(),
        style(padded_domain).white(),
        style(padded_encoded).dim(),
        styled_status(&row.status),
    )
}

fn styled_status(status: &AvailabilityStatus) -> StyledObject<String> {
    let text = status.to_string();
    match status {
        AvailabilityStatus::Available => style(text).green().bold(),
        AvailabilityStatus::Unavailable => style(text).red(),
        AvailabilityStatus::Other(_) => style(text).yellow(),
        AvailabilityStatus::RateLimited | AvailabilityStatus::MaxRetriesReached => {
            style(text).yellow().bold()
        }
        AvailabilityStatus::Error(_) => style(text).red().dim(),
    }
}

// ── Full results table ───────────────────────────────────────────────────────

/// Render the report as a bordered table with left-aligned columns.
///
/// Column widths are measured in terminal cells, so wide and combining
/// characters in the original domain keep the borders aligned.
pub fn render_table(report: &Report) -> String {
    let rows: Vec<[String; 3]> = report
        .iter()
        .map(|row| {
            [
                row.domain.clone(),
                row.encoded.clone(),
                row.status.to_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(measure_text_width);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let border = {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", segments.join("+"))
    };

    let line = |cells: [&str; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {} ", pad_str(cell, width, Alignment::Left, None)))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&line(COLUMNS));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in &rows {
        out.push_str(&line([row[0].as_str(), row[1].as_str(), row[2].as_str()]));
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// One-line status counts printed after the table.
pub fn format_summary(summary: &ReportSummary, skipped: usize) -> String {
    let mut line = format!(
        "Summary: {} checked, {} available, {} unavailable, {} other",
        summary.total, summary.available, summary.unavailable, summary.other
    );
    if skipped > 0 {
        line.push_str(&format!(", {} skipped (not encodable)", skipped));
    }
    line
}

pub fn print_summary(summary: &ReportSummary, skipped: usize) {
    let line = format_summary(summary, skipped);
    if summary.available > 0 {
        println!("{}", style(line).green());
    } else {
        println!("{}", style(line).dim());
    }
}

// ── Dry run ──────────────────────────────────────────────────────────────────

/// Format one `--dry-run` line: the candidate and, if different, its ASCII form.
pub fn format_candidate(domain: &str, encoded: &str) -> String {
    if domain == encoded {
        domain.to_string()
    } else {
        format!("{} ({})", domain, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(rows: &[(&str, &str, AvailabilityStatus)]) -> Report {
        let mut report = Report::new();
        for (domain, encoded, status) in rows {
            report.push(ReportRow::new(
                domain.to_string(),
                encoded.to_string(),
                status.clone(),
            ));
        }
        report
    }

    #[test]
    fn test_format_row_keeps_long_punycode() {
        let encoded = "xn--pple-43da0b1c2d3e4f5g6h7i8j9k.com";
        assert!(encoded.len() > 30);
        let row = ReportRow::new(
            "аpple.com".to_string(),
            encoded.to_string(),
            AvailabilityStatus::Available,
        );

        let line = console::strip_ansi_codes(&format_row(
            &row,
            Progress {
                position: 3,
                total: 18,
            },
        ))
        .to_string();

        assert!(line.starts_with("[3/18] аpple.com"), "{}", line);
        assert!(line.contains(encoded), "{}", line);
        assert!(line.ends_with("AVAILABLE"), "{}", line);
    }

    #[test]
    fn test_render_table_layout() {
        let table = render_table(&report(&[
            ("aa.com", "aa.com", AvailabilityStatus::Unavailable),
            ("a4.com", "a4.com", AvailabilityStatus::Available),
        ]));

        let expected = "\
+-----------------+----------+--------------+
| Original Domain | Punycode | Availability |
+-----------------+----------+--------------+
| aa.com          | aa.com   | UNAVAILABLE  |
| a4.com          | a4.com   | AVAILABLE    |
+-----------------+----------+--------------+
";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_table_widens_for_long_cells() {
        let table = render_table(&report(&[(
            "аpple.com",
            "xn--pple-43d.com",
            AvailabilityStatus::RateLimited,
        )]));

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("xn--pple-43d.com"));
        assert!(lines[3].contains("Rate limit exceeded"));

        // every line has the same display width
        let width = measure_text_width(lines[0]);
        assert!(lines.iter().all(|l| measure_text_width(l) == width));
    }

    #[test]
    fn test_render_empty_table() {
        let table = render_table(&Report::new());
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn test_format_summary() {
        let summary = ReportSummary {
            total: 4,
            available: 1,
            unavailable: 2,
            other: 1,
        };
        assert_eq!(
            format_summary(&summary, 0),
            "Summary: 4 checked, 1 available, 2 unavailable, 1 other"
        );
        assert!(format_summary(&summary, 2).ends_with(", 2 skipped (not encodable)"));
    }

    #[test]
    fn test_format_candidate() {
        assert_eq!(format_candidate("a4.com", "a4.com"), "a4.com");
        assert_eq!(
            format_candidate("bücher.com", "xn--bcher-kva.com"),
            "bücher.com (xn--bcher-kva.com)"
        );
    }
}
