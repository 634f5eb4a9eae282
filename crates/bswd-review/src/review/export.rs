use std::io::Write;

use serde::Serialize;

use super::equipment::IssueSeverity;
use super::service::ApplicationAnalysis;

const HEADER: [&str; 13] = [
    "application_id",
    "status",
    "score",
    "requires_human_review",
    "recommended_funding",
    "total_need",
    "total_requested",
    "exceeds_cap_by",
    "funding_ratio",
    "failed_checks",
    "equipment_violations",
    "reasoning_source",
    "reasoning",
];

/// Flat CSV row for spreadsheet review of a batch. Fields follow `HEADER` order.
#[derive(Debug, Serialize)]
struct AnalysisRow<'a> {
    application_id: &'a str,
    status: &'static str,
    score: f64,
    requires_human_review: bool,
    recommended_funding: Option<f64>,
    total_need: f64,
    total_requested: f64,
    exceeds_cap_by: f64,
    funding_ratio: Option<f64>,
    failed_checks: String,
    equipment_violations: usize,
    reasoning_source: String,
    reasoning: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Io(#[from] std::io::Error),
}

/// Write the header, then one row per analysis in order. An empty batch still gets the header.
pub fn write_csv<W: Write>(writer: W, analyses: &[ApplicationAnalysis]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for analysis in analyses {
        csv_writer.serialize(AnalysisRow {
            application_id: &analysis.application_id.0,
            status: analysis.overall_status.label(),
            score: analysis.scoring.score,
            requires_human_review: analysis.scoring.requires_human_review,
            recommended_funding: analysis.scoring.recommended_funding,
            total_need: analysis.financial_analysis.total_need,
            total_requested: analysis.financial_analysis.total_requested,
            exceeds_cap_by: analysis.financial_analysis.exceeds_cap_by,
            funding_ratio: analysis.funding_ratio,
            failed_checks: analysis.deterministic_checks.failed_checks.join("; "),
            equipment_violations: analysis
                .equipment_review
                .iter()
                .filter(|issue| issue.severity == IssueSeverity::Violation)
                .count(),
            reasoning_source: analysis.reasoning_source.to_string(),
            reasoning: &analysis.scoring.reasoning,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
