use bswd_review::config::AppConfig;
use bswd_review::error::AppError;
use bswd_review::review::{
    write_csv, ApplicationAnalysis, ApplicationRecord, ApplicationReviewService, BatchRequest,
    BatchSummary, IssueSeverity,
};
use clap::Args;
use serde_json::Value;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding one application, an array of applications, or {"applications": [...]}
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Also write one CSV row per application to this path
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Use template reasoning only, even when a provider is configured
    #[arg(long)]
    pub(crate) offline: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        input,
        csv,
        offline,
    } = args;

    let service = if offline {
        ApplicationReviewService::template_only()
    } else {
        let config = AppConfig::load()?;
        ApplicationReviewService::from_config(&config.reasoning)?
    };

    let records = load_records(&input)?;
    let summary = service.analyze_batch(&records).await?;

    render_summary(&summary);

    if let Some(path) = csv {
        let writer = BufWriter::new(File::create(&path)?);
        write_csv(writer, &summary.analyses)?;
        println!("\nCSV report written to {}", path.display());
    }

    Ok(())
}

pub(crate) fn load_records(path: &Path) -> Result<Vec<ApplicationRecord>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    parse_records(&raw)
}

fn parse_records(raw: &str) -> Result<Vec<ApplicationRecord>, AppError> {
    let value: Value = serde_json::from_str(raw)?;

    let records: Vec<ApplicationRecord> = if value.is_array() {
        serde_json::from_value(value)?
    } else if value.get("applications").is_some() {
        serde_json::from_value::<BatchRequest>(value)?.applications
    } else {
        vec![serde_json::from_value(value)?]
    };

    Ok(records)
}

fn render_summary(summary: &BatchSummary) {
    println!("BSWD application review");
    println!(
        "- {} application(s) | {} approved | {} manual review | {} rejected",
        summary.total_applications,
        summary.approved,
        summary.needs_manual_review,
        summary.rejected
    );
    println!(
        "- approval rate {:.0}% | manual review rate {:.0}%",
        summary.approval_rate * 100.0,
        summary.manual_review_rate * 100.0
    );

    for analysis in &summary.analyses {
        render_analysis(analysis);
    }
}

fn render_analysis(analysis: &ApplicationAnalysis) {
    let scoring = &analysis.scoring;
    println!(
        "\n{} | score {:.1} | {}",
        analysis.application_id, scoring.score, analysis.overall_status
    );

    let financial = &analysis.financial_analysis;
    println!(
        "  need ${:.2} | requested ${:.2} | {}",
        financial.total_need,
        financial.total_requested,
        match analysis.funding_ratio {
            Some(ratio) => format!("ratio {ratio:.3}"),
            None => "no equipment costs".to_string(),
        }
    );
    if !financial.within_cap {
        println!(
            "  over the annual cap by ${:.2}",
            financial.exceeds_cap_by
        );
    }

    match scoring.recommended_funding {
        Some(amount) => println!("  recommended funding ${amount:.2}"),
        None => println!("  no funding recommended"),
    }
    if scoring.requires_human_review {
        println!("  flagged for human review");
    }

    println!("  {} [{}]", scoring.reasoning, analysis.reasoning_source);
    for factor in &scoring.risk_factors {
        println!("  - {factor}");
    }

    for issue in &analysis.equipment_review {
        let marker = match issue.severity {
            IssueSeverity::Violation => "violation",
            IssueSeverity::Warning => "warning",
        };
        println!("  * {marker}: {} ({})", issue.item, issue.issue);
    }
}
