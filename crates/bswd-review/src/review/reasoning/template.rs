use super::super::equipment::IssueSeverity;
use super::super::scoring::{
    ScoreComponent, ScoreStage, FEDERAL_FULL_TIME_LIMIT, PROVINCIAL_LIMIT,
};
use super::{Reasoning, ReasoningContext};

/// Deterministic explanation naming the single dominant cause behind the score.
pub fn template_reasoning(context: &ReasoningContext) -> Reasoning {
    Reasoning {
        reasoning: format!(
            "Confidence score {:.1} ({}). {}",
            context.score,
            context.status,
            dominant_cause(context)
        ),
        risk_factors: risk_factors(context),
    }
}

fn dominant_cause(context: &ReasoningContext) -> String {
    let funding = format_currency(context.total_funding);
    let equipment = format_currency(context.equipment_cost);

    if context.provincial_need > PROVINCIAL_LIMIT {
        return format!(
            "Provincial funding of {} exceeds the BSWD limit of {} by {}.",
            format_currency(context.provincial_need),
            format_currency(PROVINCIAL_LIMIT),
            format_currency(context.provincial_need - PROVINCIAL_LIMIT)
        );
    }

    if context.federal_need > 0.0 && !context.osap_program.eligible_for_csg() {
        return format!(
            "Federal funding of {} was requested, but the CSG (up to {}) is only available to \
             full-time OSAP recipients and this application lists OSAP as {}.",
            format_currency(context.federal_need),
            format_currency(FEDERAL_FULL_TIME_LIMIT),
            context.osap_program.label()
        );
    }

    let Some(ratio) = context.funding_ratio else {
        return format!(
            "Funding of {funding} was requested with no equipment or service costs to support it."
        );
    };

    if ratio > 1.2 {
        format!(
            "Funding of {funding} exceeds equipment costs of {equipment} by {} (ratio {ratio:.3}).",
            format_currency(context.total_funding - context.equipment_cost)
        )
    } else if ratio > 1.0 {
        format!(
            "Funding of {funding} is within 20% of equipment costs of {equipment}, an overage of {} \
             ({:.1}%).",
            format_currency(context.total_funding - context.equipment_cost),
            (ratio - 1.0) * 100.0
        )
    } else if ratio <= 0.5 {
        format!(
            "Funding of {funding} covers only {:.1}% of equipment costs of {equipment}, leaving a \
             gap of {}.",
            ratio * 100.0,
            format_currency(context.equipment_cost - context.total_funding)
        )
    } else if ratio < 1.0 {
        format!(
            "Funding of {funding} leaves a minor gap of {} against equipment costs of {equipment} \
             (ratio {ratio:.3}).",
            format_currency(context.equipment_cost - context.total_funding)
        )
    } else {
        format!("Funding of {funding} matches equipment costs of {equipment} exactly.")
    }
}

fn risk_factors(context: &ReasoningContext) -> Vec<String> {
    let mut factors = context.failed_checks.clone();

    factors.extend(
        context
            .components
            .iter()
            .filter(|component| component.points < 0.0)
            .filter(|component| !is_eligibility(component))
            .map(|component| component.notes.clone()),
    );

    factors.extend(
        context
            .equipment_issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Violation)
            .map(|issue| format!("{}: {}", issue.item, issue.issue)),
    );

    factors
}

// eligibility deductions already appear as failed checks
fn is_eligibility(component: &ScoreComponent) -> bool {
    component.stage == ScoreStage::Eligibility
}

/// `$1,234.56` style formatting; negative amounts keep a leading minus.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (index, digit) in dollars.chars().enumerate() {
        if index > 0 && (dollars.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
