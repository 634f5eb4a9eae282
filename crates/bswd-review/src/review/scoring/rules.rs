use super::super::eligibility::EligibilityResult;
use super::{DeductionKind, ScoreComponent, ScoreInputs, ScoreStage};

pub(crate) const STARTING_SCORE: f64 = 100.0;
pub(crate) const ELIGIBILITY_PENALTY: f64 = 33.0;
pub(crate) const FUNDING_LIMIT_PENALTY: f64 = 30.0;
pub const PROVINCIAL_LIMIT: f64 = 2_000.0;
pub const FEDERAL_FULL_TIME_LIMIT: f64 = 20_000.0;

/// Apply the three deduction stages in order, clamping at zero after each one.
pub(crate) fn score_inputs(inputs: &ScoreInputs<'_>) -> (Vec<ScoreComponent>, f64, Option<f64>) {
    let mut components = Vec::new();
    let mut score = STARTING_SCORE;

    score = apply_stage(score, eligibility_stage(inputs.eligibility), &mut components);
    score = apply_stage(score, funding_limit_stage(inputs), &mut components);

    let ratio = funding_ratio(inputs.total_funding, inputs.equipment_cost);
    score = apply_stage(score, ratio_stage(inputs, ratio), &mut components);

    let score = (score.clamp(0.0, 100.0) * 10.0).round() / 10.0;
    (components, score, ratio)
}

/// `None` when there is no equipment cost to compare against.
fn funding_ratio(total_funding: f64, equipment_cost: f64) -> Option<f64> {
    if equipment_cost > 0.0 {
        Some(total_funding / equipment_cost)
    } else {
        None
    }
}

fn apply_stage(
    score: f64,
    stage: Vec<ScoreComponent>,
    components: &mut Vec<ScoreComponent>,
) -> f64 {
    let deducted: f64 = stage.iter().map(|component| component.points).sum();
    components.extend(stage);
    (score + deducted).max(0.0)
}

fn deduction(stage: ScoreStage, kind: DeductionKind, points: f64, notes: String) -> ScoreComponent {
    ScoreComponent {
        stage,
        kind,
        points: -points,
        notes,
    }
}

fn eligibility_stage(eligibility: &EligibilityResult) -> Vec<ScoreComponent> {
    let mut stage = Vec::new();
    if !eligibility.has_disability {
        stage.push(deduction(
            ScoreStage::Eligibility,
            DeductionKind::MissingDisability,
            ELIGIBILITY_PENALTY,
            "no verified permanent or persistent-prolonged disability".to_string(),
        ));
    }
    if !eligibility.is_full_time {
        stage.push(deduction(
            ScoreStage::Eligibility,
            DeductionKind::NotFullTime,
            ELIGIBILITY_PENALTY,
            "not enrolled as a full-time student".to_string(),
        ));
    }
    if eligibility.has_osap_restrictions {
        stage.push(deduction(
            ScoreStage::Eligibility,
            DeductionKind::OsapRestrictions,
            ELIGIBILITY_PENALTY,
            "OSAP restrictions on file".to_string(),
        ));
    }
    stage
}

fn funding_limit_stage(inputs: &ScoreInputs<'_>) -> Vec<ScoreComponent> {
    let mut stage = Vec::new();

    if inputs.provincial_need > PROVINCIAL_LIMIT {
        stage.push(deduction(
            ScoreStage::FundingLimit,
            DeductionKind::ProvincialOverLimit,
            FUNDING_LIMIT_PENALTY,
            format!(
                "provincial funding {:.2} exceeds the BSWD limit of {PROVINCIAL_LIMIT:.2}",
                inputs.provincial_need
            ),
        ));
    }

    if inputs.federal_need > 0.0 {
        if !inputs.osap_program.eligible_for_csg() {
            stage.push(deduction(
                ScoreStage::FundingLimit,
                DeductionKind::FederalIneligible,
                FUNDING_LIMIT_PENALTY,
                format!(
                    "federal funding {:.2} requested without full-time OSAP ({})",
                    inputs.federal_need,
                    inputs.osap_program.label()
                ),
            ));
        } else if inputs.federal_need > FEDERAL_FULL_TIME_LIMIT {
            stage.push(deduction(
                ScoreStage::FundingLimit,
                DeductionKind::FederalOverCap,
                FUNDING_LIMIT_PENALTY,
                format!(
                    "federal funding {:.2} exceeds the CSG limit of {FEDERAL_FULL_TIME_LIMIT:.2}",
                    inputs.federal_need
                ),
            ));
        }
    }

    stage
}

fn ratio_stage(inputs: &ScoreInputs<'_>, ratio: Option<f64>) -> Vec<ScoreComponent> {
    let Some(ratio) = ratio else {
        return vec![deduction(
            ScoreStage::Ratio,
            DeductionKind::NoEquipmentCost,
            60.0,
            format!(
                "funding of {:.2} requested with no equipment or service costs",
                inputs.total_funding
            ),
        )];
    };

    let (kind, points, notes) = if ratio >= 4.0 {
        (
            DeductionKind::SevereOverFunding,
            60.0,
            format!("funding is {ratio:.2}x equipment cost (severe over-funding)"),
        )
    } else if ratio >= 2.0 {
        (
            DeductionKind::MajorOverFunding,
            30.0,
            format!("funding is {ratio:.2}x equipment cost (major over-funding)"),
        )
    } else if ratio > 1.2 {
        (
            DeductionKind::FundingExcess,
            15.0,
            format!("funding exceeds equipment cost by more than 20% (ratio {ratio:.3})"),
        )
    } else if ratio >= 1.0 {
        let tens = ((ratio - 1.0) * 100.0 / 10.0).floor();
        (
            DeductionKind::GraduatedExcess,
            tens * 2.0,
            format!("funding exceeds equipment cost by {:.1}%", (ratio - 1.0) * 100.0),
        )
    } else if ratio <= 0.5 {
        (
            DeductionKind::MajorFundingGap,
            15.0,
            format!("funding covers only {:.1}% of equipment cost", ratio * 100.0),
        )
    } else {
        (
            DeductionKind::MinorFundingGap,
            5.0,
            format!("funding covers {:.1}% of equipment cost", ratio * 100.0),
        )
    };

    if points > 0.0 {
        vec![deduction(ScoreStage::Ratio, kind, points, notes)]
    } else {
        Vec::new()
    }
}
