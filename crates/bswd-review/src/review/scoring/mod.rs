mod policy;
mod rules;

pub use policy::{
    classify_score, recommended_funding, requires_human_review, APPROVAL_THRESHOLD,
    HUMAN_REVIEW_FLOOR, MANUAL_REVIEW_THRESHOLD,
};
pub use rules::{FEDERAL_FULL_TIME_LIMIT, PROVINCIAL_LIMIT};

use super::domain::{OsapProgram, ReviewStatus};
use super::eligibility::EligibilityResult;
use super::reasoning::Reasoning;
use serde::{Deserialize, Serialize};

/// Everything the deduction stages read from an application.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    pub eligibility: &'a EligibilityResult,
    pub osap_program: OsapProgram,
    pub provincial_need: f64,
    pub federal_need: f64,
    pub total_funding: f64,
    pub equipment_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStage {
    Eligibility,
    FundingLimit,
    Ratio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    MissingDisability,
    NotFullTime,
    OsapRestrictions,
    ProvincialOverLimit,
    FederalIneligible,
    FederalOverCap,
    NoEquipmentCost,
    SevereOverFunding,
    MajorOverFunding,
    FundingExcess,
    GraduatedExcess,
    MajorFundingGap,
    MinorFundingGap,
}

/// Discrete deduction applied during scoring, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub stage: ScoreStage,
    pub kind: DeductionKind,
    pub points: f64,
    pub notes: String,
}

/// Score plus the decision derived from it, before any reasoning is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub score: f64,
    pub status: ReviewStatus,
    pub requires_human_review: bool,
    pub recommended_funding: Option<f64>,
    pub funding_ratio: Option<f64>,
    pub components: Vec<ScoreComponent>,
}

impl ScoreCard {
    pub fn evaluate(inputs: &ScoreInputs<'_>, total_requested: f64) -> Self {
        let (components, score, funding_ratio) = rules::score_inputs(inputs);
        let status = classify_score(score);

        Self {
            score,
            status,
            requires_human_review: requires_human_review(score),
            recommended_funding: recommended_funding(status, total_requested),
            funding_ratio,
            components,
        }
    }
}

/// Deterministic 0-100 confidence score for one application.
pub fn compute_confidence_score(
    eligibility: &EligibilityResult,
    osap_program: OsapProgram,
    provincial_need: f64,
    federal_need: f64,
    total_funding: f64,
    equipment_cost: f64,
) -> f64 {
    let inputs = ScoreInputs {
        eligibility,
        osap_program,
        provincial_need,
        federal_need,
        total_funding,
        equipment_cost,
    };
    rules::score_inputs(&inputs).1
}

/// Final scoring output with reasoning attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub score: f64,
    pub status: ReviewStatus,
    pub reasoning: String,
    pub risk_factors: Vec<String>,
    pub requires_human_review: bool,
    pub recommended_funding: Option<f64>,
}

impl ScoringResult {
    pub fn from_card(card: &ScoreCard, reasoning: Reasoning) -> Self {
        Self {
            score: card.score,
            status: card.status,
            reasoning: reasoning.reasoning,
            risk_factors: reasoning.risk_factors,
            requires_human_review: card.requires_human_review,
            recommended_funding: card.recommended_funding,
        }
    }
}
