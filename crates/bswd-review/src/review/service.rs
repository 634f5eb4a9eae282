use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ReasoningBackend, ReasoningConfig};

use super::domain::{ApplicationId, ApplicationRecord, ReviewStatus, ScoreRequest};
use super::eligibility::{run_eligibility_checks, EligibilityResult};
use super::equipment::{validate_equipment, EquipmentIssue};
use super::financial::{analyze_financials, FinancialSummary};
use super::intake::{IntakeGuard, IntakeViolation};
use super::reasoning::{
    generate_reasoning, DynReasoningProvider, OpenAiReasoning, ReasoningContext, ReasoningError,
    ReasoningSource,
};
use super::scoring::{ScoreCard, ScoreComponent, ScoreInputs, ScoringResult};

/// Deterministic part of a review: everything except the reasoning narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationAssessment {
    pub eligibility: EligibilityResult,
    pub financial: FinancialSummary,
    pub equipment_issues: Vec<EquipmentIssue>,
    pub card: ScoreCard,
}

/// Run the eligibility, financial, equipment, and scoring stages for one record.
pub fn assess_application(record: &ApplicationRecord) -> ApplicationAssessment {
    let eligibility = run_eligibility_checks(
        record.disability_type,
        record.study_type,
        record.has_osap_restrictions,
    );
    let financial = analyze_financials(
        record.provincial_need,
        record.federal_need,
        &record.requested_items,
    );
    let equipment_issues = validate_equipment(&record.requested_items);

    let inputs = ScoreInputs {
        eligibility: &eligibility,
        osap_program: record.osap_application,
        provincial_need: record.provincial_need,
        federal_need: record.federal_need,
        total_funding: financial.total_need,
        equipment_cost: financial.total_requested,
    };
    let card = ScoreCard::evaluate(&inputs, financial.total_requested);

    ApplicationAssessment {
        eligibility,
        financial,
        equipment_issues,
        card,
    }
}

/// Score-only response for a [`ScoreRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub confidence_score: f64,
    pub status: ReviewStatus,
    pub requires_human_review: bool,
    pub recommended_funding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_ratio: Option<f64>,
    pub failed_checks: Vec<String>,
    pub components: Vec<ScoreComponent>,
}

/// Score a request without running equipment validation or reasoning.
pub fn score_request(request: &ScoreRequest) -> ScoreSummary {
    let eligibility = run_eligibility_checks(
        request.disability_type,
        request.study_type,
        request.has_osap_restrictions,
    );
    let equipment_cost = request.equipment_cost();

    let inputs = ScoreInputs {
        eligibility: &eligibility,
        osap_program: request.osap_application,
        provincial_need: request.provincial_need,
        federal_need: request.federal_need,
        total_funding: request.total_funding(),
        equipment_cost,
    };
    let card = ScoreCard::evaluate(&inputs, equipment_cost);

    ScoreSummary {
        confidence_score: card.score,
        status: card.status,
        requires_human_review: card.requires_human_review,
        recommended_funding: card.recommended_funding,
        funding_ratio: card.funding_ratio,
        failed_checks: eligibility.failed_checks,
        components: card.components,
    }
}

/// Full review response for one application.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationAnalysis {
    pub application_id: ApplicationId,
    pub deterministic_checks: EligibilityResult,
    pub financial_analysis: FinancialSummary,
    pub equipment_review: Vec<EquipmentIssue>,
    pub scoring: ScoringResult,
    pub components: Vec<ScoreComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_ratio: Option<f64>,
    pub reasoning_source: ReasoningSource,
    pub overall_status: ReviewStatus,
    pub analysis_timestamp: DateTime<Utc>,
}

/// Aggregate counts for a batch of reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_applications: usize,
    pub approved: usize,
    pub rejected: usize,
    pub needs_manual_review: usize,
    pub approval_rate: f64,
    pub manual_review_rate: f64,
    pub analyses: Vec<ApplicationAnalysis>,
}

impl BatchSummary {
    pub fn from_analyses(analyses: Vec<ApplicationAnalysis>) -> Self {
        let count = |status: ReviewStatus| {
            analyses
                .iter()
                .filter(|analysis| analysis.overall_status == status)
                .count()
        };

        let total_applications = analyses.len();
        let approved = count(ReviewStatus::Approved);
        let rejected = count(ReviewStatus::Rejected);
        let needs_manual_review = count(ReviewStatus::NeedsManualReview);
        let rate = |value: usize| {
            if total_applications == 0 {
                0.0
            } else {
                value as f64 / total_applications as f64
            }
        };

        Self {
            total_applications,
            approved,
            rejected,
            needs_manual_review,
            approval_rate: rate(approved),
            manual_review_rate: rate(needs_manual_review),
            analyses,
        }
    }
}

/// Service composing intake validation, the scoring pipeline, and reasoning.
pub struct ApplicationReviewService {
    guard: IntakeGuard,
    reasoning: Option<DynReasoningProvider>,
    reasoning_timeout: Duration,
}

impl ApplicationReviewService {
    pub fn new(reasoning: Option<DynReasoningProvider>, reasoning_timeout: Duration) -> Self {
        Self {
            guard: IntakeGuard,
            reasoning,
            reasoning_timeout,
        }
    }

    /// Deterministic template reasoning only.
    pub fn template_only() -> Self {
        Self::new(None, ReasoningConfig::template_only().timeout)
    }

    pub fn from_config(config: &ReasoningConfig) -> Result<Self, ReasoningError> {
        let reasoning: Option<DynReasoningProvider> = match &config.backend {
            ReasoningBackend::Template => None,
            ReasoningBackend::OpenAi { api_key } => Some(Arc::new(OpenAiReasoning::new(
                api_key.clone(),
                config.model.clone(),
                config.timeout,
            )?)),
        };

        Ok(Self::new(reasoning, config.timeout))
    }

    pub fn reasoning_provider(&self) -> Option<&'static str> {
        self.reasoning.as_ref().map(|provider| provider.name())
    }

    /// Validate and review a single application.
    pub async fn analyze(
        &self,
        record: &ApplicationRecord,
    ) -> Result<ApplicationAnalysis, IntakeViolation> {
        self.guard.validate(record)?;
        Ok(self.review(record).await)
    }

    /// Validate and score a request that carries no applicant identity.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreSummary, IntakeViolation> {
        self.guard.validate_score_request(request)?;
        let summary = score_request(request);

        debug!(
            score = summary.confidence_score,
            status = %summary.status,
            "score request evaluated"
        );

        Ok(summary)
    }

    /// Validate every record up front, then review them concurrently in input order.
    pub async fn analyze_batch(
        &self,
        records: &[ApplicationRecord],
    ) -> Result<BatchSummary, IntakeViolation> {
        for record in records {
            self.guard.validate(record)?;
        }

        let analyses = join_all(records.iter().map(|record| self.review(record))).await;
        let summary = BatchSummary::from_analyses(analyses);

        info!(
            total = summary.total_applications,
            approved = summary.approved,
            rejected = summary.rejected,
            needs_manual_review = summary.needs_manual_review,
            "batch review complete"
        );

        Ok(summary)
    }

    async fn review(&self, record: &ApplicationRecord) -> ApplicationAnalysis {
        let ApplicationAssessment {
            eligibility,
            financial,
            equipment_issues,
            card,
        } = assess_application(record);

        let context = ReasoningContext {
            application_id: record.application_id.clone(),
            score: card.score,
            status: card.status,
            osap_program: record.osap_application,
            provincial_need: record.provincial_need,
            federal_need: record.federal_need,
            total_funding: financial.total_need,
            equipment_cost: financial.total_requested,
            funding_ratio: card.funding_ratio,
            failed_checks: eligibility.failed_checks.clone(),
            components: card.components.clone(),
            equipment_issues: equipment_issues.clone(),
        };

        let (reasoning, reasoning_source) =
            generate_reasoning(self.reasoning.as_deref(), self.reasoning_timeout, &context).await;

        info!(
            application_id = %record.application_id,
            score = card.score,
            status = %card.status,
            source = ?reasoning_source,
            "application reviewed"
        );

        ApplicationAnalysis {
            application_id: record.application_id.clone(),
            deterministic_checks: eligibility,
            financial_analysis: financial,
            equipment_review: equipment_issues,
            scoring: ScoringResult::from_card(&card, reasoning),
            funding_ratio: card.funding_ratio,
            overall_status: card.status,
            components: card.components,
            reasoning_source,
            analysis_timestamp: Utc::now(),
        }
    }
}
