//! BSWD application review: eligibility checks, financial analysis, equipment policy
//! validation, confidence scoring, and reasoning.
//!
//! Every stage except reasoning is a pure function of one [`ApplicationRecord`]. Reasoning may
//! call an external provider but always has the deterministic template to fall back on.

pub mod domain;
pub mod eligibility;
pub mod equipment;
pub mod export;
pub mod financial;
pub mod intake;
pub mod reasoning;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicationId, ApplicationRecord, DisabilityType, FundingSource, OsapProgram, RequestedItem,
    ReviewStatus, ScoreRequest, StudyType,
};
pub use eligibility::{run_eligibility_checks, EligibilityResult};
pub use equipment::{
    match_category, validate_equipment, CategoryPolicy, EquipmentIssue, IssueSeverity,
    EQUIPMENT_POLICIES,
};
pub use export::{write_csv, ExportError};
pub use financial::{analyze_financials, FinancialSummary, ANNUAL_FUNDING_CAP};
pub use intake::{IntakeGuard, IntakeViolation, UNSUBMITTED_APPLICATION};
pub use reasoning::{
    generate_reasoning, template_reasoning, DynReasoningProvider, OpenAiReasoning, Reasoning,
    ReasoningContext, ReasoningError, ReasoningProvider, ReasoningSource,
};
pub use router::{review_router, BatchRequest};
pub use scoring::{
    classify_score, compute_confidence_score, ScoreCard, ScoreComponent, ScoringResult,
};
pub use service::{
    assess_application, score_request, ApplicationAnalysis, ApplicationAssessment,
    ApplicationReviewService, BatchSummary, ScoreSummary,
};
