use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::review::domain::{
    ApplicationId, ApplicationRecord, DisabilityType, FundingSource, OsapProgram, RequestedItem,
    ReviewStatus, StudyType,
};
use crate::review::eligibility::run_eligibility_checks;
use crate::review::reasoning::{
    Reasoning, ReasoningContext, ReasoningError, ReasoningProvider,
};
use crate::review::service::ApplicationReviewService;

pub(super) fn item(name: &str, cost: f64, source: FundingSource) -> RequestedItem {
    RequestedItem {
        item: name.to_string(),
        cost,
        funding_source: source,
        category: None,
    }
}

/// Eligible full-time applicant whose funding matches equipment cost exactly.
pub(super) fn record() -> ApplicationRecord {
    ApplicationRecord {
        application_id: ApplicationId("BSWD-2025-0001".to_string()),
        student_id: "100200300".to_string(),
        first_name: "Jordan".to_string(),
        last_name: "Reyes".to_string(),
        disability_type: DisabilityType::Permanent,
        study_type: StudyType::FullTime,
        osap_application: OsapProgram::FullTime,
        has_osap_restrictions: false,
        provincial_need: 1_500.0,
        federal_need: 2_500.0,
        requested_items: vec![
            item("Laptop", 1_800.0, FundingSource::Provincial),
            item("Screen reading software", 2_200.0, FundingSource::Federal),
        ],
        institution: Some("Seneca Polytechnic".to_string()),
        program: Some("Computer Programming".to_string()),
        functional_limitations: vec!["Low vision".to_string()],
        needs_psycho_ed_assessment: false,
    }
}

pub(super) fn record_with_id(id: &str) -> ApplicationRecord {
    ApplicationRecord {
        application_id: ApplicationId(id.to_string()),
        ..record()
    }
}

/// Application with no verified disability, part-time study, and OSAP restrictions.
pub(super) fn ineligible_record() -> ApplicationRecord {
    ApplicationRecord {
        application_id: ApplicationId("BSWD-2025-0099".to_string()),
        disability_type: DisabilityType::None,
        study_type: StudyType::PartTime,
        has_osap_restrictions: true,
        ..record()
    }
}

pub(super) fn eligible_checks() -> crate::review::eligibility::EligibilityResult {
    run_eligibility_checks(DisabilityType::Permanent, StudyType::FullTime, false)
}

pub(super) fn context_for(record: &ApplicationRecord) -> ReasoningContext {
    let assessment = crate::review::service::assess_application(record);
    ReasoningContext {
        application_id: record.application_id.clone(),
        score: assessment.card.score,
        status: assessment.card.status,
        osap_program: record.osap_application,
        provincial_need: record.provincial_need,
        federal_need: record.federal_need,
        total_funding: assessment.financial.total_need,
        equipment_cost: assessment.financial.total_requested,
        funding_ratio: assessment.card.funding_ratio,
        failed_checks: assessment.eligibility.failed_checks.clone(),
        components: assessment.card.components.clone(),
        equipment_issues: assessment.equipment_issues.clone(),
    }
}

pub(super) fn template_service() -> Arc<ApplicationReviewService> {
    Arc::new(ApplicationReviewService::template_only())
}

pub(super) fn service_with(
    provider: Arc<dyn ReasoningProvider>,
    timeout: Duration,
) -> ApplicationReviewService {
    ApplicationReviewService::new(Some(provider), timeout)
}

/// Provider returning a fixed narrative and counting calls.
#[derive(Default)]
pub(super) struct ScriptedProvider {
    pub calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReasoningProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, context: &ReasoningContext) -> Result<Reasoning, ReasoningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Reasoning {
            reasoning: format!("Reviewed {} at {:.1}.", context.application_id, context.score),
            risk_factors: vec!["scripted risk".to_string()],
        })
    }
}

pub(super) struct UnavailableProvider;

#[async_trait]
impl ReasoningProvider for UnavailableProvider {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn generate(&self, _context: &ReasoningContext) -> Result<Reasoning, ReasoningError> {
        Err(ReasoningError::Status(503))
    }
}

/// Provider that never answers inside any reasonable timeout.
pub(super) struct StalledProvider;

#[async_trait]
impl ReasoningProvider for StalledProvider {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn generate(&self, _context: &ReasoningContext) -> Result<Reasoning, ReasoningError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Reasoning {
            reasoning: "too late".to_string(),
            risk_factors: Vec::new(),
        })
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) async fn assert_status_body(response: Response, expected: StatusCode) -> Value {
    assert_eq!(response.status(), expected);
    json_body(response).await
}

pub(super) fn status_of(value: &Value) -> ReviewStatus {
    serde_json::from_value(value["overall_status"].clone()).expect("status")
}
