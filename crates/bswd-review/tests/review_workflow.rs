//! End-to-end review scenarios driven through the public service facade, HTTP router, and CSV
//! export, starting from intake-form JSON.

mod common {
    use std::sync::Arc;

    use bswd_review::review::{ApplicationRecord, ApplicationReviewService};
    use serde_json::json;

    pub(super) fn service() -> Arc<ApplicationReviewService> {
        Arc::new(ApplicationReviewService::template_only())
    }

    /// Three intake forms: a clean approval, a manual review, and a rejection.
    pub(super) fn intake_batch() -> Vec<ApplicationRecord> {
        serde_json::from_value(json!([
            {
                "application_id": "BSWD-1001",
                "student_id": "500100",
                "first_name": "Avery",
                "last_name": "Chen",
                "disability_type": "permanent",
                "study_type": "full-time",
                "osap_application": "full-time",
                "provincial_need": 2000.0,
                "federal_need": 2459.0,
                "requested_items": [
                    {"item": "Laptop", "cost": 2000.0, "funding_source": "bswd"},
                    {"item": "Screen reading software", "cost": 2500.0, "funding_source": "csg-dse"},
                    {"item": "Tutoring", "cost": 2400.0, "funding_source": "csg-dse"}
                ]
            },
            {
                "application_id": "BSWD-1002",
                "student_id": "500200",
                "first_name": "Riley",
                "last_name": "Singh",
                "disability_type": "persistent-prolonged",
                "study_type": "full-time",
                "osap_application": "full-time",
                "provincial_need": 2000.0,
                "federal_need": 8000.0,
                "requested_items": [
                    {"item": "Gaming laptop", "cost": 3000.0, "funding_source": "bswd"},
                    {"item": "Note-taking service", "cost": 3900.0, "funding_source": "csg"}
                ]
            },
            {
                "application_id": "BSWD-1003",
                "student_id": "500300",
                "first_name": "Morgan",
                "last_name": "Lee",
                "disability_type": "temporary",
                "study_type": "part-time",
                "osap_application": "part-time",
                "has_osap_restrictions": true,
                "provincial_need": 3000.0,
                "federal_need": 1000.0
            }
        ]))
        .expect("intake forms decode")
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use bswd_review::review::{review_router, write_csv, IssueSeverity, ReviewStatus};
use tower::ServiceExt;

#[tokio::test]
async fn batch_review_classifies_each_intake_form() {
    let service = common::service();

    let summary = service
        .analyze_batch(&common::intake_batch())
        .await
        .expect("batch review");

    let statuses: Vec<_> = summary
        .analyses
        .iter()
        .map(|analysis| analysis.overall_status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            ReviewStatus::Approved,
            ReviewStatus::NeedsManualReview,
            ReviewStatus::Rejected
        ]
    );
    assert_eq!(summary.analyses[0].scoring.score, 95.0);
    assert_eq!(summary.analyses[1].scoring.score, 85.0);
    assert_eq!(summary.analyses[2].scoring.score, 0.0);

    let manual = &summary.analyses[1];
    let violations: Vec<_> = manual
        .equipment_review
        .iter()
        .filter(|issue| issue.severity == IssueSeverity::Violation)
        .collect();
    assert_eq!(violations.len(), 2);
    assert!(manual
        .scoring
        .risk_factors
        .iter()
        .any(|factor| factor.starts_with("Gaming laptop:")));
}

#[tokio::test]
async fn batch_report_exports_to_csv() {
    let summary = common::service()
        .analyze_batch(&common::intake_batch())
        .await
        .expect("batch review");

    let mut buffer = Vec::new();
    write_csv(&mut buffer, &summary.analyses).expect("csv export");

    let csv = String::from_utf8(buffer).expect("utf8");
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("application_id,status,score"));
    assert!(lines[1].starts_with("BSWD-1001,APPROVED,95.0"));
    assert!(lines[2].starts_with("BSWD-1002,NEEDS MANUAL REVIEW,85.0"));
    assert!(lines[3].starts_with("BSWD-1003,REJECTED,0.0"));
}

#[tokio::test]
async fn router_serves_single_application_reviews() {
    let router = review_router(common::service());
    let record = common::intake_batch().remove(0);

    let response = router
        .oneshot(
            Request::post("/api/analysis/application")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&record).expect("serialize")))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["overall_status"], "APPROVED");
    assert_eq!(body["deterministic_checks"]["all_checks_passed"], true);
    assert!(body["analysis_timestamp"].is_string());
}
