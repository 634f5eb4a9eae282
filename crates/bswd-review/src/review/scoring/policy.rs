use super::super::domain::ReviewStatus;
use super::super::financial::ANNUAL_FUNDING_CAP;

pub const APPROVAL_THRESHOLD: f64 = 90.0;
pub const MANUAL_REVIEW_THRESHOLD: f64 = 75.0;
/// Rejected applications at or above this score still go to a human.
pub const HUMAN_REVIEW_FLOOR: f64 = 60.0;

pub fn classify_score(score: f64) -> ReviewStatus {
    if score >= APPROVAL_THRESHOLD {
        ReviewStatus::Approved
    } else if score >= MANUAL_REVIEW_THRESHOLD {
        ReviewStatus::NeedsManualReview
    } else {
        ReviewStatus::Rejected
    }
}

pub fn requires_human_review(score: f64) -> bool {
    match classify_score(score) {
        ReviewStatus::Approved => false,
        ReviewStatus::NeedsManualReview => true,
        ReviewStatus::Rejected => score >= HUMAN_REVIEW_FLOOR,
    }
}

pub fn recommended_funding(status: ReviewStatus, total_requested: f64) -> Option<f64> {
    match status {
        ReviewStatus::Approved => Some(total_requested),
        ReviewStatus::NeedsManualReview => Some(total_requested.min(ANNUAL_FUNDING_CAP)),
        ReviewStatus::Rejected => None,
    }
}
