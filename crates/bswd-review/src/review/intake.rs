use super::domain::{ApplicationId, ApplicationRecord, RequestedItem, ScoreRequest};

/// Stands in for the id of a score request that does not name its application.
pub const UNSUBMITTED_APPLICATION: &str = "unsubmitted";

/// Malformed application fields rejected before scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("application id is missing")]
    MissingApplicationId,
    #[error("application {application_id}: {field} must be a finite, non-negative amount (found {value})")]
    InvalidAmount {
        application_id: ApplicationId,
        field: &'static str,
        value: f64,
    },
    #[error("application {application_id}: requested item #{index} has no label")]
    UnlabelledItem {
        application_id: ApplicationId,
        index: usize,
    },
    #[error("application {application_id}: item '{item}' has an invalid cost ({cost})")]
    InvalidItemCost {
        application_id: ApplicationId,
        item: String,
        cost: f64,
    },
}

/// Structural validation for inbound application records.
///
/// Enum fields are never rejected here; unrecognized values fail their eligibility check instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn validate(&self, record: &ApplicationRecord) -> Result<(), IntakeViolation> {
        if record.application_id.0.trim().is_empty() {
            return Err(IntakeViolation::MissingApplicationId);
        }

        check_amounts(
            &record.application_id,
            record.provincial_need,
            record.federal_need,
            &record.requested_items,
        )
    }

    /// Amount checks only; a score request carries no identity to validate.
    pub fn validate_score_request(&self, request: &ScoreRequest) -> Result<(), IntakeViolation> {
        let application_id = request
            .application_id
            .clone()
            .unwrap_or_else(|| ApplicationId(UNSUBMITTED_APPLICATION.to_string()));

        check_amounts(
            &application_id,
            request.provincial_need,
            request.federal_need,
            &request.requested_items,
        )
    }
}

fn check_amounts(
    application_id: &ApplicationId,
    provincial_need: f64,
    federal_need: f64,
    items: &[RequestedItem],
) -> Result<(), IntakeViolation> {
    for (field, value) in [
        ("provincial_need", provincial_need),
        ("federal_need", federal_need),
    ] {
        if !is_valid_amount(value) {
            return Err(IntakeViolation::InvalidAmount {
                application_id: application_id.clone(),
                field,
                value,
            });
        }
    }

    for (index, item) in items.iter().enumerate() {
        if item.item.trim().is_empty() {
            return Err(IntakeViolation::UnlabelledItem {
                application_id: application_id.clone(),
                index,
            });
        }
        if !is_valid_amount(item.cost) {
            return Err(IntakeViolation::InvalidItemCost {
                application_id: application_id.clone(),
                item: item.item.clone(),
                cost: item.cost,
            });
        }
    }

    Ok(())
}

fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
