use serde::{Deserialize, Serialize};

use super::domain::{DisabilityType, StudyType};

pub const MISSING_DISABILITY: &str = "No verified permanent or persistent-prolonged disability";
pub const NOT_FULL_TIME: &str = "Not enrolled as full-time student";
pub const HAS_OSAP_RESTRICTIONS: &str = "Has OSAP restrictions";

/// Outcome of the three binary BSWD eligibility checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub has_disability: bool,
    pub is_full_time: bool,
    pub has_osap_restrictions: bool,
    pub all_checks_passed: bool,
    pub failed_checks: Vec<String>,
}

impl EligibilityResult {
    pub fn failed_count(&self) -> usize {
        [
            !self.has_disability,
            !self.is_full_time,
            self.has_osap_restrictions,
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }
}

/// Evaluate every check independently; unrecognized enum values fail their check.
pub fn run_eligibility_checks(
    disability_type: DisabilityType,
    study_type: StudyType,
    has_osap_restrictions: bool,
) -> EligibilityResult {
    let has_disability = disability_type.is_verified();
    let is_full_time = study_type == StudyType::FullTime;

    let mut failed_checks = Vec::new();
    if !has_disability {
        failed_checks.push(MISSING_DISABILITY.to_string());
    }
    if !is_full_time {
        failed_checks.push(NOT_FULL_TIME.to_string());
    }
    if has_osap_restrictions {
        failed_checks.push(HAS_OSAP_RESTRICTIONS.to_string());
    }

    EligibilityResult {
        has_disability,
        is_full_time,
        has_osap_restrictions,
        all_checks_passed: has_disability && is_full_time && !has_osap_restrictions,
        failed_checks,
    }
}
