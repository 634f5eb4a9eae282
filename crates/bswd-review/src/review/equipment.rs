use serde::{Deserialize, Serialize};

use super::domain::{FundingSource, RequestedItem};

/// Per-category funding ceilings and the keywords used to recognise item labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryPolicy {
    pub id: &'static str,
    pub provincial_max: f64,
    pub federal_max: f64,
    pub keywords: &'static [&'static str],
}

impl CategoryPolicy {
    /// Ceiling for one funding source. An item split across both grants may draw on both
    /// ceilings; an unrecognized source has no ceiling to check against.
    pub fn max_for(&self, source: FundingSource) -> Option<f64> {
        match source {
            FundingSource::Provincial => Some(self.provincial_max),
            FundingSource::Federal => Some(self.federal_max),
            FundingSource::Both => Some(self.provincial_max + self.federal_max),
            FundingSource::Unrecognized => None,
        }
    }
}

/// Table order is the final tie-break between equally specific keyword matches.
pub const EQUIPMENT_POLICIES: &[CategoryPolicy] = &[
    CategoryPolicy {
        id: "technology",
        provincial_max: 2_000.0,
        federal_max: 4_000.0,
        keywords: &[
            "laptop",
            "computer",
            "desktop",
            "tablet",
            "ipad",
            "chromebook",
            "monitor",
        ],
    },
    CategoryPolicy {
        id: "assistive_software",
        provincial_max: 2_000.0,
        federal_max: 2_600.0,
        keywords: &[
            "software",
            "screen reader",
            "screen reading",
            "dictation",
            "text-to-speech",
            "speech-to-text",
            "license",
        ],
    },
    CategoryPolicy {
        id: "note_taking",
        provincial_max: 1_500.0,
        federal_max: 1_500.0,
        keywords: &[
            "note-taking",
            "note taking",
            "notetaker",
            "transcription",
            "captioning",
        ],
    },
    CategoryPolicy {
        id: "tutoring",
        provincial_max: 2_000.0,
        federal_max: 2_200.0,
        keywords: &["tutor"],
    },
    CategoryPolicy {
        id: "coaching",
        provincial_max: 2_000.0,
        federal_max: 0.0,
        keywords: &["coaching", "coach", "adhd"],
    },
    CategoryPolicy {
        id: "ergonomic",
        provincial_max: 1_000.0,
        federal_max: 1_500.0,
        keywords: &["ergonomic", "chair", "desk", "footrest"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Warning,
    Violation,
}

/// Policy finding for one requested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentIssue {
    pub item: String,
    pub cost: f64,
    pub category: String,
    pub issue: String,
    pub severity: IssueSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_allowed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_cost: Option<f64>,
}

/// Resolve the policy category for an item.
///
/// An explicit `category` naming a policy id wins. Otherwise the longest keyword found in the
/// label decides, with earlier table entries winning ties. Unmatched items return `None`.
pub fn match_category(item: &RequestedItem) -> Option<&'static CategoryPolicy> {
    if let Some(explicit) = item.category.as_deref() {
        let explicit = explicit.trim();
        if let Some(policy) = EQUIPMENT_POLICIES
            .iter()
            .find(|policy| policy.id.eq_ignore_ascii_case(explicit))
        {
            return Some(policy);
        }
    }

    let label = item.item.to_lowercase();
    let mut best: Option<(&'static CategoryPolicy, usize)> = None;
    for policy in EQUIPMENT_POLICIES {
        let longest = policy
            .keywords
            .iter()
            .filter(|keyword| label.contains(*keyword))
            .map(|keyword| keyword.len())
            .max();

        if let Some(length) = longest {
            if best.map_or(true, |(_, current)| length > current) {
                best = Some((policy, length));
            }
        }
    }

    best.map(|(policy, _)| policy)
}

pub fn validate_equipment(items: &[RequestedItem]) -> Vec<EquipmentIssue> {
    items.iter().filter_map(review_item).collect()
}

fn review_item(item: &RequestedItem) -> Option<EquipmentIssue> {
    let policy = match_category(item)?;

    let issue = |issue: String,
                 severity: IssueSeverity,
                 max_allowed: Option<f64>,
                 suggested_cost: Option<f64>| EquipmentIssue {
        item: item.item.clone(),
        cost: item.cost,
        category: policy.id.to_string(),
        issue,
        severity,
        max_allowed,
        suggested_cost,
    };

    let Some(max) = policy.max_for(item.funding_source) else {
        return Some(issue(
            "funding source not recognized; cost not checked against a maximum".to_string(),
            IssueSeverity::Warning,
            None,
            None,
        ));
    };

    if max <= 0.0 {
        return Some(issue(
            format!(
                "{} is not eligible for this funding source ({})",
                policy.id,
                item.funding_source.label()
            ),
            IssueSeverity::Violation,
            None,
            None,
        ));
    }

    if item.cost > max {
        return Some(issue(
            format!(
                "cost exceeds the {} {} maximum of {max:.2}",
                item.funding_source.label(),
                policy.id
            ),
            IssueSeverity::Violation,
            Some(max),
            Some(max),
        ));
    }

    if item.cost == 0.0 {
        return Some(issue(
            "no cost entered for this item".to_string(),
            IssueSeverity::Warning,
            Some(max),
            None,
        ));
    }

    None
}
