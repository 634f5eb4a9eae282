use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl std::fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Disability classification captured on the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisabilityType {
    #[serde(alias = "not-verified")]
    None,
    Temporary,
    PersistentProlonged,
    Permanent,
    #[serde(other)]
    Unrecognized,
}

impl DisabilityType {
    /// Only permanent and persistent-prolonged disabilities qualify for BSWD.
    pub const fn is_verified(self) -> bool {
        matches!(self, Self::Permanent | Self::PersistentProlonged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyType {
    FullTime,
    PartTime,
    #[serde(other)]
    Unrecognized,
}

/// OSAP application tier. Only full-time OSAP unlocks the federal CSG component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsapProgram {
    FullTime,
    PartTime,
    None,
    #[serde(other)]
    Unrecognized,
}

impl OsapProgram {
    pub const fn eligible_for_csg(self) -> bool {
        matches!(self, Self::FullTime)
    }

    pub const fn label(self) -> &'static str {
        match self {
            OsapProgram::FullTime => "full-time",
            OsapProgram::PartTime => "part-time",
            OsapProgram::None => "none",
            OsapProgram::Unrecognized => "unrecognized",
        }
    }
}

/// Which grant an item is charged against.
///
/// Decoding is case-insensitive. Values outside the known labels (including an empty string)
/// become `Unrecognized` so the item is flagged instead of failing the whole application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FundingSource {
    Provincial,
    Federal,
    /// Split across BSWD and CSG-DSE.
    Both,
    #[default]
    Unrecognized,
}

impl FundingSource {
    pub fn from_label(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "provincial" | "bswd" => Self::Provincial,
            "federal" | "csg" | "csg-dse" => Self::Federal,
            "both" => Self::Both,
            _ => Self::Unrecognized,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FundingSource::Provincial => "provincial",
            FundingSource::Federal => "federal",
            FundingSource::Both => "both",
            FundingSource::Unrecognized => "unrecognized",
        }
    }
}

impl<'de> Deserialize<'de> for FundingSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map_or(Self::Unrecognized, Self::from_label))
    }
}

/// A single piece of equipment or service on the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestedItem {
    #[serde(alias = "name")]
    pub item: String,
    pub cost: f64,
    #[serde(default)]
    pub funding_source: FundingSource,
    /// Explicit policy category id; takes precedence over keyword matching when it names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Application snapshot scored by the review pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub application_id: ApplicationId,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub disability_type: DisabilityType,
    pub study_type: StudyType,
    #[serde(default = "default_osap_program")]
    pub osap_application: OsapProgram,
    #[serde(default)]
    pub has_osap_restrictions: bool,
    #[serde(default)]
    pub provincial_need: f64,
    #[serde(default)]
    pub federal_need: f64,
    #[serde(default)]
    pub requested_items: Vec<RequestedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default)]
    pub functional_limitations: Vec<String>,
    #[serde(default)]
    pub needs_psycho_ed_assessment: bool,
}

/// Scoring inputs without applicant identity, used to recalculate a score while a record is
/// being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<ApplicationId>,
    pub disability_type: DisabilityType,
    pub study_type: StudyType,
    #[serde(default = "default_osap_program")]
    pub osap_application: OsapProgram,
    #[serde(default)]
    pub has_osap_restrictions: bool,
    #[serde(default)]
    pub provincial_need: f64,
    #[serde(default)]
    pub federal_need: f64,
    #[serde(default)]
    pub requested_items: Vec<RequestedItem>,
}

impl ScoreRequest {
    pub fn total_funding(&self) -> f64 {
        self.provincial_need + self.federal_need
    }

    pub fn equipment_cost(&self) -> f64 {
        self.requested_items.iter().map(|item| item.cost).sum()
    }
}

fn default_osap_program() -> OsapProgram {
    OsapProgram::None
}

/// Recommendation produced by the confidence scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewStatus {
    #[serde(rename = "APPROVED")]
    Approved,
    #[serde(rename = "NEEDS MANUAL REVIEW")]
    NeedsManualReview,
    #[serde(rename = "REJECTED")]
    Rejected,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::NeedsManualReview => "NEEDS MANUAL REVIEW",
            ReviewStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
