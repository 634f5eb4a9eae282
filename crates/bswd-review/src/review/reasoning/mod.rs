//! Human-readable explanations for a score.
//!
//! A [`ReasoningProvider`] may write the narrative, but every call is bounded by a timeout and
//! any failure falls back to the deterministic template, so scoring never depends on it.

mod openai;
mod template;

pub use openai::OpenAiReasoning;
pub use template::{format_currency, template_reasoning};

#[cfg(test)]
pub(crate) use openai::decode_reasoning;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, warn};

use super::domain::{ApplicationId, OsapProgram, ReviewStatus};
use super::equipment::EquipmentIssue;
use super::scoring::ScoreComponent;

/// Facts a reasoning backend may cite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasoningContext {
    pub application_id: ApplicationId,
    pub score: f64,
    pub status: ReviewStatus,
    pub osap_program: OsapProgram,
    pub provincial_need: f64,
    pub federal_need: f64,
    pub total_funding: f64,
    pub equipment_cost: f64,
    pub funding_ratio: Option<f64>,
    pub failed_checks: Vec<String>,
    pub components: Vec<ScoreComponent>,
    pub equipment_issues: Vec<EquipmentIssue>,
}

/// Narrative plus the risk factors it calls out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reasoning {
    pub reasoning: String,
    pub risk_factors: Vec<String>,
}

/// Which backend produced the reasoning attached to an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasoningSource {
    Template,
    Provider(&'static str),
}

impl std::fmt::Display for ReasoningSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningSource::Template => f.write_str("template"),
            ReasoningSource::Provider(name) => write!(f, "provider:{name}"),
        }
    }
}

impl Serialize for ReasoningSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReasoningError {
    #[error("reasoning provider is not configured")]
    NotConfigured,
    #[error("reasoning provider unreachable: {0}")]
    Transport(String),
    #[error("reasoning provider returned HTTP {0}")]
    Status(u16),
    #[error("reasoning provider returned a malformed response: {0}")]
    Malformed(String),
    #[error("reasoning provider timed out after {0:?}")]
    Timeout(Duration),
}

/// External text-generation backend for reasoning.
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, context: &ReasoningContext) -> Result<Reasoning, ReasoningError>;
}

pub type DynReasoningProvider = Arc<dyn ReasoningProvider>;

/// Call the provider under `timeout`, returning its error instead of falling back.
pub async fn request_reasoning(
    provider: &dyn ReasoningProvider,
    timeout: Duration,
    context: &ReasoningContext,
) -> Result<Reasoning, ReasoningError> {
    match tokio::time::timeout(timeout, provider.generate(context)).await {
        Ok(result) => result,
        Err(_) => Err(ReasoningError::Timeout(timeout)),
    }
}

/// Produce reasoning for a scored application, falling back to the template on any failure.
pub async fn generate_reasoning(
    provider: Option<&dyn ReasoningProvider>,
    timeout: Duration,
    context: &ReasoningContext,
) -> (Reasoning, ReasoningSource) {
    let Some(provider) = provider else {
        return (template_reasoning(context), ReasoningSource::Template);
    };

    match request_reasoning(provider, timeout, context).await {
        Ok(reasoning) => {
            debug!(
                application_id = %context.application_id,
                provider = provider.name(),
                "reasoning generated by provider"
            );
            (reasoning, ReasoningSource::Provider(provider.name()))
        }
        Err(err) => {
            warn!(
                application_id = %context.application_id,
                provider = provider.name(),
                error = %err,
                "reasoning provider failed; using deterministic template"
            );
            (template_reasoning(context), ReasoningSource::Template)
        }
    }
}
