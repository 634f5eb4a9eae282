use std::sync::Arc;
use std::time::Duration;

use super::common::*;
use crate::review::domain::{ApplicationRecord, FundingSource, OsapProgram};
use crate::review::reasoning::{
    decode_reasoning, format_currency, generate_reasoning, request_reasoning, template_reasoning,
    OpenAiReasoning, ReasoningError, ReasoningProvider, ReasoningSource,
};

#[test]
fn formats_currency_with_grouping() {
    assert_eq!(format_currency(0.0), "$0.00");
    assert_eq!(format_currency(2_000.0), "$2,000.00");
    assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
    assert_eq!(format_currency(-450.5), "-$450.50");
}

#[test]
fn template_explains_exact_match() {
    let reasoning = template_reasoning(&context_for(&record()));

    assert_eq!(
        reasoning.reasoning,
        "Confidence score 100.0 (APPROVED). Funding of $4,000.00 matches equipment costs of \
         $4,000.00 exactly."
    );
    assert!(reasoning.risk_factors.is_empty());
}

#[test]
fn template_leads_with_provincial_overage() {
    let record = ApplicationRecord {
        provincial_need: 2_500.0,
        federal_need: 1_500.0,
        ..record()
    };

    let reasoning = template_reasoning(&context_for(&record));

    assert!(reasoning.reasoning.starts_with("Confidence score 70.0 (REJECTED)."));
    assert!(reasoning
        .reasoning
        .contains("Provincial funding of $2,500.00 exceeds the BSWD limit of $2,000.00 by $500.00."));
    assert_eq!(reasoning.risk_factors.len(), 1);
    assert!(reasoning.risk_factors[0].starts_with("provincial funding 2500.00"));
}

#[test]
fn template_explains_federal_ineligibility() {
    let record = ApplicationRecord {
        osap_application: OsapProgram::PartTime,
        ..record()
    };

    let reasoning = template_reasoning(&context_for(&record));

    assert!(reasoning.reasoning.contains("Federal funding of $2,500.00 was requested"));
    assert!(reasoning.reasoning.contains("lists OSAP as part-time"));
}

#[test]
fn template_flags_missing_equipment() {
    let record = ApplicationRecord {
        requested_items: Vec::new(),
        ..record()
    };

    let reasoning = template_reasoning(&context_for(&record));

    assert!(reasoning
        .reasoning
        .ends_with("Funding of $4,000.00 was requested with no equipment or service costs to support it."));
}

#[test]
fn template_describes_funding_gap() {
    let record = ApplicationRecord {
        provincial_need: 1_000.0,
        federal_need: 0.0,
        ..record()
    };

    let reasoning = template_reasoning(&context_for(&record));

    assert!(reasoning
        .reasoning
        .contains("covers only 25.0% of equipment costs of $4,000.00, leaving a gap of $3,000.00."));
}

#[test]
fn risk_factors_list_failed_checks_then_violations() {
    let record = ApplicationRecord {
        requested_items: vec![
            item("Gaming laptop", 3_000.0, FundingSource::Provincial),
            item("Tutoring", 1_000.0, FundingSource::Federal),
        ],
        ..ineligible_record()
    };

    let reasoning = template_reasoning(&context_for(&record));

    assert_eq!(reasoning.risk_factors.len(), 4);
    assert_eq!(
        reasoning.risk_factors[3],
        "Gaming laptop: cost exceeds the provincial technology maximum of 2000.00"
    );
}

#[test]
fn decode_accepts_fenced_json() {
    let content = "```json\n{\"reasoning\": \"  Looks fine. \", \"risk_factors\": [\"none noted\"]}\n```";

    let reasoning = decode_reasoning(content).expect("decoded");

    assert_eq!(reasoning.reasoning, "Looks fine.");
    assert_eq!(reasoning.risk_factors, vec!["none noted"]);
}

#[test]
fn decode_rejects_schema_drift() {
    for content in [
        "not json at all",
        "{\"reasoning\": \"ok\"}",
        "{\"reasoning\": \"ok\", \"risk_factors\": [], \"score\": 12}",
        "{\"reasoning\": \"   \", \"risk_factors\": []}",
        "{\"reasoning\": \"ok\", \"risk_factors\": [\"\"]}",
    ] {
        match decode_reasoning(content) {
            Err(ReasoningError::Malformed(_)) => {}
            other => panic!("expected malformed for {content:?}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn provider_reasoning_is_used_when_available() {
    let provider = ScriptedProvider::default();
    let context = context_for(&record());

    let (reasoning, source) =
        generate_reasoning(Some(&provider), Duration::from_secs(1), &context).await;

    assert_eq!(source, ReasoningSource::Provider("scripted"));
    assert_eq!(source.to_string(), "provider:scripted");
    assert_eq!(reasoning.risk_factors, vec!["scripted risk"]);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn failing_provider_falls_back_to_template() {
    let context = context_for(&record());

    let (reasoning, source) =
        generate_reasoning(Some(&UnavailableProvider), Duration::from_secs(1), &context).await;

    assert_eq!(source, ReasoningSource::Template);
    assert_eq!(reasoning, template_reasoning(&context));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let context = context_for(&record());
    let timeout = Duration::from_millis(20);

    let err = request_reasoning(&StalledProvider, timeout, &context)
        .await
        .expect_err("timed out");
    assert!(matches!(err, ReasoningError::Timeout(elapsed) if elapsed == timeout));

    let (reasoning, source) = generate_reasoning(Some(&StalledProvider), timeout, &context).await;
    assert_eq!(source, ReasoningSource::Template);
    assert_eq!(reasoning, template_reasoning(&context));
}

#[tokio::test]
async fn missing_provider_uses_template() {
    let context = context_for(&record());

    let (_, source) = generate_reasoning(None, Duration::from_secs(1), &context).await;

    assert_eq!(source, ReasoningSource::Template);
    assert_eq!(source.to_string(), "template");
}

#[tokio::test]
async fn openai_without_key_is_not_configured() {
    let provider = OpenAiReasoning::new("", "gpt-4-turbo-preview", Duration::from_secs(1))
        .expect("client");

    let err = provider
        .generate(&context_for(&record()))
        .await
        .expect_err("no key");

    assert!(matches!(err, ReasoningError::NotConfigured));
    assert_eq!(provider.name(), "openai");
}

#[tokio::test]
async fn unreachable_openai_endpoint_falls_back() {
    let provider: Arc<dyn ReasoningProvider> = Arc::new(
        OpenAiReasoning::new("sk-test", "gpt-4-turbo-preview", Duration::from_secs(2))
            .expect("client")
            .with_endpoint("http://127.0.0.1:9/v1/chat/completions"),
    );
    let context = context_for(&record());

    let (_, source) =
        generate_reasoning(Some(provider.as_ref()), Duration::from_secs(3), &context).await;

    assert_eq!(source, ReasoningSource::Template);
}
