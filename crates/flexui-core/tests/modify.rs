//! End-to-end modification tests against scripted oracles

use flexui_core::{
    ErrorKind, ModificationError, ModificationOrchestrator, ModificationRequest, ModifierConfig,
    OracleError, TargetAddress,
};
use flexui_schema::{Breakpoint, ChangeKind, DocumentHash, FlexibleContent, SchemaError};
use flexui_test_utils::{hero_document, hero_document_json, FailingOracle, ScriptedOracle};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn headline_24px_json() -> serde_json::Value {
    let mut value = hero_document_json();
    value["sections"]["hero"]["components"][0]["styles"]["default"]["fontSize"] = json!("24px");
    value
}

#[tokio::test]
async fn targeted_font_size_change() {
    let reply = format!(
        "Here is the modified JSON:\n```json\n{}\n```",
        serde_json::to_string_pretty(&headline_24px_json()).unwrap()
    );
    let oracle = Arc::new(ScriptedOracle::new().with_reply(reply));
    let orchestrator = ModificationOrchestrator::new(oracle.clone());

    let input = hero_document();
    let target = TargetAddress::Path("sections.hero.components.0".into());
    let outcome = orchestrator
        .apply(&input, "make the headline 24px", Some(&target))
        .await
        .unwrap();

    assert_eq!(oracle.call_count(), 1);
    assert!(oracle.prompts()[0].contains("TARGET COMPONENT: \"headline\" in section \"hero\""));

    let target = outcome.target.as_ref().unwrap();
    assert_eq!(target.to_string(), "hero.headline");
    assert!(outcome.summary.contains("headline"));
    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.strategy, "fenced_block");

    assert!(outcome.diff.touches_only(Some("hero"), "headline"));
    assert_eq!(outcome.diff.changes.len(), 1);
    assert_eq!(outcome.diff.changes[0].kind, ChangeKind::Modified);

    let styles = outcome
        .document
        .resolved_component_styles("headline", Breakpoint::MaxSm)
        .unwrap();
    assert_eq!(styles.get("fontSize"), Some(&json!("24px")));

    assert_eq!(
        outcome.document,
        FlexibleContent::from_value(&headline_24px_json()).unwrap()
    );
    assert_eq!(outcome.before, DocumentHash::of(&input).unwrap());
    assert_ne!(outcome.before, outcome.after);
}

#[tokio::test]
async fn reply_missing_sections_is_rejected() {
    let mut broken = hero_document_json();
    broken.as_object_mut().unwrap().remove("sections");
    let oracle = Arc::new(ScriptedOracle::new().with_reply(broken.to_string()));
    let orchestrator = ModificationOrchestrator::new(oracle);

    let input = hero_document();
    let before = DocumentHash::of(&input).unwrap();

    let err = orchestrator
        .apply(&input, "remove everything", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidOutputDocument);
    assert!(matches!(
        err.schema_error(),
        Some(SchemaError::MissingField { .. })
    ));
    assert_eq!(DocumentHash::of(&input).unwrap(), before);
}

#[tokio::test]
async fn malformed_reply_is_extraction_failure() {
    let oracle = Arc::new(ScriptedOracle::new().with_reply("Sorry, I cannot help with that."));
    let orchestrator = ModificationOrchestrator::new(oracle);

    let err = orchestrator
        .apply(&hero_document(), "make it pop", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExtractionFailure);
    let ModificationError::ExtractionFailure(inner) = err else {
        panic!("expected extraction failure");
    };
    assert_eq!(inner.attempts().len(), 5);
}

#[tokio::test]
async fn oracle_failure_surfaces_status() {
    let oracle = Arc::new(FailingOracle(OracleError::Upstream {
        status: 429,
        body: "rate limited".into(),
    }));
    let orchestrator = ModificationOrchestrator::new(oracle);

    let err = orchestrator
        .apply(&hero_document(), "make it pop", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::OracleError);
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn handle_request_round_trip() {
    let oracle = Arc::new(
        ScriptedOracle::new().with_reply(serde_json::to_string(&headline_24px_json()).unwrap()),
    );
    let orchestrator = ModificationOrchestrator::new(oracle.clone());

    let request = ModificationRequest::new(hero_document_json(), "make the headline 24px")
        .with_target_id("headline");
    let response = orchestrator.handle_request(&request).await.unwrap();

    assert_eq!(
        response.ai_message,
        "Applied modification to 'headline': make the headline 24px"
    );
    assert_eq!(
        response.modified_json["sections"]["hero"]["components"][0]["styles"]["default"]
            ["fontSize"],
        json!("24px")
    );
}

#[tokio::test]
async fn handle_request_rejects_invalid_current_json() {
    let oracle = Arc::new(ScriptedOracle::new());
    let orchestrator = ModificationOrchestrator::new(oracle.clone());

    let request = ModificationRequest::new(json!({"sections": {}}), "anything");
    let err = orchestrator.handle_request(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInputDocument);
    assert_eq!(oracle.call_count(), 0);
}

#[tokio::test]
async fn untargeted_request_uses_plain_summary() {
    let oracle = Arc::new(ScriptedOracle::new().with_reply(hero_document_json().to_string()));
    let orchestrator = ModificationOrchestrator::new(oracle);

    let request = ModificationRequest::new(hero_document_json(), "tidy up");
    let response = orchestrator.handle_request(&request).await.unwrap();

    assert_eq!(response.ai_message, "Applied modification: tidy up");
    let echoed = FlexibleContent::from_value(&response.modified_json).unwrap();
    assert_eq!(echoed, hero_document());
}

#[test]
fn config_file_loads() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "request_timeout_secs = 45\n\n[oracle]\nbase_url = \"http://localhost:9000/v1\"\nmax_tokens = 512"
    )
    .unwrap();

    let config = ModifierConfig::from_file(file.path()).unwrap();
    assert_eq!(config.request_timeout_secs, 45);
    assert_eq!(config.oracle.base_url, "http://localhost:9000/v1");
    assert_eq!(config.oracle.max_tokens, 512);
    assert_eq!(config.oracle.model, ModifierConfig::default().oracle.model);
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModifierConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}
