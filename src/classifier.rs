//! Response Classifier
//!
//! Classifies what came back from the orchestrator as either:
//! - Plain: legitimate output to show the user
//! - UpstreamError: a provider error payload (a JSON object with an `error` key)
//! - UnexpectedError: a fault that does not carry a recognised payload

use serde_json::Value;

use crate::error::StudioError;
use crate::models::{Content, RunOutput};

/// What the orchestrator produced for one invocation.
#[derive(Debug, Clone, Copy)]
pub enum AgentOutcome<'a> {
    Content(&'a Content),
    Fault(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Plain(Content),
    UpstreamError(Value),
    UnexpectedError(String),
}

/// Stateless response classifier
pub struct ResponseClassifier;

impl ResponseClassifier {
    pub fn classify(outcome: AgentOutcome<'_>) -> Classification {
        match outcome {
            AgentOutcome::Content(Content::Structured(value)) => {
                Classification::Plain(Content::Structured(value.clone()))
            }
            AgentOutcome::Content(Content::Text(text)) => match error_payload(text) {
                Some(payload) => Classification::UpstreamError(payload),
                None => Classification::Plain(Content::Text(text.clone())),
            },
            AgentOutcome::Fault(message) => match error_payload(message) {
                Some(payload) => Classification::UpstreamError(payload),
                None => Classification::UnexpectedError(message.to_string()),
            },
        }
    }

    /// Classify an orchestrator result directly, stringifying the fault.
    pub fn classify_result(result: &Result<RunOutput, StudioError>) -> Classification {
        match result {
            Ok(output) => Self::classify(AgentOutcome::Content(&output.content)),
            Err(fault) => Self::classify(AgentOutcome::Fault(&fault.to_string())),
        }
    }
}

/// Parse `text` and keep it only if it is an object carrying `error`.
/// Never fails: anything unparseable is simply not a payload.
pub(crate) fn error_payload(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) if value.get("error").is_some() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunStatus;
    use serde_json::json;
    use uuid::Uuid;

    fn text(s: &str) -> Content {
        Content::Text(s.to_string())
    }

    fn run_output(content: Content) -> RunOutput {
        RunOutput {
            run_id: Uuid::new_v4(),
            team: "MovieProducers".to_string(),
            status: RunStatus::Completed,
            content,
        }
    }

    #[test]
    fn test_plain_text() {
        let content = text("Here is your three-act outline...");
        assert_eq!(
            ResponseClassifier::classify(AgentOutcome::Content(&content)),
            Classification::Plain(text("Here is your three-act outline..."))
        );
    }

    #[test]
    fn test_json_without_error_key_is_plain() {
        let cases = vec![
            r#"{"title": "Signal", "acts": 3}"#,
            r#"["error"]"#,
            r#""error""#,
            "42",
            "null",
        ];

        for c in cases {
            let content = text(c);
            assert_eq!(
                ResponseClassifier::classify(AgentOutcome::Content(&content)),
                Classification::Plain(text(c)),
                "case: {}",
                c
            );
        }
    }

    #[test]
    fn test_error_payload_in_content() {
        let content = text(r#"{"error": {"code": 429, "message": "quota exceeded"}}"#);
        assert_eq!(
            ResponseClassifier::classify(AgentOutcome::Content(&content)),
            Classification::UpstreamError(
                json!({ "error": { "code": 429, "message": "quota exceeded" } })
            )
        );
    }

    #[test]
    fn test_error_key_with_null_value_still_counts() {
        let content = text(r#"{"error": null}"#);
        assert!(matches!(
            ResponseClassifier::classify(AgentOutcome::Content(&content)),
            Classification::UpstreamError(_)
        ));
    }

    #[test]
    fn test_structured_content_is_never_parsed() {
        let payload = json!({ "error": { "code": 503 } });
        let content = Content::Structured(payload.clone());
        assert_eq!(
            ResponseClassifier::classify(AgentOutcome::Content(&content)),
            Classification::Plain(Content::Structured(payload))
        );
    }

    #[test]
    fn test_fault_with_error_payload() {
        let message = r#"{"error": {"code": 503, "status": "UNAVAILABLE"}}"#;
        assert_eq!(
            ResponseClassifier::classify(AgentOutcome::Fault(message)),
            Classification::UpstreamError(json!({ "error": { "code": 503, "status": "UNAVAILABLE" } }))
        );
    }

    #[test]
    fn test_fault_without_payload() {
        let cases = vec!["connection reset", "", "{not json", r#"{"detail": "x"}"#, "[1, 2]"];

        for c in cases {
            assert_eq!(
                ResponseClassifier::classify(AgentOutcome::Fault(c)),
                Classification::UnexpectedError(c.to_string()),
                "case: {:?}",
                c
            );
        }
    }

    #[test]
    fn test_classify_result_paths_agree() {
        let body = r#"{"error": {"code": 429}}"#;

        let as_content: Result<RunOutput, StudioError> = Ok(run_output(text(body)));
        let as_fault: Result<RunOutput, StudioError> = Err(StudioError::Upstream {
            status: 429,
            body: body.to_string(),
        });

        assert_eq!(
            ResponseClassifier::classify_result(&as_content),
            ResponseClassifier::classify_result(&as_fault)
        );
    }

    #[test]
    fn test_classify_result_unexpected_fault() {
        let result: Result<RunOutput, StudioError> =
            Err(StudioError::AgentError("connection reset".to_string()));
        assert_eq!(
            ResponseClassifier::classify_result(&result),
            Classification::UnexpectedError("Agent error: connection reset".to_string())
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = vec![
            text("outline"),
            text(r#"{"error": "overloaded"}"#),
            Content::Structured(json!({ "a": 1 })),
        ];

        for content in &inputs {
            let first = ResponseClassifier::classify(AgentOutcome::Content(content));
            let second = ResponseClassifier::classify(AgentOutcome::Content(content));
            assert_eq!(first, second);
        }
    }
}
