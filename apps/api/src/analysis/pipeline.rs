//! Analysis pipeline: validate, assemble, complete, interpret, present.
//!
//! One call is one independent submission. Nothing is shared between runs and a
//! failed step ends the run; there are no retries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::assembler::assemble;
use crate::analysis::interpreter::interpret;
use crate::analysis::presentation::{present, PresentationView};
use crate::errors::AppError;
use crate::llm_client::CompletionService;
use crate::models::analysis::{AnalysisMode, PromptRequest, StructuredResult};

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub request_id: Uuid,
    pub mode: AnalysisMode,
    pub analyzed_at: DateTime<Utc>,
    pub resume_chars: usize,
    pub result: StructuredResult,
    pub view: PresentationView,
}

pub async fn run_analysis(
    llm: &dyn CompletionService,
    mode: AnalysisMode,
    request: PromptRequest,
) -> Result<AnalysisReport, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analysis", %request_id, mode = mode.as_str());

    async move {
        if request.resume_text.trim().is_empty() {
            return Err(AppError::Validation(
                "resume text cannot be empty".to_string(),
            ));
        }

        let prompt = assemble(mode, &request)?;
        info!("Requesting completion ({} prompt chars)", prompt.user.len());

        let raw = llm.complete(&prompt.user, &prompt.system).await?;
        let interpretation = interpret(&raw, mode)?;
        let view = present(&interpretation);

        info!("Analysis complete: {}", view.headline.display);

        Ok(AnalysisReport {
            request_id,
            mode: interpretation.result.mode(),
            analyzed_at: Utc::now(),
            resume_chars: request.resume_text.chars().count(),
            result: interpretation.result,
            view,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::analysis::presentation::KeywordState;
    use crate::llm_client::LlmError;

    /// Completion service double: returns a canned answer and records prompts.
    pub(crate) struct FakeCompletion {
        pub reply: Result<String, u16>,
        pub calls: AtomicUsize,
        pub last_prompt: Mutex<Option<String>>,
    }

    impl FakeCompletion {
        pub fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for FakeCompletion {
        async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "upstream failure".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_scorer_run_produces_report() {
        let llm = FakeCompletion::replying(
            r#"{"Resume Score": "85", "Review": "Strong background", "Profile Summary": "Senior engineer"}"#,
        );
        let report = run_analysis(
            &llm,
            AnalysisMode::Scorer,
            PromptRequest::new("Ten years of Rust", None),
        )
        .await
        .unwrap();

        assert_eq!(report.mode, AnalysisMode::Scorer);
        assert_eq!(report.view.headline.value, Some(85.0));
        assert_eq!(report.resume_chars, "Ten years of Rust".len());
        assert!(llm
            .last_prompt
            .lock()
            .unwrap()
            .as_deref()
            .unwrap()
            .contains("Ten years of Rust"));
    }

    #[tokio::test]
    async fn test_matcher_run_maps_chart_and_keywords() {
        let llm = FakeCompletion::replying(
            r#"{"JD Match":"73%","Missing keywords":["Kubernetes","Go"],"profile summary":"Backend focus"}"#,
        );
        let report = run_analysis(
            &llm,
            AnalysisMode::Matcher,
            PromptRequest::new("Java backend", Some("Go + Kubernetes".to_string())),
        )
        .await
        .unwrap();

        let chart = report.view.chart.unwrap();
        assert_eq!(chart.slices[0].value, 73.0);
        assert_eq!(chart.slices[1].value, 27.0);
        assert_eq!(report.view.keywords.state, KeywordState::Missing);
    }

    #[tokio::test]
    async fn test_empty_resume_never_reaches_completion_service() {
        let llm = FakeCompletion::replying("{}");
        let err = run_analysis(&llm, AnalysisMode::Scorer, PromptRequest::new("  \n", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_template_error_never_reaches_completion_service() {
        let llm = FakeCompletion::replying("{}");
        let err = run_analysis(&llm, AnalysisMode::Matcher, PromptRequest::new("cv", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Template(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prose_reply_is_malformed_with_raw_text() {
        let llm = FakeCompletion::replying("Sorry, I cannot process this request.");
        let err = run_analysis(&llm, AnalysisMode::Scorer, PromptRequest::new("cv", None))
            .await
            .unwrap_err();
        assert_eq!(
            err.raw_response(),
            Some("Sorry, I cannot process this request.")
        );
    }

    #[tokio::test]
    async fn test_completion_failure_is_not_retried() {
        let llm = FakeCompletion::failing(503);
        let err = run_analysis(&llm, AnalysisMode::Scorer, PromptRequest::new("cv", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 503, .. })));
        assert_eq!(llm.call_count(), 1);
    }
}
