//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::analysis::extractor::{extract_resume_text, is_pdf};
use crate::analysis::pipeline::{run_analysis, AnalysisReport};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisMode, PromptRequest};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TextAnalysisRequest {
    pub mode: AnalysisMode,
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// Fields collected from a multipart upload.
#[derive(Debug, Default)]
struct Upload {
    resume: Option<Bytes>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/score
///
/// Multipart with a `resume` PDF. Returns score, review and profile summary.
pub async fn handle_score(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let upload = read_upload(multipart?).await?;
    analyze_upload(&state, AnalysisMode::Scorer, upload).await
}

/// POST /api/v1/analysis/match
///
/// Multipart with a `resume` PDF and a `job_description` text field.
/// Returns match percentage, chart slices and missing keywords.
pub async fn handle_match(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let upload = read_upload(multipart?).await?;
    if upload
        .job_description
        .as_deref()
        .map_or(true, |jd| jd.trim().is_empty())
    {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    analyze_upload(&state, AnalysisMode::Matcher, upload).await
}

/// POST /api/v1/analysis/text
///
/// Same pipeline for callers that already have the resume as plain text.
pub async fn handle_text(
    State(state): State<AppState>,
    payload: Result<Json<TextAnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisReport>, AppError> {
    let Json(request) = payload?;
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let prompt_request = PromptRequest::new(request.resume_text, request.job_description);
    let report = run_analysis(state.llm.as_ref(), request.mode, prompt_request).await?;
    Ok(Json(report))
}

async fn analyze_upload(
    state: &AppState,
    mode: AnalysisMode,
    upload: Upload,
) -> Result<Json<AnalysisReport>, AppError> {
    let pdf = upload
        .resume
        .ok_or_else(|| AppError::Validation(format!("missing '{RESUME_FIELD}' file")))?;

    info!("Received {} byte resume for {}", pdf.len(), mode.as_str());
    let resume_text = extract_resume_text(pdf).await?;

    let request = PromptRequest::new(resume_text, upload.job_description);
    let report = run_analysis(state.llm.as_ref(), mode, request).await?;
    Ok(Json(report))
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    let mut upload = Upload::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;

                if !is_pdf(content_type.as_deref(), file_name.as_deref(), &data) {
                    return Err(AppError::Validation(
                        "only PDF resumes are accepted".to_string(),
                    ));
                }
                upload.resume = Some(data);
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                upload.job_description = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(upload)
}
