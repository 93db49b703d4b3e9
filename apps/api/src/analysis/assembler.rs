//! Fills the scorer or matcher template with the resume text and job description.

use tracing::debug;

use crate::analysis::prompts::{
    required_placeholders, system_prompt, template_for, JOB_DESCRIPTION, RESUME_TEXT,
};
use crate::errors::AppError;
use crate::models::analysis::{AnalysisMode, PromptRequest};

/// A prompt ready for the completion service.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    pub system: String,
    pub user: String,
}

pub fn assemble(mode: AnalysisMode, request: &PromptRequest) -> Result<AssembledPrompt, AppError> {
    let job_description = request
        .job_description
        .as_deref()
        .filter(|jd| !jd.trim().is_empty());

    let mut vars: Vec<(&str, &str)> = vec![(RESUME_TEXT, request.resume_text.as_str())];
    match (mode, job_description) {
        (AnalysisMode::Matcher, Some(jd)) => vars.push((JOB_DESCRIPTION, jd)),
        (AnalysisMode::Scorer, Some(_)) => {
            debug!("Scorer mode ignores the supplied job description");
        }
        _ => {}
    }

    for name in required_placeholders(mode) {
        if !vars.iter().any(|(provided, _)| provided == name) {
            return Err(AppError::Template(format!(
                "{} prompt requires a value for '{name}'",
                mode.as_str()
            )));
        }
    }

    Ok(AssembledPrompt {
        system: system_prompt(mode),
        user: fill_template(template_for(mode), &vars),
    })
}

/// Single-pass `{name}` substitution. Inserted values are never re-scanned, so a
/// resume that happens to contain `{job_description}` stays literal.
/// Braces that do not open a known placeholder are copied through unchanged.
fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(name, _)| after.starts_with(name) && after[name.len()..].starts_with('}'));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
