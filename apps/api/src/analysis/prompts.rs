// Prompt templates for the two analysis modes.
// Placeholders are `{resume_text}` and `{job_description}`; see assembler.rs.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::analysis::AnalysisMode;

pub const RESUME_TEXT: &str = "resume_text";
pub const JOB_DESCRIPTION: &str = "job_description";

const REVIEWER_PERSONA: &str = "You are an experienced hiring manager and ATS \
    (Applicant Tracking System) with a deep understanding of software engineering, \
    data science, data analysis and big data engineering.";

/// Standalone resume scoring prompt. Replace `{resume_text}` before sending.
pub const SCORER_PROMPT_TEMPLATE: &str = r#"Act like an experienced hiring manager and ATS (Applicant Tracking System) with a deep understanding of tech fields like software engineering, data science, and big data. Analyze the given resume against general hiring standards and provide:
1. Resume Score (out of 100) based on its quality, relevance, and completeness for general hiring purposes.
2. A detailed review highlighting strengths, weaknesses, and areas for improvement.
3. A concise summary of the candidate's profile.

resume: {resume_text}

Return a JSON object with this EXACT structure:
{
    "Resume Score": "numeric",
    "Review": "detailed feedback on strengths and weaknesses",
    "Profile Summary": "concise summary"
}"#;

/// Resume vs job description prompt. Replace `{resume_text}` and `{job_description}`.
pub const MATCHER_PROMPT_TEMPLATE: &str = r#"Act like a skilled ATS (Applicant Tracking System) with a deep understanding of tech fields like software engineering, data science, data analysis, and big data engineering. Evaluate the resume against the job description. The job market is very competitive, so give the best possible assistance for improving the resume. Assign a percentage match to the job description and list the keywords from the job description that the resume is missing.

resume: {resume_text}

description: {job_description}

Return a JSON object with this EXACT structure:
{
    "JD Match": "<number>%",
    "Missing keywords": ["keyword"],
    "profile summary": "concise summary"
}"#;

pub fn template_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Scorer => SCORER_PROMPT_TEMPLATE,
        AnalysisMode::Matcher => MATCHER_PROMPT_TEMPLATE,
    }
}

/// Placeholders the template for `mode` cannot be sent without.
pub fn required_placeholders(mode: AnalysisMode) -> &'static [&'static str] {
    match mode {
        AnalysisMode::Scorer => &[RESUME_TEXT],
        AnalysisMode::Matcher => &[RESUME_TEXT, JOB_DESCRIPTION],
    }
}

pub fn system_prompt(mode: AnalysisMode) -> String {
    let task = match mode {
        AnalysisMode::Scorer => "Score the resume and review it.",
        AnalysisMode::Matcher => "Match the resume against the job description.",
    };
    format!("{REVIEWER_PERSONA} {task} {JSON_ONLY_SYSTEM}")
}
