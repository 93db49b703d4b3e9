use serde::{Deserialize, Serialize};

/// Which analysis the pipeline runs. Selects the prompt template and the expected fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Standalone resume score with a written review.
    Scorer,
    /// Resume matched against a job description.
    Matcher,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Scorer => "scorer",
            AnalysisMode::Matcher => "matcher",
        }
    }
}

/// Input to one pipeline run.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

impl PromptRequest {
    pub fn new(resume_text: impl Into<String>, job_description: Option<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// `None` when the model left the score out.
    pub score: Option<f64>,
    pub review: String,
    pub profile_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub match_percent: f64,
    pub missing_keywords: Vec<String>,
    pub profile_summary: String,
}

impl MatchResult {
    /// Complement of the match, for the two-slice chart.
    pub fn mismatch_percent(&self) -> f64 {
        100.0 - self.match_percent
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StructuredResult {
    Scorer(ScoreResult),
    Matcher(MatchResult),
}

impl StructuredResult {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            StructuredResult::Scorer(_) => AnalysisMode::Scorer,
            StructuredResult::Matcher(_) => AnalysisMode::Matcher,
        }
    }
}

/// Interpreted model answer plus the derived complement used by the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interpretation {
    pub result: StructuredResult,
    pub mismatch_percent: Option<f64>,
}
