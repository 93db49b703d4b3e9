//! Display values derived from an `Interpretation`: the headline metric, the
//! match/mismatch pie slices and the keyword list colouring.

use serde::Serialize;

use crate::analysis::interpreter::NO_SUMMARY;
use crate::models::analysis::{AnalysisMode, Interpretation, StructuredResult};

pub const MATCH_COLOR: &str = "#2ecc71";
pub const MISMATCH_COLOR: &str = "#e74c3c";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: Option<f64>,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: &'static str,
    pub value: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub slices: [PieSlice; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordState {
    /// Scorer mode has no keyword comparison.
    NotApplicable,
    NoneMissing,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordList {
    pub state: KeywordState,
    pub color: Option<&'static str>,
    pub message: Option<&'static str>,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationView {
    pub mode: AnalysisMode,
    pub headline: Metric,
    pub chart: Option<PieChart>,
    pub keywords: KeywordList,
    pub profile_summary: String,
    pub review: Option<String>,
}

pub fn present(interpretation: &Interpretation) -> PresentationView {
    match &interpretation.result {
        StructuredResult::Scorer(r) => PresentationView {
            mode: AnalysisMode::Scorer,
            headline: Metric {
                label: "Resume Score",
                value: r.score,
                display: r
                    .score
                    .map(|s| format!("{}/100", format_number(s)))
                    .unwrap_or_else(|| "N/A".to_string()),
            },
            chart: None,
            keywords: KeywordList {
                state: KeywordState::NotApplicable,
                color: None,
                message: None,
                items: Vec::new(),
            },
            profile_summary: r.profile_summary.clone(),
            review: Some(r.review.clone()),
        },
        StructuredResult::Matcher(r) => {
            let mismatch = interpretation
                .mismatch_percent
                .unwrap_or_else(|| r.mismatch_percent());
            let keywords = if r.missing_keywords.is_empty() {
                KeywordList {
                    state: KeywordState::NoneMissing,
                    color: Some(MATCH_COLOR),
                    message: Some("No missing keywords. Your resume covers the job description."),
                    items: Vec::new(),
                }
            } else {
                KeywordList {
                    state: KeywordState::Missing,
                    color: Some(MISMATCH_COLOR),
                    message: None,
                    items: r.missing_keywords.clone(),
                }
            };

            PresentationView {
                mode: AnalysisMode::Matcher,
                headline: Metric {
                    label: "JD Match",
                    value: Some(r.match_percent),
                    display: format!("{}%", format_number(r.match_percent)),
                },
                chart: Some(PieChart {
                    slices: [
                        PieSlice {
                            label: "Match",
                            value: r.match_percent,
                            color: MATCH_COLOR,
                        },
                        PieSlice {
                            label: "Mismatch",
                            value: mismatch,
                            color: MISMATCH_COLOR,
                        },
                    ],
                }),
                keywords,
                profile_summary: if r.profile_summary.is_empty() {
                    NO_SUMMARY.to_string()
                } else {
                    r.profile_summary.clone()
                },
                review: None,
            }
        }
    }
}

/// Whole numbers without a trailing `.0`, everything else to one decimal.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n:.1}")
    }
}
