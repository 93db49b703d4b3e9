//! Reads the model's free-text answer into a `StructuredResult`.
//!
//! The text is expected to be a JSON object but is not trusted. Failures come back as
//! `AppError` values that keep the raw text.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::analysis::{
    AnalysisMode, Interpretation, MatchResult, ScoreResult, StructuredResult,
};

pub const SCORE_KEY: &str = "Resume Score";
pub const REVIEW_KEY: &str = "Review";
pub const PROFILE_SUMMARY_KEY: &str = "Profile Summary";
pub const JD_MATCH_KEY: &str = "JD Match";
pub const MISSING_KEYWORDS_KEY: &str = "Missing keywords";
pub const MATCH_SUMMARY_KEY: &str = "profile summary";

pub const NO_REVIEW: &str = "No review available.";
pub const NO_SUMMARY: &str = "No profile summary available.";

pub fn interpret(raw: &str, mode: AnalysisMode) -> Result<Interpretation, AppError> {
    let text = strip_json_fences(raw);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::malformed(format!("response is not valid JSON ({e})"), raw))?;
    let Value::Object(fields) = value else {
        return Err(AppError::malformed("response is not a JSON object", raw));
    };

    match mode {
        AnalysisMode::Scorer => {
            let result = interpret_score(&fields, raw)?;
            debug!("Interpreted scorer response: score={:?}", result.score);
            Ok(Interpretation {
                result: StructuredResult::Scorer(result),
                mismatch_percent: None,
            })
        }
        AnalysisMode::Matcher => {
            let result = interpret_match(&fields, raw)?;
            debug!(
                "Interpreted matcher response: match={} missing={}",
                result.match_percent,
                result.missing_keywords.len()
            );
            Ok(Interpretation {
                mismatch_percent: Some(result.mismatch_percent()),
                result: StructuredResult::Matcher(result),
            })
        }
    }
}

fn interpret_score(fields: &Map<String, Value>, raw: &str) -> Result<ScoreResult, AppError> {
    let score = match lookup(fields, SCORE_KEY) {
        None | Some(Value::Null) => {
            warn!("Model response has no '{SCORE_KEY}'");
            None
        }
        Some(Value::Number(n)) => {
            let text = n.to_string();
            Some(parse_number(SCORE_KEY, &text, raw)?)
        }
        Some(Value::String(s)) => {
            let text = s.trim();
            Some(parse_number(SCORE_KEY, text.strip_suffix('%').unwrap_or(text), raw)?)
        }
        Some(other) => {
            return Err(AppError::malformed(
                format!("'{SCORE_KEY}' must be a number or string, got {}", kind(other)),
                raw,
            ))
        }
    };

    Ok(ScoreResult {
        score,
        review: text_or(fields, REVIEW_KEY, NO_REVIEW),
        profile_summary: text_or(fields, PROFILE_SUMMARY_KEY, NO_SUMMARY),
    })
}

fn interpret_match(fields: &Map<String, Value>, raw: &str) -> Result<MatchResult, AppError> {
    let match_percent = match lookup(fields, JD_MATCH_KEY) {
        None => {
            return Err(AppError::malformed(
                format!("'{JD_MATCH_KEY}' is missing"),
                raw,
            ))
        }
        Some(Value::String(s)) => {
            if !s.trim_end().ends_with('%') {
                return Err(AppError::malformed(
                    format!("'{JD_MATCH_KEY}' must end with '%', got '{s}'"),
                    raw,
                ));
            }
            parse_percentage(JD_MATCH_KEY, s, raw)?
        }
        Some(other) => {
            return Err(AppError::malformed(
                format!("'{JD_MATCH_KEY}' must be a percentage string, got {}", kind(other)),
                raw,
            ))
        }
    };

    let missing_keywords = match lookup(fields, MISSING_KEYWORDS_KEY) {
        None | Some(Value::Null) => {
            warn!("Model response has no '{MISSING_KEYWORDS_KEY}'; treating as empty");
            Vec::new()
        }
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                    AppError::malformed(
                        format!("'{MISSING_KEYWORDS_KEY}' must contain only strings"),
                        raw,
                    )
                })
            })
            .filter(|kw| !matches!(kw, Ok(s) if s.is_empty()))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(AppError::malformed(
                format!("'{MISSING_KEYWORDS_KEY}' must be an array, got {}", kind(other)),
                raw,
            ))
        }
    };

    Ok(MatchResult {
        match_percent,
        missing_keywords,
        profile_summary: text_or(fields, MATCH_SUMMARY_KEY, NO_SUMMARY),
    })
}

/// Coerces a `<number>%` string into a number in [0, 100].
fn parse_percentage(field: &str, value: &str, raw: &str) -> Result<f64, AppError> {
    let trimmed = value.trim();
    let Some(number) = trimmed.strip_suffix('%') else {
        return Err(invalid_percentage(field, value, raw));
    };
    parse_number(field, number, raw).map_err(|_| invalid_percentage(field, value, raw))
}

fn parse_number(field: &str, text: &str, raw: &str) -> Result<f64, AppError> {
    match text.trim().parse::<f64>() {
        // -0 parses and is in range; report it as plain 0
        Ok(n) if (0.0..=100.0).contains(&n) => Ok(if n == 0.0 { 0.0 } else { n }),
        _ => Err(invalid_percentage(field, text, raw)),
    }
}

fn invalid_percentage(field: &str, value: &str, raw: &str) -> AppError {
    AppError::InvalidPercentage {
        field: field.to_string(),
        value: value.to_string(),
        raw: raw.to_string(),
    }
}

/// Exact key first, then a case-insensitive match.
fn lookup<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).or_else(|| {
        fields
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn text_or(fields: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    match lookup(fields, key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => placeholder.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
