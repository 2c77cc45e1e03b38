use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{AnalysisCategory, AnalysisResult, Metric};
use crate::prompt::TREND_LENGTH;

/// Parses the model's raw text into an `AnalysisResult`.
///
/// The top-level shape is checked first (an object with a `metrics` array) so
/// that a wrong envelope is reported as such; every metric is then decoded
/// strictly: required fields, field types, a non-empty name and a score in
/// `0..=100`. Anything else is a `MalformedResponse`.
pub fn parse_response(raw: &str) -> Result<AnalysisResult> {
    let value: Value = serde_json::from_str(raw.trim())
        .map_err(|e| AppError::MalformedResponse(format!("response is not valid JSON: {}", e)))?;

    match value.get("metrics") {
        Some(Value::Array(_)) => {}
        Some(other) => {
            return Err(AppError::MalformedResponse(format!(
                "'metrics' must be an array, found {}",
                json_kind(other)
            )));
        }
        None => {
            return Err(AppError::MalformedResponse(format!(
                "expected an object with a 'metrics' array, found {}",
                json_kind(&value)
            )));
        }
    }

    let result: AnalysisResult = serde_json::from_value(value)
        .map_err(|e| AppError::MalformedResponse(format!("invalid metric: {}", e)))?;

    if result.metrics.is_empty() {
        return Err(AppError::MalformedResponse("response contains no metrics".to_string()));
    }

    Ok(result)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendGapKind {
    MissingHistory,
    WrongLength { found: usize },
    FinalSampleMismatch { last: f64, current: Option<f64> },
}

/// A Core Web Vital whose trend does not match what the prompt asked for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendGap {
    pub metric: String,
    #[serde(flatten)]
    pub kind: TrendGapKind,
}

const CORE_WEB_VITALS: [(&str, &str); 3] = [
    ("lcp", "largest contentful paint"),
    ("fcp", "first contentful paint"),
    ("cls", "cumulative layout shift"),
];

fn is_core_web_vital(metric: &Metric) -> bool {
    let name = metric.name.to_lowercase();
    CORE_WEB_VITALS.iter().any(|(short, long)| {
        name.contains(long) || name.split(|c: char| !c.is_alphanumeric()).any(|word| word == *short)
    })
}

/// Lists performance trends that deviate from the requested five-sample shape.
///
/// These are reported, not rejected: the trend is model-generated decoration.
pub fn trend_gaps(result: &AnalysisResult, category: AnalysisCategory) -> Vec<TrendGap> {
    if category != AnalysisCategory::Performance {
        return Vec::new();
    }

    result
        .metrics
        .iter()
        .filter(|metric| is_core_web_vital(metric))
        .filter_map(|metric| {
            let kind = match metric.historical_data.as_deref() {
                None | Some([]) => TrendGapKind::MissingHistory,
                Some(samples) if samples.len() != TREND_LENGTH => {
                    TrendGapKind::WrongLength { found: samples.len() }
                }
                Some(samples) => {
                    let last = samples[samples.len() - 1];
                    let current = metric.value.as_number();
                    match current {
                        Some(current) if approx_eq(last, current) => return None,
                        _ => TrendGapKind::FinalSampleMismatch { last, current },
                    }
                }
            };
            Some(TrendGap { metric: metric.name.clone(), kind })
        })
        .collect()
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}
