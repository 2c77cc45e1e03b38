use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// The four fixed kinds of assessment a request can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisCategory {
    #[default]
    OnPage,
    OffPage,
    Content,
    Performance,
}

impl AnalysisCategory {
    /// Tab order.
    pub const ALL: [AnalysisCategory; 4] = [
        AnalysisCategory::OnPage,
        AnalysisCategory::OffPage,
        AnalysisCategory::Content,
        AnalysisCategory::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::OnPage => "on-page",
            AnalysisCategory::OffPage => "off-page",
            AnalysisCategory::Content => "content",
            AnalysisCategory::Performance => "performance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisCategory::OnPage => "On-Page SEO",
            AnalysisCategory::OffPage => "Off-Page SEO",
            AnalysisCategory::Content => "Content",
            AnalysisCategory::Performance => "Performance",
        }
    }
}

impl fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s.trim())
            .ok_or_else(|| AppError::UnsupportedCategory(s.to_string()))
    }
}

/// What a metric reports: a measured-looking number or a verdict in prose.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Numeric { amount: f64, unit: Option<String> },
    Descriptive(String),
}

impl MetricValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Numeric { amount, .. } => Some(*amount),
            MetricValue::Descriptive(_) => None,
        }
    }

    /// Text as a card would show it, e.g. `2.4 s` or `Appears Strong`.
    pub fn display(&self) -> String {
        match self {
            MetricValue::Numeric { amount, unit: Some(unit) } => format!("{} {}", amount, unit),
            MetricValue::Numeric { amount, unit: None } => amount.to_string(),
            MetricValue::Descriptive(text) => text.clone(),
        }
    }
}

/// Colour bucket for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => ScoreBand::Good,
            50..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMetric", into = "RawMetric")]
pub struct Metric {
    pub name: String,
    pub value: MetricValue,
    pub explanation: String,
    pub recommendation: String,
    pub score: u8,
    pub historical_data: Option<Vec<f64>>,
}

impl Metric {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    pub fn unit(&self) -> Option<&str> {
        match &self.value {
            MetricValue::Numeric { unit, .. } => unit.as_deref(),
            MetricValue::Descriptive(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: Vec<Metric>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

/// A metric exactly as it travels to and from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMetric {
    name: String,
    value: RawValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    explanation: String,
    recommendation: String,
    score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    historical_data: Option<Vec<f64>>,
}

impl TryFrom<RawMetric> for Metric {
    type Error = String;

    fn try_from(raw: RawMetric) -> Result<Self, Self::Error> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err("metric name must not be empty".to_string());
        }

        let score = u8::try_from(raw.score)
            .ok()
            .filter(|score| *score <= 100)
            .ok_or_else(|| format!("score {} of metric '{}' is outside 0..=100", raw.score, name))?;

        let unit = raw
            .unit
            .map(|unit| unit.trim().to_string())
            .filter(|unit| !unit.is_empty());

        let value = match raw.value {
            RawValue::Number(amount) => MetricValue::Numeric { amount, unit },
            RawValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(format!("metric '{}' has an empty value", name));
                }
                match trimmed.parse::<f64>() {
                    Ok(amount) if amount.is_finite() => MetricValue::Numeric { amount, unit },
                    _ => MetricValue::Descriptive(trimmed.to_string()),
                }
            }
        };

        Ok(Metric {
            name,
            value,
            explanation: raw.explanation,
            recommendation: raw.recommendation,
            score,
            historical_data: raw.historical_data,
        })
    }
}

impl From<Metric> for RawMetric {
    fn from(metric: Metric) -> Self {
        let (value, unit) = match metric.value {
            MetricValue::Numeric { amount, unit } => (RawValue::Number(amount), unit),
            MetricValue::Descriptive(text) => (RawValue::Text(text), None),
        };

        RawMetric {
            name: metric.name,
            value,
            unit,
            explanation: metric.explanation,
            recommendation: metric.recommendation,
            score: i64::from(metric.score),
            historical_data: metric.historical_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric_json(value: serde_json::Value) -> serde_json::Value {
        json!({
            "name": "Largest Contentful Paint (LCP)",
            "value": value,
            "unit": "s",
            "explanation": "Time until the largest element renders.",
            "recommendation": "Preload the hero image.",
            "score": 72
        })
    }

    #[test]
    fn category_wire_names_round_trip() {
        for category in AnalysisCategory::ALL {
            let parsed: AnalysisCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
            assert_eq!(
                serde_json::to_value(category).unwrap(),
                json!(category.as_str())
            );
        }
    }

    #[test]
    fn unknown_category_is_unsupported() {
        let err = "backlinks".parse::<AnalysisCategory>().unwrap_err();
        assert!(matches!(err, AppError::UnsupportedCategory(c) if c == "backlinks"));
    }

    #[test]
    fn numeric_string_value_becomes_numeric() {
        let metric: Metric = serde_json::from_value(metric_json(json!("2.4"))).unwrap();
        assert_eq!(
            metric.value,
            MetricValue::Numeric { amount: 2.4, unit: Some("s".to_string()) }
        );
        assert_eq!(metric.value.display(), "2.4 s");
        assert_eq!(metric.unit(), Some("s"));
    }

    #[test]
    fn prose_value_becomes_descriptive() {
        let metric: Metric = serde_json::from_value(metric_json(json!("Appears Strong"))).unwrap();
        assert_eq!(metric.value, MetricValue::Descriptive("Appears Strong".to_string()));
        assert_eq!(metric.unit(), None);
        assert_eq!(metric.value.as_number(), None);
    }

    #[test]
    fn nan_text_stays_descriptive() {
        let metric: Metric = serde_json::from_value(metric_json(json!("NaN"))).unwrap();
        assert_eq!(metric.value, MetricValue::Descriptive("NaN".to_string()));
    }

    #[test]
    fn score_out_of_range_is_rejected() {
        let mut raw = metric_json(json!("2.4"));
        raw["score"] = json!(101);
        assert!(serde_json::from_value::<Metric>(raw.clone()).is_err());

        raw["score"] = json!(-3);
        assert!(serde_json::from_value::<Metric>(raw).is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut raw = metric_json(json!("2.4"));
        raw.as_object_mut().unwrap().remove("recommendation");
        assert!(serde_json::from_value::<Metric>(raw).is_err());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let metric = Metric {
            name: "CLS".to_string(),
            value: MetricValue::Numeric { amount: 0.1, unit: None },
            explanation: "Layout stability.".to_string(),
            recommendation: "Reserve space for ads.".to_string(),
            score: 90,
            historical_data: Some(vec![0.3, 0.25, 0.2, 0.15, 0.1]),
        };

        let value = serde_json::to_value(&metric).unwrap();
        assert_eq!(value["value"], json!(0.1));
        assert_eq!(value["historicalData"], json!([0.3, 0.25, 0.2, 0.15, 0.1]));
        assert!(value.get("unit").is_none());
    }

    #[test]
    fn score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(80), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Poor);
        assert_eq!(ScoreBand::from_score(0), ScoreBand::Poor);
    }
}
