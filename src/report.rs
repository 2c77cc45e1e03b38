use serde::Serialize;

use crate::models::{AnalysisCategory, AnalysisResult, Metric, MetricValue, ScoreBand};

/// Display-ready projection of an `AnalysisResult` for the active category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub category: AnalysisCategory,
    pub category_label: &'static str,
    pub cards: Vec<MetricCard>,
    pub trends: Vec<TrendChart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
    pub display: String,
    pub explanation: String,
    pub recommendation: String,
    pub score: u8,
    pub band: ScoreBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChart {
    pub name: String,
    pub current: String,
    pub score: u8,
    pub band: ScoreBand,
    pub samples: Vec<f64>,
    /// Bottom, middle and top gridline labels, rounded to two decimals.
    pub y_axis: [f64; 3],
    pub x_labels: Vec<&'static str>,
}

impl AnalysisReport {
    pub fn build(category: AnalysisCategory, result: &AnalysisResult) -> Self {
        let trends = if category == AnalysisCategory::Performance {
            result.metrics.iter().filter_map(TrendChart::from_metric).collect()
        } else {
            Vec::new()
        };

        Self {
            category,
            category_label: category.label(),
            cards: result.metrics.iter().map(MetricCard::from).collect(),
            trends,
        }
    }
}

impl From<&Metric> for MetricCard {
    fn from(metric: &Metric) -> Self {
        let value = match &metric.value {
            MetricValue::Numeric { amount, .. } => amount.to_string(),
            MetricValue::Descriptive(text) => text.clone(),
        };

        Self {
            name: metric.name.clone(),
            value,
            unit: metric.unit().map(str::to_string),
            display: metric.value.display(),
            explanation: metric.explanation.clone(),
            recommendation: metric.recommendation.clone(),
            score: metric.score,
            band: metric.score_band(),
        }
    }
}

impl TrendChart {
    /// Only metrics with at least two samples can be drawn as a line.
    pub fn from_metric(metric: &Metric) -> Option<Self> {
        let samples = metric.historical_data.as_ref().filter(|s| s.len() > 1)?;

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let last = samples.len() - 1;
        let x_labels = (0..samples.len())
            .map(|i| match i {
                0 => "Older",
                i if i == last => "Now",
                _ => "",
            })
            .collect();

        Some(Self {
            name: metric.name.clone(),
            current: metric.value.display(),
            score: metric.score,
            band: metric.score_band(),
            samples: samples.clone(),
            y_axis: [round2(min), round2((min + max) / 2.0), round2(max)],
            x_labels,
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(name: &str, value: MetricValue, score: u8, history: Option<Vec<f64>>) -> Metric {
        Metric {
            name: name.to_string(),
            value,
            explanation: "e".to_string(),
            recommendation: "r".to_string(),
            score,
            historical_data: history,
        }
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            metrics: vec![
                metric(
                    "Largest Contentful Paint (LCP)",
                    MetricValue::Numeric { amount: 2.4, unit: Some("s".to_string()) },
                    68,
                    Some(vec![3.333, 3.0, 2.8, 2.6, 2.4]),
                ),
                metric(
                    "Image Optimization",
                    MetricValue::Descriptive("Needs Improvement".to_string()),
                    40,
                    None,
                ),
            ],
        }
    }

    #[test]
    fn performance_report_charts_trends() {
        let report = AnalysisReport::build(AnalysisCategory::Performance, &sample_result());

        assert_eq!(report.category_label, "Performance");
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.trends.len(), 1);

        let chart = &report.trends[0];
        assert_eq!(chart.current, "2.4 s");
        assert_eq!(chart.band, ScoreBand::Fair);
        assert_eq!(chart.y_axis, [2.4, 2.87, 3.33]);
        assert_eq!(chart.x_labels, vec!["Older", "", "", "", "Now"]);
    }

    #[test]
    fn other_categories_have_no_charts() {
        let report = AnalysisReport::build(AnalysisCategory::OnPage, &sample_result());
        assert!(report.trends.is_empty());
        assert_eq!(report.cards.len(), 2);
    }

    #[test]
    fn cards_split_value_and_unit() {
        let report = AnalysisReport::build(AnalysisCategory::Performance, &sample_result());
        let lcp = &report.cards[0];
        assert_eq!(lcp.value, "2.4");
        assert_eq!(lcp.unit.as_deref(), Some("s"));
        assert_eq!(lcp.display, "2.4 s");

        let images = &report.cards[1];
        assert_eq!(images.value, "Needs Improvement");
        assert_eq!(images.unit, None);
        assert_eq!(images.band, ScoreBand::Poor);
    }

    #[test]
    fn flat_trend_labels_collapse_to_the_value() {
        let m = metric("CLS", MetricValue::Numeric { amount: 0.1, unit: None }, 90, Some(vec![0.1; 5]));
        let chart = TrendChart::from_metric(&m).unwrap();
        assert_eq!(chart.y_axis, [0.1, 0.1, 0.1]);
        assert_eq!(chart.x_labels, vec!["Older", "", "", "", "Now"]);
    }

    #[test]
    fn single_sample_is_not_charted() {
        let m = metric("FCP", MetricValue::Numeric { amount: 1.0, unit: None }, 90, Some(vec![1.0]));
        assert!(TrendChart::from_metric(&m).is_none());
    }
}
