use serde_json::{json, Value};

use crate::error::{AppError, Result};
use crate::models::AnalysisCategory;

/// Everything the remote model needs for one analysis: the instruction and the output shape it must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub prompt: String,
    pub response_schema: Value,
}

/// Number of trend samples requested for each Core Web Vital.
pub const TREND_LENGTH: usize = 5;

pub fn build_request(url: &str, category: AnalysisCategory) -> Result<AnalysisRequest> {
    if url.trim().is_empty() {
        return Err(AppError::InvalidInput("URL must not be empty".to_string()));
    }

    Ok(AnalysisRequest {
        prompt: build_prompt(url, category),
        response_schema: response_schema(),
    })
}

pub fn build_prompt(url: &str, category: AnalysisCategory) -> String {
    let focus = category_clause(category);
    let mut result = String::with_capacity(url.len() + focus.len() + 512);
    result.push_str("Analyze the website at the URL: ");
    result.push_str(url);
    result.push_str(". Provide a detailed analysis for the requested focus area. For each metric, return a 'name', its current 'value' (a number or short text), a brief 'explanation' of what the metric measures, an actionable 'recommendation' for improving it, and a 'score' from 0 to 100 for how well it is implemented (0 is very poor, 100 is excellent).\n\n");
    result.push_str(&focus);
    result
}

fn category_clause(category: AnalysisCategory) -> String {
    match category {
        AnalysisCategory::OnPage => {
            "Focus on On-Page SEO. Include metrics for: Title Tag, Meta Description, H1 Tag Usage, Image Alt Attributes, Internal Linking, and Mobile Friendliness."
                .to_string()
        }
        AnalysisCategory::OffPage => {
            "Focus on Off-Page SEO. Backlinks cannot be crawled, so give a conceptual assessment. Include metrics for: Domain Authority (estimated concept), Backlink Profile (conceptual strength), Social Media Presence (look for social links on the page), and Brand Mentions (conceptual). The 'value' of each of these must be descriptive text such as 'Appears Strong' or 'Needs Improvement'."
                .to_string()
        }
        AnalysisCategory::Content => {
            "Focus on Content Analysis. Include metrics for: Readability Score (e.g. Flesch-Kincaid), Content Originality (conceptual assessment), Keyword Usage (are there clear topics?), and Call-to-Actions (presence and clarity). For Readability the value must be a grade level."
                .to_string()
        }
        AnalysisCategory::Performance => format!(
            "Focus on Web Performance. For the Core Web Vitals 'Largest Contentful Paint (LCP)', 'First Contentful Paint (FCP)' and 'Cumulative Layout Shift (CLS)', give an estimated 'value', a 'unit' ('s' for seconds, omitted for CLS because it is unitless) and a 'score'. For each of those three also return a 'historicalData' array of exactly {n} hypothetical past values showing a trend; the last element of 'historicalData' must equal the current 'value'.\nAlso include conceptual metrics based on best practices visible in the page source: Image Optimization, JavaScript/CSS Minification, and Caching Policy. These need no 'historicalData' and their 'value' must be descriptive.",
            n = TREND_LENGTH
        ),
    }
}

/// Structured-output constraint passed to the model alongside the prompt.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "metrics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "value": { "type": "STRING" },
                        "unit": {
                            "type": "STRING",
                            "description": "The unit for the value, e.g. 's', 'ms', 'KB'."
                        },
                        "explanation": { "type": "STRING" },
                        "recommendation": { "type": "STRING" },
                        "score": { "type": "INTEGER" },
                        "historicalData": {
                            "type": "ARRAY",
                            "items": { "type": "NUMBER" },
                            "description": format!("An array of {} hypothetical past values to show a trend.", TREND_LENGTH)
                        }
                    },
                    "required": ["name", "value", "explanation", "recommendation", "score"]
                }
            }
        },
        "required": ["metrics"]
    })
}
