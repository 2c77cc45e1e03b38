use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::models::{AnalysisCategory, AnalysisResult};
use crate::report::AnalysisReport;
use crate::session::{SessionSnapshot, Ticket};
use crate::validator::TrendGap;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    /// Wire name such as `on-page`; defaults to on-page when omitted.
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub category: AnalysisCategory,
    pub analyzed_at: DateTime<Utc>,
    pub result: AnalysisResult,
    pub report: AnalysisReport,
    pub trend_gaps: Vec<TrendGap>,
}

#[derive(Deserialize)]
pub struct SubmitUrlRequest {
    pub url: String,
}

#[derive(Deserialize)]
pub struct SwitchCategoryRequest {
    pub category: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub ticket: Option<Ticket>,
    /// Set when a newer request replaced this one before it finished.
    pub superseded: bool,
    pub session: SessionSnapshot,
}

#[derive(Serialize)]
pub struct CategoryInfo {
    pub id: AnalysisCategory,
    pub label: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
