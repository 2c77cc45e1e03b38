use serde::Serialize;

use crate::error::{AppError, Result, ANALYSIS_FAILED_MESSAGE};
use crate::models::{AnalysisCategory, AnalysisResult};
use crate::report::AnalysisReport;
use crate::url_input::validate_url;

pub const CATEGORY_SWITCH_FAILED_MESSAGE: &str = "An error occurred while switching analysis type.";

/// Identifies one issued request; only the most recent ticket may publish a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    UrlSubmitted,
    CategorySwitched,
}

/// A request the caller must now run and report back through `AnalysisSession::complete`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub url: String,
    pub category: AnalysisCategory,
    pub origin: RequestOrigin,
}

/// Interactive state behind the analysis UI: current URL, active tab and the single result slot.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    url: Option<String>,
    active_category: AnalysisCategory,
    loading: bool,
    error: Option<String>,
    result: Option<AnalysisResult>,
    last_ticket: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub url: Option<String>,
    pub active_category: AnalysisCategory,
    pub loading: bool,
    pub error: Option<String>,
    pub report: Option<AnalysisReport>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn active_category(&self) -> AnalysisCategory {
        self.active_category
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Accepts a new URL for the active category. Invalid input records the
    /// message, issues no request and drops any outcome still pending.
    pub fn submit_url(&mut self, raw: &str) -> Result<PendingAnalysis> {
        let url = match validate_url(raw) {
            Ok(url) => url,
            Err(err) => {
                // Retire any request still in flight so it cannot overwrite the message.
                self.last_ticket += 1;
                self.loading = false;
                self.error = Some(err.user_message());
                self.result = None;
                return Err(err);
            }
        };

        self.url = Some(url.clone());
        Ok(self.begin(url, RequestOrigin::UrlSubmitted))
    }

    /// Changes the active tab; re-runs the analysis when a URL is already set.
    pub fn switch_category(&mut self, category: AnalysisCategory) -> Option<PendingAnalysis> {
        self.active_category = category;
        let url = self.url.clone()?;
        Some(self.begin(url, RequestOrigin::CategorySwitched))
    }

    fn begin(&mut self, url: String, origin: RequestOrigin) -> PendingAnalysis {
        self.last_ticket += 1;
        self.loading = true;
        self.error = None;
        self.result = None;

        tracing::debug!(ticket = self.last_ticket, %url, category = %self.active_category, "analysis started");

        PendingAnalysis {
            ticket: Ticket(self.last_ticket),
            url,
            category: self.active_category,
            origin,
        }
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.last_ticket
    }

    /// Publishes the outcome of `pending`. Returns `false` when a newer request
    /// has been issued since, in which case the outcome is dropped.
    pub fn complete(&mut self, pending: &PendingAnalysis, outcome: Result<AnalysisResult>) -> bool {
        if !self.is_latest(pending.ticket) {
            tracing::debug!(
                ticket = pending.ticket.0,
                latest = self.last_ticket,
                "discarding superseded analysis outcome"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                self.result = None;
                self.error = Some(failure_message(&err, pending.origin));
            }
        }
        true
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            url: self.url.clone(),
            active_category: self.active_category,
            loading: self.loading,
            error: self.error.clone(),
            report: self
                .result
                .as_ref()
                .map(|result| AnalysisReport::build(self.active_category, result)),
        }
    }
}

fn failure_message(err: &AppError, origin: RequestOrigin) -> String {
    if !err.is_analysis_failure() {
        return err.user_message();
    }
    match origin {
        RequestOrigin::UrlSubmitted => ANALYSIS_FAILED_MESSAGE.to_string(),
        RequestOrigin::CategorySwitched => CATEGORY_SWITCH_FAILED_MESSAGE.to_string(),
    }
}
