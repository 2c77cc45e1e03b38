use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, Result};
use crate::llm::TextGenerator;
use crate::models::{AnalysisCategory, AnalysisResult};
use crate::prompt::build_request;
use crate::validator::{parse_response, trend_gaps};

/// Runs one analysis round trip: prompt, remote call, validation.
#[derive(Clone)]
pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// `url` must already have passed `url_input::validate_url`.
    pub async fn analyze(&self, url: &str, category: AnalysisCategory) -> Result<AnalysisResult> {
        let request = build_request(url, category)?;
        tracing::debug!(%url, %category, prompt_chars = request.prompt.len(), "built analysis request");

        let started = Instant::now();
        let raw = match self.generator.generate(&request).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!(%url, %category, "analysis service call failed: {}", err);
                return Err(match err {
                    transport @ AppError::TransportFailure(_) => transport,
                    other => AppError::TransportFailure(other.to_string()),
                });
            }
        };
        tracing::info!(%url, %category, elapsed = ?started.elapsed(), response_chars = raw.len(), "analysis service responded");

        let result = parse_response(&raw).inspect_err(|err| {
            tracing::error!(%url, %category, "rejected analysis response: {}", err);
        })?;

        for gap in trend_gaps(&result, category) {
            tracing::warn!(%url, metric = %gap.metric, kind = ?gap.kind, "performance trend does not match the requested shape");
        }

        Ok(result)
    }
}
