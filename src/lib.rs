pub mod analyzer;
pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod prompt;
pub mod report;
pub mod session;
pub mod telemetry;
pub mod url_input;
pub mod validator;

use std::sync::Arc;
use parking_lot::Mutex;

use analyzer::Analyzer;
use llm::TextGenerator;
use session::AnalysisSession;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub session: Arc<Mutex<AnalysisSession>>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            analyzer: Analyzer::new(generator),
            session: Arc::new(Mutex::new(AnalysisSession::new())),
        }
    }
}
