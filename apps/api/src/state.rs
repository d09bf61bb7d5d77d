use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::flows::FlowDeps;
use crate::llm_client::Generator;
use crate::portfolio::profile::OwnerProfile;
use crate::resilience::Invoker;
use crate::web_content::ContentSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Remote generation backend. Default: LlmClient (Gemini).
    pub generator: Arc<dyn Generator>,
    /// Primary-content source for the explain flow. Default: WebScraper.
    pub content_source: Arc<dyn ContentSource>,
    pub profile: Arc<OwnerProfile>,
    pub config: Config,
}

impl AppState {
    /// Flow dependencies for one request. Invokers are stateless, so a fresh one per request is free.
    pub fn flow_deps(&self) -> FlowDeps<'_> {
        FlowDeps {
            generator: self.generator.as_ref(),
            invoker: Invoker::new(self.config.retry_policy()),
            failure_mode: self.config.failure_mode,
        }
    }
}
