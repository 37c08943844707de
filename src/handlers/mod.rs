pub mod health;
pub mod metrics_handler;
pub mod writers;

use std::{sync::Arc, time::Instant};

use crate::{
    config::Config,
    fetcher::{Content, FetchError, FetchRequest, Fetcher, RequestError},
    metrics,
};

/// Shared state of the content routes
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Fetcher,
    pub request: Arc<FetchRequest>,
}

impl AppState {
    pub fn new(config: Arc<Config>, fetcher: Fetcher) -> Result<Self, RequestError> {
        let request = Arc::new(config.fetch_request()?);
        Ok(Self {
            config,
            fetcher,
            request,
        })
    }

    /// Fetch the configured target and record the outcome
    pub async fn fetch_content(&self) -> Result<Content, FetchError> {
        let start = Instant::now();
        let result = self.fetcher.fetch(&self.request).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(content) => {
                metrics::record_success(self.request.mime_type(), content.body.len(), elapsed)
            }
            Err(e) => metrics::record_failure(self.request.mime_type(), e, elapsed),
        }

        result
    }
}
