// Application state module
// Read-only state shared by every connection

use super::types::Config;
use crate::sampler::{CorpusSource, FetchError, FetchOptions, HttpFetcher, LineSampler};

/// Application state
pub struct AppState {
    pub config: Config,
    pub sampler: LineSampler<HttpFetcher>,
}

impl AppState {
    /// Build the corpus sampler and its HTTP client from configuration
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(FetchOptions::from(&config.corpus))?;
        let sampler = LineSampler::new(CorpusSource::new(config.corpus.url.clone()), fetcher);

        Ok(Self {
            config: config.clone(),
            sampler,
        })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
