//! Line sampler module
//!
//! Fetches a newline-delimited corpus and picks one line uniformly at random:
//! - `split_lines` / `pick_line` / `select` are the pure selection steps
//! - `fetcher` owns the network side
//! - `LineSampler` ties a fixed `CorpusSource` to a fetcher

mod error;
pub mod fetcher;

pub use error::FetchError;
pub use fetcher::{CorpusFetcher, FetchOptions, HttpFetcher};

use rand::Rng;
use serde::Serialize;

/// Corpus served when `corpus.url` is not configured
pub const DEFAULT_CORPUS_URL: &str =
    "https://raw.githubusercontent.com/TennyZhuang/Chi-Corpus/master/common.txt";

/// Immutable reference to the remote corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusSource {
    url: String,
}

impl CorpusSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for CorpusSource {
    fn default() -> Self {
        Self::new(DEFAULT_CORPUS_URL)
    }
}

/// JSON body returned on success: `{"content": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEnvelope {
    pub content: String,
}

/// Split on `\n`, keeping empty segments (a trailing newline yields a final `""`)
pub fn split_lines(body: &str) -> Vec<&str> {
    body.split('\n').collect()
}

/// Pick one line uniformly. `lines` is never empty when it comes from `split_lines`.
pub fn pick_line<'a, R: Rng + ?Sized>(lines: &[&'a str], rng: &mut R) -> &'a str {
    if lines.is_empty() {
        return "";
    }
    lines[rng.gen_range(0..lines.len())]
}

/// Split `body` and wrap a random line in an envelope
pub fn select<R: Rng + ?Sized>(body: &str, rng: &mut R) -> ResponseEnvelope {
    let lines = split_lines(body);
    ResponseEnvelope {
        content: pick_line(&lines, rng).to_string(),
    }
}

/// Fetch-split-pick over a fixed corpus
#[derive(Debug, Clone)]
pub struct LineSampler<F> {
    source: CorpusSource,
    fetcher: F,
}

impl<F: CorpusFetcher> LineSampler<F> {
    pub const fn new(source: CorpusSource, fetcher: F) -> Self {
        Self { source, fetcher }
    }

    pub const fn source(&self) -> &CorpusSource {
        &self.source
    }

    /// One fetch per call, no caching and no retries.
    ///
    /// The random source is injected so callers decide how it is seeded.
    pub async fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<ResponseEnvelope, FetchError> {
        let body = self.fetcher.fetch(&self.source).await?;
        Ok(select(&body, rng))
    }
}
