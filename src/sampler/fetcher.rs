//! Corpus retrieval
//!
//! `CorpusFetcher` is the seam between sampling and the network. The production
//! implementation is `HttpFetcher`, a thin wrapper over a pooled reqwest client.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;

use super::error::FetchError;
use super::CorpusSource;
use crate::config::CorpusConfig;

/// Retrieves the full text of a corpus
pub trait CorpusFetcher {
    fn fetch(
        &self,
        source: &CorpusSource,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Options applied to every outbound corpus request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Option<Duration>,
    pub max_body_size: Option<u64>,
    pub require_success_status: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            max_body_size: None,
            require_success_status: true,
        }
    }
}

impl From<&CorpusConfig> for FetchOptions {
    fn from(config: &CorpusConfig) -> Self {
        Self {
            timeout: config.timeout_secs.map(Duration::from_secs),
            max_body_size: config.max_body_size,
            require_success_status: config.require_success_status,
        }
    }
}

/// HTTP(S) corpus fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    options: FetchOptions,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            options,
        })
    }
}

impl CorpusFetcher for HttpFetcher {
    async fn fetch(&self, source: &CorpusSource) -> Result<String, FetchError> {
        let mut response = self.client.get(source.url()).send().await?;

        let status = response.status();
        if self.options.require_success_status && !status.is_success() {
            return Err(FetchError::Status {
                url: source.url().to_string(),
                status: status.as_u16(),
            });
        }

        // Reject early when the server announces an oversized body
        if let (Some(limit), Some(length)) = (self.options.max_body_size, response.content_length())
        {
            if length > limit {
                return Err(FetchError::BodyTooLarge { limit });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if let Some(limit) = self.options.max_body_size {
                if body.len() as u64 > limit {
                    return Err(FetchError::BodyTooLarge { limit });
                }
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::server::conn::http1;
    use hyper::service::service_fn;
    use hyper::Response;
    use hyper_util::rt::TokioIo;
    use std::convert::Infallible;
    use tokio::net::TcpListener;

    /// Serve a fixed status and body on an ephemeral port, returning its URL
    async fn spawn_corpus_server(status: u16, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let service = service_fn(move |_req| async move {
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .body(Full::new(Bytes::from_static(body.as_bytes())))
                                .unwrap(),
                        )
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        format!("http://{addr}/common.txt")
    }

    async fn refused_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/common.txt")
    }

    #[tokio::test]
    async fn test_fetch_returns_full_body() {
        let url = spawn_corpus_server(200, "first\nsecond\n").await;
        let fetcher = HttpFetcher::new(FetchOptions::default()).unwrap();

        let body = fetcher.fetch(&CorpusSource::new(url)).await.unwrap();
        assert_eq!(body, "first\nsecond\n");
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status_by_default() {
        let url = spawn_corpus_server(404, "not found").await;
        let fetcher = HttpFetcher::new(FetchOptions::default()).unwrap();

        let err = fetcher.fetch(&CorpusSource::new(url)).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_permissive_status_keeps_body() {
        let url = spawn_corpus_server(404, "404: Not Found").await;
        let fetcher = HttpFetcher::new(FetchOptions {
            require_success_status: false,
            ..FetchOptions::default()
        })
        .unwrap();

        let body = fetcher.fetch(&CorpusSource::new(url)).await.unwrap();
        assert_eq!(body, "404: Not Found");
    }

    #[tokio::test]
    async fn test_fetch_enforces_body_limit() {
        let url = spawn_corpus_server(200, "0123456789").await;
        let fetcher = HttpFetcher::new(FetchOptions {
            max_body_size: Some(4),
            ..FetchOptions::default()
        })
        .unwrap();

        let err = fetcher.fetch(&CorpusSource::new(url)).await.unwrap_err();
        assert!(matches!(err, FetchError::BodyTooLarge { limit: 4 }));
    }

    #[tokio::test]
    async fn test_fetch_body_at_limit_is_accepted() {
        let url = spawn_corpus_server(200, "abcd").await;
        let fetcher = HttpFetcher::new(FetchOptions {
            max_body_size: Some(4),
            ..FetchOptions::default()
        })
        .unwrap();

        assert_eq!(fetcher.fetch(&CorpusSource::new(url)).await.unwrap(), "abcd");
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport_error() {
        let url = refused_url().await;
        let fetcher = HttpFetcher::new(FetchOptions::default()).unwrap();

        let err = fetcher.fetch(&CorpusSource::new(url)).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert!(err.to_string().contains("refused"), "got: {err}");
    }

    #[test]
    fn test_options_from_config() {
        let config = CorpusConfig {
            url: "http://example.invalid/corpus.txt".to_string(),
            timeout_secs: Some(5),
            max_body_size: None,
            require_success_status: false,
        };
        let options = FetchOptions::from(&config);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert_eq!(options.max_body_size, None);
        assert!(!options.require_success_status);
    }
}
