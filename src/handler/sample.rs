//! Sampling endpoint
//!
//! Every request, whatever its method or path, gets one random corpus line.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::sampler::{CorpusFetcher, LineSampler};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut rng = StdRng::from_entropy();
    let response = respond_with_sample(&state.sampler, &mut rng).await;

    if state.access_log_enabled() {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run one sample and map the outcome onto the wire contract
pub async fn respond_with_sample<F: CorpusFetcher>(
    sampler: &LineSampler<F>,
    rng: &mut StdRng,
) -> Response<Full<Bytes>> {
    match sampler.sample(rng).await {
        Ok(envelope) => http::build_json_response(&envelope),
        Err(e) => {
            logger::log_fetch_failure(sampler.source().url(), &e);
            http::build_error_response(&e.to_string())
        }
    }
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(hyper::body::Body::size_hint(response.body()).lower())
        .unwrap_or(usize::MAX);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}
