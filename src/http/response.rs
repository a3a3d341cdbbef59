//! HTTP response building module
//!
//! Builders for the two responses the endpoint can produce.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Response, StatusCode};
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build 200 response with a JSON body terminated by a newline
pub fn build_json_response<T: Serialize>(value: &T) -> Response<Full<Bytes>> {
    let mut body = match serde_json::to_vec(value) {
        Ok(body) => body,
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            return build_error_response(&e.to_string());
        }
    };
    body.push(b'\n');

    or_error_response(
        Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(Full::new(Bytes::from(body))),
    )
}

/// A success response that failed to build becomes a 500, never an empty 200
fn or_error_response(
    built: Result<Response<Full<Bytes>>, hyper::http::Error>,
) -> Response<Full<Bytes>> {
    built.unwrap_or_else(|e| {
        log_build_error("200", &e);
        build_error_response(&format!("Failed to build response: {e}"))
    })
}

/// Build 500 response carrying the raw error message as plain text
pub fn build_error_response(message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .body(Full::new(Bytes::from(message.to_string())))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            let mut response = Response::new(Full::new(Bytes::from(message.to_string())));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
