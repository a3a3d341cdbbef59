//! Fetch error type
//!
//! Every failure between "send the GET" and "have the body as text" ends up here.
//! The request handler collapses all variants into a 500 carrying the display text.

use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, DNS, TLS, timeout or body-read failure.
    /// `message` holds the whole cause chain, e.g. "...: Connection refused".
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Remote answered with a non-2xx status while strict status checking is on
    #[error("corpus request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Body grew past `corpus.max_body_size`
    #[error("corpus body exceeds the configured limit of {limit} bytes")]
    BodyTooLarge { limit: u64 },
}

impl From<reqwest::Error> for FetchError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport {
            message: error_chain(&source),
            source,
        }
    }
}

/// Join an error and its `source()` chain with ": "
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        // Some layers repeat their inner error verbatim
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "tcp connect error",
                Some(Box::new(Layer("Connection refused (os error 111)", None))),
            ))),
        );
        assert_eq!(
            error_chain(&err),
            "error sending request: tcp connect error: Connection refused (os error 111)"
        );
    }

    #[test]
    fn test_error_chain_skips_repeated_text() {
        let err = Layer("timed out", Some(Box::new(Layer("timed out", None))));
        assert_eq!(error_chain(&err), "timed out");
    }
}
