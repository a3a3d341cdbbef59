//! Request handler module
//!
//! Bridges inbound requests to the line sampler.

pub mod sample;

// Re-export main entry point
pub use sample::handle_request;
