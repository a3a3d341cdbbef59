//! HTTP protocol layer module
//!
//! Response construction, decoupled from sampling.

pub mod response;

pub use response::{build_error_response, build_json_response};
