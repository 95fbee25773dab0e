//! netcomply client
//!
//! Reaches the compliance rules API over HTTP.

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::HttpRuleGateway;
