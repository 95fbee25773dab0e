//! netcomply core
//!
//! Core types and error handling shared across the netcomply crates.
//!
//! This crate provides:
//! - Rule, check and payload types matching the rules API wire shape
//! - Vendor tags and severities
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, GatewayError, Result, UnknownVendorTag, ValidationError};
pub use types::{
    Check, Comparison, Rule, RuleId, RulePayload, Severity, VendorTag, DEFAULT_ERROR_MESSAGE,
    DEFAULT_SUCCESS_MESSAGE,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, GatewayError, Result, ValidationError};
    pub use crate::types::{Check, Rule, RuleId, RulePayload, Severity, VendorTag};
}
