// File: src/error.rs
// Purpose: Error type for route registration and configuration

use thiserror::Error;

/// Errors surfaced while configuring a router
///
/// Dispatch itself never fails: unmatched paths and handler error statuses
/// are routed through the [`ErrorTable`](crate::ErrorTable) instead.
#[derive(Debug, Error)]
pub enum RouterError {
    /// An inline `{name:pattern}` segment did not compile
    #[error("invalid pattern in segment `{segment}` of route `{template}`: {source}")]
    InvalidPattern {
        template: String,
        segment: String,
        #[source]
        source: regex::Error,
    },

    /// The router configuration could not be read or parsed
    #[error("invalid router configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RouterError>;
