//! Error types for the zone routing engine
//!
//! Routing failures are reported through the same channel the host stack uses
//! for any routing protocol: an `Err` from output routing, or the error
//! callback on input routing. Delegate errors pass through untouched.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use thiserror::Error;

// ============================================================================
// ROUTING
// ============================================================================

/// Errors surfaced by output/input routing and by on-demand request origination
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingError {
    #[error("No route to host {0}")]
    NoRouteToHost(Ipv4Addr),

    #[error("Network context not attached")]
    NotConfigured,

    #[error("Node has no primary address to originate from")]
    NoPrimaryAddress,

    /// Opaque failure reported by a sub-protocol
    #[error("{protocol} failed: {reason}")]
    Delegate {
        protocol: String,
        reason: String,
    },
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Errors raised while validating or applying configuration
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid value for attribute {name}: {value}")]
    InvalidAttributeValue { name: String, value: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

// ============================================================================
// WIRE
// ============================================================================

/// Errors decoding control headers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("Header truncated: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Unexpected message type {0}")]
    UnexpectedType(u8),
}
