//! Core types and errors for the Gateway blocklist synchronizer.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Types**: Strongly-typed representations of Gateway lists and policies
//! - **Errors**: Error taxonomy with retryability classification via
//!   [`GatewayError::is_retryable`]
//! - **Limits**: The hard capacity constants the reconciler enforces

mod error;
pub mod types;

pub use error::{GatewayError, Result};
pub use types::*;

/// Maximum number of items a single Gateway list can hold
pub const MAX_LIST_SIZE: usize = 1000;

/// Maximum total number of domains across all owned lists.
///
/// Exceeding this aborts the run before any remote mutation.
pub const MAX_TOTAL_DOMAINS: usize = 300_000;
