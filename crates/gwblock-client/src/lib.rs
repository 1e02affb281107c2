//! HTTP client for the Zero Trust Gateway API.
//!
//! This crate provides the [`GatewayClient`]: a rate-limited, infinitely
//! retried, backoff-jittered HTTP client with structured error
//! classification. It knows nothing about domain semantics; the
//! reconciliation engine drives it.

pub mod api;
mod client;
mod config;

pub use client::{CancelHandle, GatewayClient, GatewayClientBuilder};
pub use config::RetryPolicy;
pub use gwblock_core::{GatewayError, Result};
