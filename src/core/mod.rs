//! Core components of the `szep-balance` crate.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`SzepClient`] and its builder.
//! - The error types ([`SzepError`], [`ScrapeError`], [`FetchError`]).
//! - Shared data models like [`BalanceSnapshot`] and [`Credentials`].
//! - The retry policy shared by both pipeline stages.

/// The main client (`SzepClient`), builder, retry policy and default endpoints.
pub mod client;
/// Error types for each pipeline stage and the crate as a whole.
pub mod error;
/// Shared data models used across the pipeline.
pub mod models;
/// Service traits that let the poller run against replaceable stages.
pub mod services;

// convenient re-exports so most code can just `use crate::core::SzepClient`
pub use client::{Backoff, RetryConfig, SzepClient, SzepClientBuilder};
pub use error::{FetchError, ScrapeError, SzepError};
pub use models::{AccountIdentity, BALANCE_UNIT, BalanceKind, BalanceSnapshot, Credentials, Reading};
pub use services::{BalanceService, BalanceTransport, CredentialService};
