//! Upbit REST SDK for Rust.
//!
//! A typed client for the Upbit exchange REST API: authenticated account
//! endpoints and public quotation endpoints, all returning the same
//! [`ResultEnvelope`].
//!
//! # What This SDK Provides
//!
//! - Typed REST API access: [`UpbitApi`]
//! - Per-request HS256 token signing with query binding: [`auth::sign`]
//! - A uniform envelope classifying transport failures, exchange errors and
//!   empty 200 responses: [`ResultEnvelope`], [`UpbitError`]
//! - Pure-data endpoint descriptors: [`catalog`], [`EndpointDescriptor`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use upbit_sdk::{CandleQuery, Credentials, UpbitApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), upbit_sdk::UpbitError> {
//!     let api = UpbitApi::new()?.with_credentials(Credentials::from_env()?);
//!
//!     let accounts = api.accounts().await.into_result()?;
//!     for account in &accounts {
//!         println!("{}: {}", account.currency, account.balance);
//!     }
//!
//!     let candles = api
//!         .candles_minutes(5, &CandleQuery::new("KRW-BTC").count(10))
//!         .await;
//!     match candles.error() {
//!         None => println!("{} candles", candles.response().map_or(0, |c| c.len())),
//!         Some(e) => println!("status={:?} error={e}", candles.status_code()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Envelopes
//!
//! Endpoint calls never return `Err` directly. Each returns a
//! [`ResultEnvelope`] whose `error` is set exactly when `response` is absent:
//!
//! - [`UpbitError::Transport`]: no HTTP response; `status_code()` is `None`
//! - [`UpbitError::Exchange`]: non-200 status, rendered as `"<name> (<message>)"`
//! - [`UpbitError::EmptyResult`]: status 200 with an empty list
//! - [`UpbitError::InvalidParameter`] / [`UpbitError::Precondition`] /
//!   [`UpbitError::Signing`]: rejected before anything was sent
//!
//! Use [`ResultEnvelope::into_result`] to get a plain `Result`.
//!
//! # Logging
//!
//! This crate emits debug-level logs through the [`log`](https://docs.rs/log/) facade.
//! Configure any compatible logger in your binary, then set `RUST_LOG=debug`
//! to inspect request flow. Keys and tokens are never logged.
pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod endpoint;
pub mod errors;
pub mod executor;
pub mod models;

// Re-export primary types for convenience.
pub use api::UpbitApi;
pub use auth::{AuthClaim, AuthToken, Credentials};
pub use catalog::{CandleQuery, MinuteUnit, MAX_CANDLE_COUNT};
pub use config::ApiConfig;
pub use decoder::{Cardinality, ResultEnvelope};
pub use endpoint::{EndpointDescriptor, Method, QueryParams};
pub use errors::UpbitError;
pub use executor::{RawOutcome, RequestExecutor};
pub use models::*;
