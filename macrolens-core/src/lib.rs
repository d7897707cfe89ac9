//! macrolens-core
//!
//! Core traits and utilities shared across the macrolens ecosystem.
//!
//! - `connector`: the `MacrolensConnector` trait and capability provider traits.
//! - `cache`: the string-keyed `CacheStore` contract and the self-describing
//!   cache envelope.
//! - `timeseries`: observation normalization and frequency negotiation.
//! - `curve`: yield-curve comparison math.
//!
//! Async runtime (Tokio)
//! ---------------------
//! All provider traits are async and the orchestration layer bounds calls
//! with `tokio::time::timeout`, so connectors are expected to run under a
//! Tokio 1.x runtime.
#![warn(missing_docs)]

/// The string-keyed cache contract and the freshness envelope.
pub mod cache;
/// Connector capability traits and the primary `MacrolensConnector` interface.
pub mod connector;
/// Yield-curve comparison math.
pub mod curve;
/// Time-series utilities for normalization and frequency negotiation.
pub mod timeseries;

pub use cache::{CacheEnvelope, CacheStore};
pub use connector::MacrolensConnector;
pub use curve::{REFERENCE_TENORS, compare, steepness};
pub use timeseries::frequency::{FrequencyDecision, SubstitutionReason, negotiate};
pub use timeseries::normalize::normalize;

pub use macrolens_types::*;
