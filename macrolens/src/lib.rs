//! Macrolens orchestrates economic time-series requests across multiple
//! data providers.
//!
//! Overview
//! - Resolves legacy series identifiers to canonical successors, with
//!   fallback chains for renames and hard refusal of catalog-removed series.
//! - Negotiates observation frequency against what a series natively offers;
//!   a provider-side rejection of the frequency parameter triggers exactly
//!   one retry at native cadence.
//! - Normalizes raw provider rows into clean batches with derived analytics
//!   (moving averages, period and year-over-year changes, volatility).
//! - Coordinates a pluggable cache: fresh entries short-circuit, live
//!   successes write through, and transient failures can serve the last
//!   good copy depending on the configured policy.
//! - Snapshots and compares sovereign yield curves across providers.
//!
//! Providers implement the `macrolens_core` connector contracts and are
//! registered in priority order:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use macrolens::{Macrolens, SeriesRequest};
//!
//! let fred = Arc::new(FredConnector::builder().api_key_from_env().build());
//! let ecb = Arc::new(EcbConnector::new_default());
//!
//! let engine = Macrolens::builder()
//!     .with_connector(fred)
//!     .with_connector(ecb)
//!     .build()?;
//!
//! let cpi = engine.series(&SeriesRequest::new("CPI")).await?;
//! let spread = engine.compare_curves("macrolens-fred", "macrolens-ecb").await?;
//! ```
#![warn(missing_docs)]

mod core;
mod resolver;
mod router;

pub use crate::core::{Macrolens, MacrolensBuilder};
pub use crate::resolver::resolve;

pub use macrolens_core::{FrequencyDecision, SubstitutionReason, negotiate, normalize};
pub use macrolens_types::*;
