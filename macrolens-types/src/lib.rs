//! macrolens-types
//!
//! Shared data transfer objects for the macrolens workspace: the unified
//! error taxonomy, series and curve domain types, engine configuration, and
//! the response envelope.
#![warn(missing_docs)]

mod config;
mod curve;
mod error;
mod frequency;
mod report;
mod series;

pub use config::{DegradedPolicy, MacrolensConfig};
pub use curve::{CurveComparison, CurveInterpretation, CurveSnapshot, TenorPoint};
pub use error::MacrolensError;
pub use frequency::Frequency;
pub use report::{
    CacheStatus, OverviewReport, ResponseMeta, SeriesReport, error_envelope, success_envelope,
};
pub use series::{
    Analytics, Availability, MovingAverages, NormalizationStats, Observation, ObservationBatch,
    ObservationsRequest, PercentChanges, RawObservation, RelatedSeries, ResolvedIdentity,
    SeriesMetadata, SeriesRequest, SeriesTag,
};
