//! Time-series utilities: observation normalization and frequency negotiation.

pub mod frequency;
pub mod normalize;
pub mod util;
