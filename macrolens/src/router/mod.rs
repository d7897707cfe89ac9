pub mod curve;
pub mod overview;
pub mod related;
pub mod search;
pub mod series;
