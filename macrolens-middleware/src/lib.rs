//! macrolens-middleware
//!
//! Caching building blocks for the macrolens engine: an in-process LRU
//! [`MemoryStore`] and the [`CacheCoordinator`] implementing the
//! cache-first, live-overwrite, stale-on-failure resolution policy.
#![warn(missing_docs)]

mod fallback;
mod memory;

pub use fallback::CacheCoordinator;
pub use memory::MemoryStore;
