//! Bounded in-memory cache of recent tip-sets, indexed by height.
//!
//! Consumers following the head of a chain mostly ask about very recent
//! heights. The cache keeps a fixed window of them in a ring buffer, tracks
//! the best tip-set, follows reorgs through [`TipSetCache::revert`], and only
//! reaches the [`ChainProvider`](tipcache_provider::ChainProvider) for
//! heights outside the window.
//!
//! - **Window**: ring storage mapping heights to slots; null rounds are
//!   empty slots and consume capacity.
//! - **Linkage**: a tip-set is appended only on top of its parent.
//! - **Fallback**: the routing rules for reads the window cannot answer.

pub mod cache;
pub mod config;
pub mod error;
mod fallback;
pub mod linkage;
pub mod shared;
pub mod stats;
mod window;

pub use cache::TipSetCache;
pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::CacheError;
pub use linkage::validate_linkage;
pub use shared::SharedTipSetCache;
pub use stats::CacheStats;
