//! Nullable infrastructure for deterministic testing.
//!
//! The tip-set cache reaches the chain only through
//! [`ChainProvider`](tipcache_provider::ChainProvider). This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be inspected and controlled programmatically
//! - Never touch the network
//!
//! Usage: swap a real provider for one of these in tests and tools.

pub mod chain;
pub mod provider;

pub use chain::ChainBuilder;
pub use provider::{FailingProvider, MemoryProvider, NullProvider};
