//! # Engine Module
//!
//! The stateful, filesystem-facing half of the cache. Everything that reads or
//! writes the shared cache tree lives here.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Cache root and job-queue locations, with startup validation
//! - **Locking** ([`lock`]) - Blocking advisory locks scoped to a single closure
//! - **Storage** ([`store`]) - Per-peptide directory layout and the write-once sequence file
//! - **Merging** ([`merger`]) - Lock-guarded union of variant sets
//! - **Queueing** ([`queue`]) - Lock-guarded, deduplicated job queue appends
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for batch runs
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! ## Concurrency Model
//!
//! Callers are expected to be independent OS processes (or threads) sharing
//! nothing but the cache directory. Each operation opens its own file handle,
//! takes at most one lock, and releases it before returning, so locks are
//! never nested.

pub mod config;
pub mod error;
pub mod lock;
pub mod merger;
pub mod progress;
pub mod queue;
pub mod store;
