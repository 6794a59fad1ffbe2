//! # pepcache Core Library
//!
//! A filesystem-coordinated cache that lets many independent annotation workers
//! share expensive per-peptide scoring work without a central server.
//!
//! Workers record which variants each peptide needs scored and push the peptide
//! onto a deduplicated job queue; an external batch scorer consumes that queue
//! and writes score tables back into the cache. All coordination goes through
//! advisory file locks on a shared cache directory.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless identifiers (`PeptideKey`, `VariantNotation`),
//!   notation normalization and the plain-text file formats of a cache entry.
//!
//! - **[`engine`]: The Coordination Layer.** Advisory locking, the cache directory
//!   store, the lock-guarded variant merger and job queue, configuration and errors.
//!
//! - **[`workflows`]: The Public API.** The `Annotator` façade that turns one variant
//!   request into store, merge and queue operations, and a parallel batch runner.

pub mod core;
pub mod engine;
pub mod workflows;
