//! # Workflows Module
//!
//! High-level entry points for annotation workers.
//!
//! ## Overview
//!
//! A worker builds one [`annotate::Annotator`] from a validated cache
//! configuration and feeds it requests, one at a time or as a batch. Each
//! request normalizes the protein change, makes sure the peptide's reference
//! sequence is cached, merges the variant into the peptide's variant list and,
//! when something new was recorded, puts the peptide on the job queue for the
//! external scorer.
//!
//! - **Single requests** ([`annotate`]) - The per-variant façade over the engine
//! - **Batches** ([`batch`]) - Parallel annotation with progress reporting and
//!   per-request error isolation

pub mod annotate;
pub mod batch;
