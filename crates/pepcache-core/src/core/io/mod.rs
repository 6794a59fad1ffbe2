//! Provides readers and writers for the files kept in a peptide cache entry.
//!
//! Every format here is line oriented and plain text so that the external batch
//! scorer can consume and produce it without linking against this crate. These
//! functions know nothing about locking; callers in [`crate::engine`] decide when
//! a read or write is safe.

pub mod fasta;
pub mod score_table;
pub mod variant_list;
