//! # Core Module
//!
//! Stateless building blocks of the peptide cache: identifiers, notation
//! normalization and the on-disk file formats.
//!
//! ## Architecture
//!
//! - **Identifiers** ([`models`]) - `PeptideKey` and `VariantNotation` newtypes with validation
//! - **Normalization** ([`notation`]) - Three-letter to one-letter rewriting of protein changes
//! - **File Formats** ([`io`]) - FASTA records, score tables and variant lists
//!
//! Nothing in this module touches locks or knows about the cache directory layout;
//! that is the job of [`crate::engine`].

pub mod io;
pub mod models;
pub mod notation;
