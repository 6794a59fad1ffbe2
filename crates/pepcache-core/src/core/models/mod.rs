//! # Core Models Module
//!
//! Strongly typed identifiers shared by every layer of the cache.
//!
//! ## Key Components
//!
//! - [`ids`] - `PeptideKey` (a sanitized directory name) and `VariantNotation`
//!   (a canonical amino-acid change), plus the `KeyError` raised when either
//!   cannot be constructed.

pub mod ids;
