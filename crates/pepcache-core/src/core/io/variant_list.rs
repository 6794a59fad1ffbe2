use crate::core::models::ids::VariantNotation;
use std::collections::BTreeSet;

pub type VariantSet = BTreeSet<VariantNotation>;

/// Reads a `.var` document: one notation per non-empty line.
///
/// Entries are taken verbatim (trimmed) so that nothing previously committed
/// is dropped, even if it was written by another tool.
pub fn parse(content: &str) -> VariantSet {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(VariantNotation::from_persisted)
        .collect()
}

/// Renders a variant set sorted, one entry per newline-terminated line.
pub fn render(variants: &VariantSet) -> String {
    let mut out = String::with_capacity(variants.iter().map(|v| v.as_str().len() + 1).sum());
    for variant in variants {
        out.push_str(variant.as_str());
        out.push('\n');
    }
    out
}
