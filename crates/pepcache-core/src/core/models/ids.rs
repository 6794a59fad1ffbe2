use std::fmt;
use thiserror::Error;

const PATH_HOSTILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
const ESCAPE_CHAR: char = '%';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
    #[error("Peptide key '{0}' is reserved and cannot be used as a directory name")]
    Reserved(String),
    #[error("Variant notation '{notation}' contains an invalid character {found:?}")]
    InvalidCharacter { notation: String, found: char },
}

/// Identifier of a protein in the cache, usable as a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeptideKey(String);

impl PeptideKey {
    /// Builds a key from a raw accession. Characters that cannot appear in a
    /// directory name, and `%` itself, are percent-encoded byte by byte, so
    /// distinct accessions always map to distinct directories.
    pub fn new(raw: &str) -> Result<Self, KeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(KeyError::Empty {
                kind: "Peptide key",
            });
        }
        if trimmed == "." || trimmed == ".." {
            return Err(KeyError::Reserved(trimmed.to_string()));
        }

        let mut encoded = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            if needs_escape(c) {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    encoded.push_str(&format!("{}{:02X}", ESCAPE_CHAR, byte));
                }
            } else {
                encoded.push(c);
            }
        }
        Ok(Self(encoded))
    }

    pub(crate) fn from_persisted(line: &str) -> Self {
        Self(line.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn needs_escape(c: char) -> bool {
    c == ESCAPE_CHAR || c.is_control() || c.is_whitespace() || PATH_HOSTILE_CHARS.contains(&c)
}

impl fmt::Display for PeptideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PeptideKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical amino-acid change, e.g. `A123T` or `G45del`.
///
/// Ordering is plain byte-wise string ordering, which is the order used when
/// the variant list is written back to disk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariantNotation(String);

impl VariantNotation {
    pub fn new(notation: impl Into<String>) -> Result<Self, KeyError> {
        let notation = notation.into();
        if notation.is_empty() {
            return Err(KeyError::Empty {
                kind: "Variant notation",
            });
        }
        if let Some(found) = notation
            .chars()
            .find(|c| c.is_whitespace() || c.is_control())
        {
            return Err(KeyError::InvalidCharacter { notation, found });
        }
        Ok(Self(notation))
    }

    // Cache files are authoritative; entries read back are never rejected.
    pub(crate) fn from_persisted(line: &str) -> Self {
        Self(line.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariantNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VariantNotation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for VariantNotation {
    type Error = KeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peptide_key_keeps_plain_accessions_untouched() {
        let key = PeptideKey::new("ENSP00000269305.4").unwrap();
        assert_eq!(key.as_str(), "ENSP00000269305.4");
    }

    #[test]
    fn peptide_key_trims_surrounding_whitespace() {
        let key = PeptideKey::new("  NP_000537.3\n").unwrap();
        assert_eq!(key.as_str(), "NP_000537.3");
    }

    #[test]
    fn peptide_key_escapes_path_separators_and_control_characters() {
        let key = PeptideKey::new("sp/P04637\\TP53:a b\tc").unwrap();
        assert_eq!(key.as_str(), "sp%2FP04637%5CTP53%3Aa%20b%09c");
    }

    #[test]
    fn peptide_key_encoding_keeps_distinct_accessions_apart() {
        let raws = ["a/b", "a_b", "a:b", "a%2Fb", "a%b", "a\u{3000}b"];
        let keys: Vec<PeptideKey> = raws.iter().map(|r| PeptideKey::new(r).unwrap()).collect();
        for (i, left) in keys.iter().enumerate() {
            for right in &keys[i + 1..] {
                assert_ne!(left, right);
            }
        }
        assert_eq!(keys[3].as_str(), "a%252Fb");
        assert_eq!(keys[5].as_str(), "a%E3%80%80b");
    }

    #[test]
    fn peptide_key_rejects_empty_and_reserved_names() {
        assert_eq!(
            PeptideKey::new("   "),
            Err(KeyError::Empty {
                kind: "Peptide key"
            })
        );
        assert_eq!(
            PeptideKey::new(".."),
            Err(KeyError::Reserved("..".to_string()))
        );
        assert_eq!(PeptideKey::new("."), Err(KeyError::Reserved(".".to_string())));
    }

    #[test]
    fn variant_notation_rejects_whitespace() {
        let err = VariantNotation::new("A5V\tB").unwrap_err();
        assert_eq!(
            err,
            KeyError::InvalidCharacter {
                notation: "A5V\tB".to_string(),
                found: '\t'
            }
        );
        assert!(VariantNotation::new("").is_err());
    }

    #[test]
    fn variant_notations_sort_bytewise() {
        let mut notations: Vec<VariantNotation> = ["G9del", "A5V", "A10T"]
            .into_iter()
            .map(|s| VariantNotation::new(s).unwrap())
            .collect();
        notations.sort();
        let sorted: Vec<&str> = notations.iter().map(VariantNotation::as_str).collect();
        assert_eq!(sorted, vec!["A10T", "A5V", "G9del"]);
    }
}
