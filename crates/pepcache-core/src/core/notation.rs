use phf::{Map, phf_map};

/// Three-letter to one-letter amino acid codes, including the ambiguity
/// codes and the termination marker.
pub static THREE_TO_ONE: Map<&'static str, &'static str> = phf_map! {
    "Ala" => "A", "Arg" => "R", "Asn" => "N", "Asp" => "D", "Cys" => "C",
    "Gln" => "Q", "Glu" => "E", "Gly" => "G", "His" => "H", "Ile" => "I",
    "Leu" => "L", "Lys" => "K", "Met" => "M", "Phe" => "F", "Pro" => "P",
    "Ser" => "S", "Thr" => "T", "Trp" => "W", "Tyr" => "Y", "Val" => "V",
    "Sec" => "U", "Pyl" => "O", "Asx" => "B", "Glx" => "Z", "Xaa" => "X",
    "Ter" => "*",
};

const CODE_LEN: usize = 3;
const HGVS_PROTEIN_PREFIX: &str = "p.";
const SYNONYMOUS_MARKER: char = '=';
const STOP_MARKER: char = '*';
const DELETION_SUFFIX: &str = "del";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedChange {
    pub notation: String,
    pub is_synonymous: bool,
}

/// Normalizes a protein change with the built-in [`THREE_TO_ONE`] table.
pub fn normalize(raw: &str) -> NormalizedChange {
    normalize_with(raw, &THREE_TO_ONE)
}

/// Normalizes a protein change into the one-letter form used as a cache key.
///
/// A trailing stop (`*`) becomes `del` unless the substituted notation still
/// holds lowercase letters (frameshifts, `delins`, ...), which are left
/// untouched. Notations carrying `=` are flagged as synonymous; callers are
/// expected to answer those without touching the cache.
pub fn normalize_with(raw: &str, codes: &Map<&'static str, &'static str>) -> NormalizedChange {
    let body = strip_decorations(raw.trim());
    let mut notation = substitute_codes(body, codes);
    let is_synonymous = body.contains(SYNONYMOUS_MARKER);

    if !is_synonymous
        && notation.ends_with(STOP_MARKER)
        && !notation.chars().any(|c| c.is_ascii_lowercase())
    {
        notation.pop();
        notation.push_str(DELETION_SUFFIX);
    }

    NormalizedChange {
        notation,
        is_synonymous,
    }
}

fn strip_decorations(raw: &str) -> &str {
    let body = raw.strip_prefix(HGVS_PROTEIN_PREFIX).unwrap_or(raw);
    body.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(body)
}

fn substitute_codes(body: &str, codes: &Map<&'static str, &'static str>) -> String {
    let mut out = String::with_capacity(body.len());
    let mut pos = 0;
    while pos < body.len() {
        if let Some(one_letter) = body
            .get(pos..pos + CODE_LEN)
            .and_then(|window| codes.get(window))
        {
            out.push_str(one_letter);
            pos += CODE_LEN;
            continue;
        }
        // `pos` always sits on a char boundary here.
        let Some(c) = body[pos..].chars().next() else {
            break;
        };
        out.push(c);
        pos += c.len_utf8();
    }
    out
}
