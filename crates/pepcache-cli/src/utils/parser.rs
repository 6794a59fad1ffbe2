use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Line {line}: expected 'peptide<TAB>notation' or 'PEPTIDE:p.NOTATION', found '{content}'."
    )]
    InvalidVariantLine { line: usize, content: String },

    #[error("Line {line}: component '{component}' cannot be empty.")]
    EmptyComponent { line: usize, component: &'static str },
}

/// One row of a variants table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLine {
    pub peptide: String,
    pub notation: String,
}

/// Parses one line of a variants table. Blank lines and `#` comments yield
/// `Ok(None)`. `line` is 1-based and only used in error messages.
pub fn parse_variant_line(line: usize, content: &str) -> Result<Option<VariantLine>, ParseError> {
    let trimmed = content.trim_end_matches(['\n', '\r']);
    if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
        return Ok(None);
    }

    let columns: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
    let (peptide, notation) = match columns.as_slice() {
        [peptide, notation] => (*peptide, *notation),
        [single] => single
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidVariantLine {
                line,
                content: trimmed.to_string(),
            })?,
        _ => {
            return Err(ParseError::InvalidVariantLine {
                line,
                content: trimmed.to_string(),
            });
        }
    };

    if peptide.is_empty() {
        return Err(ParseError::EmptyComponent {
            line,
            component: "peptide",
        });
    }
    if notation.is_empty() {
        return Err(ParseError::EmptyComponent {
            line,
            component: "notation",
        });
    }

    Ok(Some(VariantLine {
        peptide: peptide.to_string(),
        notation: notation.to_string(),
    }))
}
