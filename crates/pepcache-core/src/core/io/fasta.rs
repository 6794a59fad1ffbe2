use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub description: Option<String>,
    pub sequence: String,
}

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Sequence data on line {line} appears before any '>' header")]
    SequenceBeforeHeader { line: usize },
    #[error("Header on line {line} has no identifier")]
    EmptyHeader { line: usize },
}

/// Writes a single unwrapped FASTA record.
pub fn write_record(writer: &mut impl Write, header: &str, sequence: &str) -> io::Result<()> {
    writeln!(writer, ">{}", header)?;
    writeln!(writer, "{}", sequence)
}

/// Reads every record of a (possibly line-wrapped) protein FASTA stream.
pub fn read_records(reader: impl BufRead) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records = Vec::new();
    let mut current: Option<FastaRecord> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(done) = current.take() {
                records.push(done);
            }
            let mut parts = header.trim().splitn(2, char::is_whitespace);
            let id = parts.next().unwrap_or("");
            if id.is_empty() {
                return Err(FastaError::EmptyHeader { line: line_num });
            }
            current = Some(FastaRecord {
                id: id.to_string(),
                description: parts
                    .next()
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string),
                sequence: String::new(),
            });
        } else {
            let record = current
                .as_mut()
                .ok_or(FastaError::SequenceBeforeHeader { line: line_num })?;
            record
                .sequence
                .extend(line.chars().filter(|c| !c.is_whitespace()));
        }
    }

    if let Some(done) = current {
        records.push(done);
    }
    Ok(records)
}
