use crate::core::models::ids::VariantNotation;
use csv::{ByteRecord, ReaderBuilder, Trim};
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::hash_map;
use std::io::Read;
use thiserror::Error;
use tracing::{debug, warn};

const COLUMN_COUNT: usize = 2;

/// One row of a peptide's `.out` table: `<variant_notation>\t<score>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScoreRecord {
    pub notation: String,
    pub score: String,
}

/// Why a score-table row was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedRow {
    #[error("expected {COLUMN_COUNT} tab-separated columns, found {found}")]
    WrongColumnCount { found: usize },
    #[error("column {column} is empty")]
    EmptyField { column: usize },
    #[error("row could not be decoded: {0}")]
    Undecodable(String),
}

impl ScoreRecord {
    pub fn from_fields(record: &ByteRecord) -> Result<Self, MalformedRow> {
        if record.len() != COLUMN_COUNT {
            return Err(MalformedRow::WrongColumnCount {
                found: record.len(),
            });
        }
        let row: ScoreRecord = record
            .deserialize(None)
            .map_err(|e| MalformedRow::Undecodable(e.to_string()))?;
        if row.notation.is_empty() {
            return Err(MalformedRow::EmptyField { column: 1 });
        }
        if row.score.is_empty() {
            return Err(MalformedRow::EmptyField { column: 2 });
        }
        Ok(row)
    }
}

/// Scores known for one peptide, keyed by variant notation.
///
/// When a notation appears more than once in the table, the last row wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreMap {
    scores: HashMap<VariantNotation, String>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a row and returns the score it replaced, if any.
    pub fn insert(&mut self, record: ScoreRecord) -> Option<String> {
        self.scores.insert(
            VariantNotation::from_persisted(&record.notation),
            record.score,
        )
    }

    pub fn get(&self, notation: &VariantNotation) -> Option<&str> {
        self.scores.get(notation).map(String::as_str)
    }

    pub fn contains(&self, notation: &VariantNotation) -> bool {
        self.scores.contains_key(notation)
    }

    pub fn notations(&self) -> impl Iterator<Item = &VariantNotation> {
        self.scores.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, VariantNotation, String> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Parses a tab-separated score table. Comment lines (`#`) and blank lines are
/// ignored; rows that fail [`ScoreRecord::from_fields`] are logged and skipped.
pub fn parse_scores(reader: impl Read) -> Result<ScoreMap, csv::Error> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut scores = ScoreMap::new();
    for result in csv_reader.byte_records() {
        let record = result?;
        match ScoreRecord::from_fields(&record) {
            Ok(row) => {
                let notation = row.notation.clone();
                if let Some(previous) = scores.insert(row) {
                    debug!(%notation, %previous, "Duplicate score row; keeping the later one.");
                }
            }
            Err(reason) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                warn!(line, %reason, "Skipping malformed score-table row.");
            }
        }
    }
    Ok(scores)
}
