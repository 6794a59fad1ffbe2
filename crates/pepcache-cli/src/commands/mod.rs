pub mod annotate;
pub mod batch;
pub mod normalize;
pub mod queue;
pub mod status;

use crate::error::{CliError, Result};
use pepcache::core::io::fasta;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Reads a protein FASTA file into an id-to-sequence map. A repeated id keeps
/// its first record.
pub(crate) fn load_sequences(path: &Path) -> Result<HashMap<String, String>> {
    info!("Loading sequences from {:?}", path);
    let file = File::open(path)?;
    let records =
        fasta::read_records(BufReader::new(file)).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

    let mut sequences = HashMap::with_capacity(records.len());
    for record in records {
        if sequences.contains_key(&record.id) {
            warn!(id = %record.id, "Duplicate FASTA record ignored.");
            continue;
        }
        sequences.insert(record.id, record.sequence);
    }
    Ok(sequences)
}
