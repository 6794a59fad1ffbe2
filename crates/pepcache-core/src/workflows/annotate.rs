use crate::core::io::variant_list::VariantSet;
use crate::core::models::ids::{PeptideKey, VariantNotation};
use crate::core::notation;
use crate::engine::config::CacheConfig;
use crate::engine::error::EngineError;
use crate::engine::merger::merge_variants;
use crate::engine::queue::{enqueue_if_new, read_queue};
use crate::engine::store::{CacheStore, PeptideStatus, read_scores};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Score reported for synonymous changes, which are never cached or queued.
pub const SYNONYMOUS_SCORE: &str = "0";

/// One variant to annotate against one peptide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRequest {
    pub peptide: String,
    pub sequence: String,
    pub notation: String,
}

impl AnnotationRequest {
    pub fn new(
        peptide: impl Into<String>,
        sequence: impl Into<String>,
        notation: impl Into<String>,
    ) -> Self {
        Self {
            peptide: peptide.into(),
            sequence: sequence.into(),
            notation: notation.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// The change leaves the protein unchanged.
    Synonymous,
    /// The score table already held a score for this variant.
    Scored(String),
    /// No score yet. `queued` is set when this call put the peptide on the job queue.
    Pending { queued: bool },
}

impl Annotation {
    pub fn score(&self) -> Option<&str> {
        match self {
            Annotation::Synonymous => Some(SYNONYMOUS_SCORE),
            Annotation::Scored(score) => Some(score.as_str()),
            Annotation::Pending { .. } => None,
        }
    }
}

/// Entry point for annotation workers sharing one cache tree.
///
/// An `Annotator` holds only its configuration; all coordination with other
/// workers happens through the files under the cache root.
#[derive(Debug, Clone)]
pub struct Annotator {
    store: CacheStore,
    job_queue: PathBuf,
}

impl Annotator {
    /// Validates `config` and fails fast if the cache root or the job queue
    /// cannot be used.
    pub fn new(config: CacheConfig) -> Result<Self, EngineError> {
        config.validate()?;
        debug!(
            cache_root = %config.cache_root.display(),
            job_queue = %config.job_queue.display(),
            "Annotator initialized."
        );
        Ok(Self {
            store: CacheStore::new(config.cache_root),
            job_queue: config.job_queue,
        })
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn job_queue(&self) -> &Path {
        &self.job_queue
    }

    /// Records the requested variant in the cache and returns its score if
    /// one is already known.
    ///
    /// Scores are read before the merge, so a variant first seen in this call
    /// is reported as pending even if the scorer runs immediately afterwards.
    /// Every notation already present in the score table is merged back into
    /// the variant list alongside the request, which keeps the list complete
    /// if the table was regenerated from elsewhere.
    #[instrument(skip_all, fields(peptide = %request.peptide, notation = %request.notation))]
    pub fn annotate(&self, request: &AnnotationRequest) -> Result<Annotation, EngineError> {
        let change = notation::normalize(&request.notation);
        if change.is_synonymous {
            debug!("Synonymous change; skipping the cache.");
            return Ok(Annotation::Synonymous);
        }

        let variant = VariantNotation::new(change.notation)?;
        let key = PeptideKey::new(&request.peptide)?;

        let paths = self.store.ensure_peptide_dir(&key)?;
        self.store
            .write_sequence_if_absent(&paths, &key, &request.sequence)?;

        let scores = read_scores(&paths.scores)?;

        let mut keys: VariantSet = scores.notations().cloned().collect();
        keys.insert(variant.clone());
        let added = merge_variants(&paths.variants, &keys)?;

        let queued = added && enqueue_if_new(&self.job_queue, &key)?;

        Ok(match scores.get(&variant) {
            Some(score) => Annotation::Scored(score.to_string()),
            None => Annotation::Pending { queued },
        })
    }

    pub fn status(&self, peptide: &str) -> Result<Option<PeptideStatus>, EngineError> {
        let key = PeptideKey::new(peptide)?;
        self.store.inspect(&key)
    }

    pub fn queued(&self) -> Result<Vec<PeptideKey>, EngineError> {
        read_queue(&self.job_queue)
    }
}
