use std::collections::BTreeSet;

use encode::{Encoder, EncodedSequence, Vocabulary};
use model::{Normalizer, Sequence, WorkflowGraph};
use traverse::{BuildConfig, SequenceBuilder};
use util::Timer;

use crate::report::{CorpusMetrics, FailureLog};

/// Settings for a full corpus build.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub build: BuildConfig,
}

/// Accumulates per-workflow sequence sets into one deterministic corpus.
///
/// Workflows are independent of each other, so they can be fed in any order
/// (or built by parallel workers and merged with [`CorpusBuilder::absorb`]);
/// the merge rule is set union, so the resulting corpus is the same either way.
pub struct CorpusBuilder {
    normalizer: Normalizer,
    config: PipelineConfig,
    sequences: BTreeSet<Sequence>,
    metrics: CorpusMetrics,
    failures: FailureLog,
    timer: Timer,
}

impl CorpusBuilder {
    /// Create a new CorpusBuilder with the default normalizer.
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_normalizer(config, Normalizer::default())
    }

    /// Create a new CorpusBuilder with a caller-supplied normalizer.
    pub fn with_normalizer(config: PipelineConfig, normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            config,
            sequences: BTreeSet::new(),
            metrics: CorpusMetrics::default(),
            failures: FailureLog::default(),
            timer: Timer::now(),
        }
    }

    /// Build one workflow's sequences and merge them into the corpus.
    /// A malformed workflow is recorded and skipped, never fatal.
    pub fn add_workflow(&mut self, raw: &WorkflowGraph) {
        self.metrics.total_workflows += 1;

        let builder = SequenceBuilder::new(&self.normalizer, self.config.build.clone());
        match builder.build(raw) {
            Ok(outcome) => {
                if outcome.truncated {
                    self.metrics.truncated_workflows += 1;
                }
                if outcome.branch_points > 0 {
                    self.metrics.branching_workflows += 1;
                }
                self.metrics.short_sequences_dropped += outcome.dropped_short;
                for seq in outcome.sequences {
                    if !self.sequences.insert(seq) {
                        self.metrics.duplicate_sequences += 1;
                    }
                }
            }
            Err(e) => {
                self.metrics.malformed_workflows += 1;
                self.failures.record(&raw.workflow_id, e);
            }
        }
    }

    /// Merge another builder's corpus into this one (for parallel workers).
    /// Set union, so merge order doesn't matter.
    pub fn absorb(&mut self, other: CorpusBuilder) {
        for seq in other.sequences {
            if !self.sequences.insert(seq) {
                self.metrics.duplicate_sequences += 1;
            }
        }
        self.metrics.absorb(&other.metrics);
        self.failures.absorb(other.failures);
    }

    /// Finish the build and hand back the corpus.
    pub fn finish(self) -> Corpus {
        self.timer.log_elapsed("corpus build").ok();
        log::info!(
            "corpus: {} sequences from {} workflows ({} skipped)",
            self.sequences.len(),
            self.metrics.total_workflows,
            self.failures.len(),
        );
        Corpus {
            sequences: self.sequences.into_iter().collect(),
            metrics: self.metrics,
            failures: self.failures,
        }
    }
}

/// Finished corpus: sorted unique sequences plus build accounting.
#[derive(Debug)]
pub struct Corpus {
    /// unique sequences in lexicographic order.
    pub sequences: Vec<Sequence>,
    pub metrics: CorpusMetrics,
    pub failures: FailureLog,
}

impl Corpus {
    /// Deterministic vocabulary over the whole corpus.
    pub fn build_vocabulary(&self) -> Vocabulary {
        Vocabulary::build(&self.sequences)
    }

    /// Encode every sequence to fixed length `max_len`. Returns the rows,
    /// shape `(N, max_len)`, plus the encoder carrying the unknown counter.
    pub fn encode_all(&self, vocab: &Vocabulary, max_len: usize) -> (Vec<EncodedSequence>, Encoder) {
        let mut encoder = Encoder::new(max_len);
        let encoded = self
            .sequences
            .iter()
            .map(|seq| encoder.encode(seq, vocab))
            .collect();
        (encoded, encoder)
    }
}
