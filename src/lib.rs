//! Corpus pipeline for bioinformatics workflow graphs: feed per-workflow
//! node/edge records in, get a deterministic sequence corpus, vocabulary,
//! and fixed-length encoded tensors out.
//!
//! Graph retrieval (database queries, pagination, auth) is a collaborator's
//! job; this crate starts from already-fetched [`WorkflowGraph`] records.

/// Corpus accumulation across workflows
mod corpus;
/// Per-workflow failure records and corpus-wide counters
mod report;
/// Vocabulary and encoded-corpus persistence
mod persist;

pub use corpus::{Corpus, CorpusBuilder, PipelineConfig};
pub use persist::{load_encoded, load_vocabulary, save_encoded, save_vocabulary};
pub use report::{CorpusMetrics, FailureLog, WorkflowFailure};

pub use encode::{
    decode, split, windows, EncodedSequence, Encoder, NegativeSampler, SplitConfig,
    TrainingExample, TransitionGraph, Vocabulary, PAD_TOKEN, UNKNOWN_TOKEN,
};
pub use model::{EdgeRecord, NodeRecord, Normalizer, Sequence, WorkflowGraph, INVALID_TOKEN};
pub use traverse::{BuildConfig, BuildOutcome, SequenceBuilder};
