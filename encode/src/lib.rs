//!
//! Turns the corpus of normalized sequences into numbers a model can train
//! on: a deterministic token vocabulary, fixed-length padded/masked index
//! arrays, next-tool training windows, and transition-aware negative samples.

/// deterministic token -> index mapping with reserved PAD/UNKNOWN slots
mod vocab;
pub use vocab::{Vocabulary, PAD_TOKEN, UNKNOWN_TOKEN};

/// fixed-length encode/decode with padding mask
mod encoder;
pub use encoder::{decode, EncodedSequence, Encoder};

/// next-tool training windows and deterministic corpus splits
mod dataset;
pub use dataset::{split, windows, SplitConfig, TrainingExample};

/// transition graph and negative-sample drawing
mod negative;
pub use negative::{NegativeSampler, TransitionGraph};
