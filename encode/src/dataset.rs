use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use model::{Sequence, TokenId};

use crate::{NegativeSampler, Vocabulary};

/// One next-tool training example: `context` predicts `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// preceding tokens, left-padded with `PAD` to the context length.
    pub context: Vec<TokenId>,
    pub target: TokenId,
    /// negative targets, empty when no sampler was supplied.
    pub negatives: Vec<TokenId>,
}

/// Sliding next-tool windows over each sequence.
///
/// A sequence of length L yields L-1 examples: each position past the first
/// becomes a target, with everything before it (clipped and left-padded to
/// `context_len`) as the context.
pub fn windows(
    sequences: &[Sequence],
    vocab: &Vocabulary,
    context_len: usize,
    mut sampler: Option<&mut NegativeSampler>,
) -> Vec<TrainingExample> {
    let mut examples = Vec::new();
    for seq in sequences {
        let ids: Vec<TokenId> = seq.iter().map(|t| vocab.index_of(t)).collect();
        for i in 1..ids.len() {
            let target = ids[i];
            let start = i.saturating_sub(context_len);
            let tail = &ids[start..i];

            let mut context = Vec::with_capacity(context_len);
            context.resize(context_len - tail.len(), vocab.pad());
            context.extend_from_slice(tail);

            let negatives = match sampler.as_deref_mut() {
                Some(sampler) => sampler.sample(ids[i - 1], target),
                None => Vec::new(),
            };

            examples.push(TrainingExample {
                context,
                target,
                negatives,
            });
        }
    }
    examples
}

/// Fractions and seed for a corpus split.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub test_frac: f64,
    pub val_frac: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_frac: 0.1,
            val_frac: 0.1,
            seed: 42,
        }
    }
}

/// Deterministic train/val/test split over the unique sequence set.
///
/// Sequences are de-duplicated and sorted before the seeded shuffle, so the
/// split depends only on corpus content and seed, not on arrival order.
pub fn split(
    sequences: &[Sequence],
    config: &SplitConfig,
) -> (Vec<Sequence>, Vec<Sequence>, Vec<Sequence>) {
    let unique: BTreeSet<&Sequence> = sequences.iter().collect();
    let mut unique: Vec<Sequence> = unique.into_iter().cloned().collect();

    let mut rng = StdRng::seed_from_u64(config.seed);
    unique.shuffle(&mut rng);

    let n = unique.len();
    // overlarge fractions clamp to an empty train set instead of panicking
    let n_test = ((n as f64 * config.test_frac) as usize).min(n);
    let n_val = ((n as f64 * config.val_frac) as usize).min(n - n_test);

    let rest = unique.split_off(n_test + n_val);
    let val = unique.split_off(n_test);
    (rest, val, unique)
}
