use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use model::{Sequence, TokenId};
use util::{HashMap, HashSet, Hasher};

use crate::Vocabulary;

/// Directed graph of observed adjacent-token transitions across the corpus.
/// An edge `a -> b` means some sequence runs tool `b` directly after `a`.
#[derive(Debug, Default)]
pub struct TransitionGraph {
    successors: HashMap<TokenId, HashSet<TokenId>>,
}

impl TransitionGraph {
    /// Build the transition graph over the whole corpus.
    pub fn build<'s>(
        corpus: impl IntoIterator<Item = &'s Sequence>,
        vocab: &Vocabulary,
    ) -> Self {
        let mut successors: HashMap<TokenId, HashSet<TokenId>> =
            HashMap::with_capacity_and_hasher(vocab.len(), Hasher::default());
        for seq in corpus {
            let ids: Vec<TokenId> = seq.iter().map(|t| vocab.index_of(t)).collect();
            for pair in ids.windows(2) {
                successors.entry(pair[0]).or_default().insert(pair[1]);
            }
        }
        Self { successors }
    }

    /// True if `to` was ever observed directly after `from`.
    pub fn has_edge(&self, from: TokenId, to: TokenId) -> bool {
        self.successors
            .get(&from)
            .is_some_and(|succs| succs.contains(&to))
    }
}

/// Draws negative next-tool targets: tokens that never follow the context's
/// last real token anywhere in the corpus. Hard negatives like these teach a
/// ranking model more than uniform draws would.
#[derive(Debug)]
pub struct NegativeSampler {
    /// per source token, candidate negatives in ascending index order.
    candidates: HashMap<TokenId, Vec<TokenId>>,
    /// fallback pool for tokens with no recorded transitions.
    all: Vec<TokenId>,
    rng: StdRng,
    num_negatives: usize,
}

impl NegativeSampler {
    /// Create a new NegativeSampler with a fixed seed; the same seed over the
    /// same corpus draws the same negatives.
    pub fn new(
        graph: &TransitionGraph,
        vocab: &Vocabulary,
        num_negatives: usize,
        seed: u64,
    ) -> Self {
        let mut candidates: HashMap<TokenId, Vec<TokenId>> =
            HashMap::with_capacity_and_hasher(vocab.len(), Hasher::default());
        for source in vocab.ids() {
            let pool: Vec<TokenId> = vocab
                .ids()
                .filter(|&t| t != source && !graph.has_edge(source, t))
                .collect();
            candidates.insert(source, pool);
        }
        Self {
            candidates,
            all: vocab.ids().collect(),
            rng: StdRng::seed_from_u64(seed),
            num_negatives,
        }
    }

    /// Draw negatives for one training example. Draws never equal the true
    /// `target`; an exhausted pool yields fewer than `num_negatives`.
    pub fn sample(&mut self, source: TokenId, target: TokenId) -> Vec<TokenId> {
        let pool = self.candidates.get(&source).unwrap_or(&self.all);
        let pool: Vec<TokenId> = pool.iter().copied().filter(|&c| c != target).collect();
        if pool.is_empty() {
            return Vec::new();
        }
        (0..self.num_negatives)
            .filter_map(|_| pool.choose(&mut self.rng).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> Sequence {
        Sequence::from_tokens(tokens.iter().map(|t| (*t).to_owned()))
    }

    #[test]
    fn test_transition_edges() {
        let corpus = [seq(&["t1", "t2", "t3"]), seq(&["t2", "t4"]), seq(&["t1", "t5"])];
        let vocab = Vocabulary::build(&corpus);
        let graph = TransitionGraph::build(&corpus, &vocab);

        let id = |t: &str| vocab.index_of(t);
        assert!(graph.has_edge(id("t1"), id("t2")));
        assert!(graph.has_edge(id("t2"), id("t3")));
        assert!(graph.has_edge(id("t2"), id("t4")));
        assert!(graph.has_edge(id("t1"), id("t5")));
        assert!(!graph.has_edge(id("t1"), id("t4")));
    }

    #[test]
    fn test_candidates_exclude_successors_and_self() {
        let corpus = [
            seq(&["t1", "t2"]),
            seq(&["t1", "t3"]),
            seq(&["t2", "t4"]),
            seq(&["t4", "t5"]),
        ];
        let vocab = Vocabulary::build(&corpus);
        let graph = TransitionGraph::build(&corpus, &vocab);
        let mut sampler = NegativeSampler::new(&graph, &vocab, 32, 42);

        let id = |t: &str| vocab.index_of(t);
        let draws = sampler.sample(id("t1"), id("t2"));
        assert!(!draws.is_empty());
        for neg in draws {
            assert_ne!(neg, id("t1"));
            assert_ne!(neg, id("t2"));
            assert_ne!(neg, id("t3"));
        }
    }

    #[test]
    fn test_same_seed_same_draws() {
        let corpus = [seq(&["t1", "t2"]), seq(&["t3", "t4"]), seq(&["t5", "t1"])];
        let vocab = Vocabulary::build(&corpus);
        let graph = TransitionGraph::build(&corpus, &vocab);

        let id = |t: &str| vocab.index_of(t);
        let mut a = NegativeSampler::new(&graph, &vocab, 4, 7);
        let mut b = NegativeSampler::new(&graph, &vocab, 4, 7);
        assert_eq!(a.sample(id("t1"), id("t2")), b.sample(id("t1"), id("t2")));
    }
}
