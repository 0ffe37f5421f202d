use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use model::{Sequence, TokenId};
use util::{HashMap, Hasher, IdVec};

/// Display string for the reserved padding slot.
pub const PAD_TOKEN: &str = "<PAD>";
/// Display string for the reserved unknown-token slot.
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Bijection between normalized tool tokens and dense indices, plus the two
/// reserved `PAD`/`UNKNOWN` slots at the top of the index space.
///
/// Indices are assigned in sorted token order, so the mapping depends only on
/// the corpus content, never on the order sequences arrive from upstream
/// fetching or pagination. Built once per corpus; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VocabularyFile", into = "VocabularyFile")]
pub struct Vocabulary {
    tokens: IdVec<TokenId, String>,
    index: HashMap<String, TokenId>,
}

/// On-disk form: just the sorted token list. The index is rebuilt on load,
/// so a reloaded vocabulary is identical to the one that was saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyFile {
    tokens: Vec<String>,
}

impl From<VocabularyFile> for Vocabulary {
    fn from(file: VocabularyFile) -> Self {
        Self::from_tokens(file.tokens)
    }
}

impl From<Vocabulary> for VocabularyFile {
    fn from(vocab: Vocabulary) -> Self {
        Self {
            tokens: vocab.tokens.iter().cloned().collect(),
        }
    }
}

impl Vocabulary {
    /// Build a vocabulary from the full corpus of sequences.
    pub fn build<'s>(corpus: impl IntoIterator<Item = &'s Sequence>) -> Self {
        let mut distinct = BTreeSet::new();
        for seq in corpus {
            for token in seq.iter() {
                distinct.insert(token.to_owned());
            }
        }
        log::debug!("vocabulary built with {} distinct tokens", distinct.len());
        Self::from_tokens(distinct.into_iter().collect())
    }

    fn from_tokens(mut tokens: Vec<String>) -> Self {
        // hand-edited or foreign files might not be sorted; canonicalize
        tokens.sort_unstable();
        tokens.dedup();

        let mut index: HashMap<String, TokenId> =
            HashMap::with_capacity_and_hasher(tokens.len(), Hasher::default());
        let mut ids = IdVec::with_capacity(tokens.len());
        for token in tokens {
            let id: TokenId = ids.push(token.clone());
            index.insert(token, id);
        }
        Self { tokens: ids, index }
    }

    /// Number of real (non-reserved) tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if there are no real tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Total index space, including the two reserved slots. This is the
    /// embedding-table size a downstream model needs.
    #[inline]
    pub fn size(&self) -> usize {
        self.tokens.len() + 2
    }

    /// The reserved padding index.
    #[inline]
    pub fn pad(&self) -> TokenId {
        TokenId::from(self.tokens.len())
    }

    /// The reserved unknown-token index.
    #[inline]
    pub fn unknown(&self) -> TokenId {
        TokenId::from(self.tokens.len() + 1)
    }

    /// Index of the given token. Never fails: absent tokens map to the
    /// reserved unknown index.
    #[inline]
    pub fn index_of(&self, token: &str) -> TokenId {
        self.index
            .get(token)
            .copied()
            .unwrap_or_else(|| self.unknown())
    }

    /// True if the token is a real vocabulary entry.
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.index.contains_key(token)
    }

    /// Token string for the given index; reserved indices come back as their
    /// display strings.
    pub fn token(&self, id: TokenId) -> &str {
        if id == self.pad() {
            PAD_TOKEN
        } else if id == self.unknown() {
            UNKNOWN_TOKEN
        } else {
            self.tokens.get(id)
        }
    }

    /// Iterate through real token ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = TokenId> {
        (0..self.tokens.len()).map(TokenId::from)
    }

    /// Iterate through real tokens in index order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> Sequence {
        Sequence::from_tokens(tokens.iter().map(|t| (*t).to_owned()))
    }

    #[test]
    fn test_sorted_assignment_with_reserved_tail() {
        // tokens {"bwa","fastqc","bwa"} -> exactly two sorted entries,
        // PAD/UNKNOWN appended last
        let corpus = [seq(&["bwa", "fastqc"]), seq(&["bwa", "bwa"])];
        let vocab = Vocabulary::build(&corpus);

        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.size(), 4);
        assert_eq!(usize::from(vocab.index_of("bwa")), 0);
        assert_eq!(usize::from(vocab.index_of("fastqc")), 1);
        assert_eq!(usize::from(vocab.pad()), 2);
        assert_eq!(usize::from(vocab.unknown()), 3);
    }

    #[test]
    fn test_order_independent() {
        let a = [seq(&["fastqc", "bwa"]), seq(&["samtools", "multiqc"])];
        let b = [seq(&["samtools", "multiqc"]), seq(&["fastqc", "bwa"])];
        assert_eq!(Vocabulary::build(&a), Vocabulary::build(&b));
    }

    #[test]
    fn test_unknown_lookup() {
        let vocab = Vocabulary::build(&[seq(&["bwa", "fastqc"])]);
        assert_eq!(vocab.index_of("never-seen"), vocab.unknown());
        assert!(!vocab.contains("never-seen"));
    }

    #[test]
    fn test_reserved_display_strings() {
        let vocab = Vocabulary::build(&[seq(&["bwa", "fastqc"])]);
        assert_eq!(vocab.token(vocab.pad()), PAD_TOKEN);
        assert_eq!(vocab.token(vocab.unknown()), UNKNOWN_TOKEN);
        assert_eq!(vocab.token(vocab.index_of("bwa")), "bwa");
    }
}
