use serde::{Deserialize, Serialize};

/// One linearization of a workflow: an ordered list of normalized tool tokens.
/// A sequence never repeats the same token twice in a row; `push` collapses
/// adjacent duplicates.
#[derive(
    Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence {
    tokens: Vec<String>,
}

impl Sequence {
    /// Create an empty sequence with the given capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(cap),
        }
    }

    /// Build a sequence from tokens, collapsing adjacent duplicates.
    pub fn from_tokens(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut seq = Self::default();
        for token in tokens {
            seq.push(token);
        }
        seq
    }

    /// Append a token. Adjacent duplicates collapse into one entry.
    pub fn push(&mut self, token: String) {
        if self.tokens.last().map(String::as_str) != Some(token.as_str()) {
            self.tokens.push(token);
        }
    }

    /// Number of tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if len == 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate through tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens as a slice.
    #[inline]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_duplicates_collapse() {
        let seq = Sequence::from_tokens(
            ["fastqc", "fastqc", "bwa", "fastqc"]
                .into_iter()
                .map(str::to_owned),
        );
        assert_eq!(seq.tokens(), ["fastqc", "bwa", "fastqc"]);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = Sequence::from_tokens(["a", "b"].into_iter().map(str::to_owned));
        let b = Sequence::from_tokens(["a", "c"].into_iter().map(str::to_owned));
        assert!(a < b);
    }
}
