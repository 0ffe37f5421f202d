use serde::{Deserialize, Serialize};

use model::{Sequence, TokenId};

use crate::Vocabulary;

/// Fixed-length encoded form of one sequence: indices left-aligned and
/// right-padded to `max_len`, with a mask marking real positions.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedSequence {
    pub ids: Vec<TokenId>,
    pub mask: Vec<bool>,
    /// true if the sequence was longer than `max_len` and lost its tail.
    pub truncated: bool,
}

impl EncodedSequence {
    /// Number of real (unmasked) positions.
    pub fn real_len(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Encodes sequences to fixed-length index arrays.
///
/// Unknown-token hits are counted here: encoding should almost never see a
/// token the vocabulary doesn't know, so a climbing counter means the
/// vocabulary has drifted from the corpus (or normalization changed).
#[derive(Debug)]
pub struct Encoder {
    max_len: usize,
    unknown_hits: u64,
}

impl Encoder {
    /// Create a new Encoder producing rows of the given fixed length.
    pub fn new(max_len: usize) -> Self {
        Self {
            max_len,
            unknown_hits: 0,
        }
    }

    /// Row length of every encoded sequence.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Unknown-token occurrences seen so far.
    #[inline]
    pub fn unknown_hits(&self) -> u64 {
        self.unknown_hits
    }

    /// Encode one sequence. Oversized sequences keep their earliest
    /// `max_len` steps and come back flagged truncated.
    pub fn encode(&mut self, seq: &Sequence, vocab: &Vocabulary) -> EncodedSequence {
        let truncated = seq.len() > self.max_len;
        let mut ids = Vec::with_capacity(self.max_len);
        let mut mask = Vec::with_capacity(self.max_len);

        for token in seq.iter().take(self.max_len) {
            let id = vocab.index_of(token);
            if id == vocab.unknown() {
                self.unknown_hits += 1;
                log::trace!("unknown token at encode: {token:?}");
            }
            ids.push(id);
            mask.push(true);
        }
        while ids.len() < self.max_len {
            ids.push(vocab.pad());
            mask.push(false);
        }

        EncodedSequence {
            ids,
            mask,
            truncated,
        }
    }
}

/// Inverse of `encode`, restricted to non-pad positions.
/// `decode(encode(s)) == s` whenever `s` fits in `max_len` and every token
/// of `s` is in the vocabulary.
pub fn decode(enc: &EncodedSequence, vocab: &Vocabulary) -> Sequence {
    Sequence::from_tokens(
        enc.ids
            .iter()
            .zip(&enc.mask)
            .filter(|(_, &real)| real)
            .map(|(&id, _)| vocab.token(id).to_owned()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: &[&str]) -> Sequence {
        Sequence::from_tokens(tokens.iter().map(|t| (*t).to_owned()))
    }

    #[test]
    fn test_pad_and_mask() {
        // vocab {a:0, b:1, PAD:2, UNKNOWN:3}, encode [a,b] at max_len 4
        let vocab = Vocabulary::build(&[seq(&["a", "b"])]);
        let mut encoder = Encoder::new(4);

        let enc = encoder.encode(&seq(&["a", "b"]), &vocab);
        let ids: Vec<usize> = enc.ids.iter().map(|&id| usize::from(id)).collect();
        assert_eq!(ids, [0, 1, 2, 2]);
        assert_eq!(enc.mask, [true, true, false, false]);
        assert!(!enc.truncated);
        assert_eq!(enc.real_len(), 2);
    }

    #[test]
    fn test_round_trip() {
        let vocab = Vocabulary::build(&[seq(&["bwa", "fastqc", "samtools"])]);
        let mut encoder = Encoder::new(8);

        let original = seq(&["fastqc", "bwa", "samtools"]);
        let decoded = decode(&encoder.encode(&original, &vocab), &vocab);
        assert_eq!(decoded, original);
        assert_eq!(encoder.unknown_hits(), 0);
    }

    #[test]
    fn test_oversized_keeps_earliest_steps() {
        let vocab = Vocabulary::build(&[seq(&["a", "b", "c", "d"])]);
        let mut encoder = Encoder::new(2);

        let enc = encoder.encode(&seq(&["a", "b", "c", "d"]), &vocab);
        assert!(enc.truncated);
        let decoded = decode(&enc, &vocab);
        assert_eq!(decoded, seq(&["a", "b"]));
    }

    #[test]
    fn test_unknown_tokens_counted() {
        let vocab = Vocabulary::build(&[seq(&["a", "b"])]);
        let mut encoder = Encoder::new(4);

        let enc = encoder.encode(&seq(&["a", "mystery", "b"]), &vocab);
        assert_eq!(encoder.unknown_hits(), 1);
        assert_eq!(enc.ids[1], vocab.unknown());
    }
}
