use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};

use encode::{EncodedSequence, Vocabulary};

/// Write the vocabulary as its sorted token list. Reloading yields an
/// identical mapping, and re-saving yields identical bytes.
pub fn save_vocabulary(vocab: &Vocabulary, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), vocab)
        .with_context(|| format!("writing vocabulary to {}", path.display()))?;
    Ok(())
}

/// Load a vocabulary saved by [`save_vocabulary`].
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let vocab = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("reading vocabulary from {}", path.display()))?;
    Ok(vocab)
}

/// Write the encoded corpus: one fixed-length row per sequence, shape
/// `(N, max_len)`, masks included. Format is plain JSON; downstream training
/// only cares about the shape and the index/mask contract.
pub fn save_encoded(encoded: &[EncodedSequence], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer(BufWriter::new(file), encoded)
        .with_context(|| format!("writing encoded corpus to {}", path.display()))?;
    Ok(())
}

/// Load an encoded corpus saved by [`save_encoded`].
pub fn load_encoded(path: &Path) -> Result<Vec<EncodedSequence>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let encoded = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("reading encoded corpus from {}", path.display()))?;
    Ok(encoded)
}
