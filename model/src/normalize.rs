use lazy_static::lazy_static;
use regex::Regex;

use util::{HashMap, Hasher};

/// Sentinel for labels that carry no usable tool identity.
/// Downstream stages must drop it, never encode it.
pub const INVALID_TOKEN: &str = "__invalid__";

lazy_static! {
    /// trailing build qualifiers, possibly stacked, e.g. "samtools+galaxy1"
    static ref BUILD_SUFFIX: Regex = Regex::new(r"(?:\+[A-Za-z0-9._-]+)+$").unwrap();
    /// a whole path segment that looks like a version, e.g. "1.2.3" or "v0.7.17+galaxy0"
    static ref VERSION_SEGMENT: Regex = Regex::new(r"^v?[0-9][A-Za-z0-9._+-]*$").unwrap();
}

/// Canonicalizes raw tool labels into stable tokens.
///
/// The synonym table is plain read-only configuration held by value, so two
/// normalizers with the same table always agree and tests can supply their own.
///
/// `normalize` is total and idempotent: canonical synonym values must
/// themselves be fixed points (lowercase, no path or version parts).
#[derive(Debug)]
pub struct Normalizer {
    synonyms: HashMap<String, String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        // aliases seen across Galaxy tool corpora; both sides post-cleanup form
        Self::with_synonyms([
            ("upload1", "upload"),
            ("bwa-mem", "bwa_mem"),
            ("bwa mem", "bwa_mem"),
            ("trimmomatic_wrapper", "trimmomatic"),
            ("cutadapt_wrapper", "cutadapt"),
            ("fastqc_report", "fastqc"),
        ])
    }
}

impl Normalizer {
    /// Create a normalizer with no synonym collapsing at all.
    pub fn empty() -> Self {
        Self {
            synonyms: HashMap::default(),
        }
    }

    /// Create a normalizer with the given alias -> canonical pairs.
    pub fn with_synonyms<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut synonyms = HashMap::with_capacity_and_hasher(8, Hasher::default());
        for (alias, canonical) in pairs {
            synonyms.insert(alias.to_owned(), canonical.to_owned());
        }
        Self { synonyms }
    }

    /// Canonicalize a raw tool label. Never fails; unusable labels come back
    /// as [`INVALID_TOKEN`].
    ///
    /// Rules, in order: trim; null-ish labels are invalid; path-style labels
    /// (toolshed URIs) reduce to their tool segment, dropping a trailing
    /// version segment; a trailing "+build" qualifier is stripped; the result
    /// is lower-cased and run through the synonym table.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") || trimmed.eq_ignore_ascii_case("none") {
            return INVALID_TOKEN.to_owned();
        }

        // "toolshed.g2.bx.psu.edu/repos/devteam/bwa/bwa_mem/0.7.17" -> "bwa_mem"
        let base = match trimmed.rsplit_once('/') {
            Some((head, tail)) if VERSION_SEGMENT.is_match(tail) => {
                head.rsplit_once('/').map_or(head, |(_, tool)| tool)
            }
            Some((_, tail)) => tail,
            None => trimmed,
        };

        let base = BUILD_SUFFIX.replace(base, "");
        let token = base.trim().to_ascii_lowercase();
        if token.is_empty() {
            return INVALID_TOKEN.to_owned();
        }

        match self.synonyms.get(token.as_str()) {
            Some(canonical) => canonical.clone(),
            None => token,
        }
    }
}
