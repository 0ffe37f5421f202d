use std::collections::BTreeSet;

use anyhow::Result;
use colored::Colorize;

use model::{Normalizer, Sequence, StepGraph, WorkflowGraph, INVALID_TOKEN};

use crate::enumerate::PathEnumerator;
use crate::{cycle, Error};

/// Knobs bounding sequence construction.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Cap on enumerated paths per workflow. Required safeguard against
    /// exponential fan-out, not a tuning knob; hitting it flags the outcome.
    pub max_sequences: usize,
    /// Sequences shorter than this are dropped as uninformative.
    pub min_len: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_sequences: 64,
            min_len: 2,
        }
    }
}

/// What one workflow contributed to the corpus.
#[derive(Debug)]
pub struct BuildOutcome {
    pub workflow_id: String,
    /// surviving sequences, de-duplicated, in deterministic order.
    pub sequences: BTreeSet<Sequence>,
    /// true if the path cap cut enumeration short.
    pub truncated: bool,
    /// number of steps with more than one outgoing edge.
    pub branch_points: usize,
    /// sequences dropped for being shorter than `min_len`.
    pub dropped_short: usize,
}

/// Builds the deterministic sequence set for one workflow at a time.
pub struct SequenceBuilder<'a> {
    normalizer: &'a Normalizer,
    config: BuildConfig,
}

impl<'a> SequenceBuilder<'a> {
    /// Create a new SequenceBuilder with the given normalizer and config.
    pub fn new(normalizer: &'a Normalizer, config: BuildConfig) -> Self {
        Self { normalizer, config }
    }

    /// Build the sequence set for one workflow.
    ///
    /// A malformed workflow (empty, duplicate step ids, dangling or self
    /// edges, cycle) comes back as an error the caller records and skips; it
    /// must never abort the rest of the corpus.
    pub fn build(&self, raw: &WorkflowGraph) -> Result<BuildOutcome> {
        let graph = StepGraph::compile(raw)?;

        if let Some(node) = cycle::find_cycle(&graph) {
            return Err(Error::Cycle(graph.step_id(node).to_owned()).into());
        }

        let enumerated = PathEnumerator::new(&graph, self.config.max_sequences).enumerate();
        if enumerated.truncated {
            log::warn!(
                "{}: path cap of {} hit, keeping first {} paths",
                raw.workflow_id.cyan(),
                self.config.max_sequences,
                enumerated.paths.len(),
            );
        }

        let mut outcome = BuildOutcome {
            workflow_id: raw.workflow_id.clone(),
            sequences: BTreeSet::new(),
            truncated: enumerated.truncated,
            branch_points: graph.branch_points(),
            dropped_short: 0,
        };

        for path in enumerated.paths {
            let mut seq = Sequence::with_capacity(path.len());
            for node in path {
                let token = match graph.label(node) {
                    Some(label) => self.normalizer.normalize(label),
                    None => INVALID_TOKEN.to_owned(),
                };
                // steps with no usable tool identity are dropped, not encoded
                if token != INVALID_TOKEN {
                    seq.push(token);
                }
            }
            if seq.len() < self.config.min_len {
                outcome.dropped_short += 1;
                continue;
            }
            outcome.sequences.insert(seq);
        }

        log::debug!(
            "{}: {} sequences, {} branch points, {} dropped short",
            raw.workflow_id.cyan(),
            outcome.sequences.len(),
            outcome.branch_points,
            outcome.dropped_short,
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EdgeRecord, NodeRecord};

    fn raw(nodes: &[(&str, Option<&str>)], edges: &[(&str, &str)]) -> WorkflowGraph {
        WorkflowGraph {
            workflow_id: "wf".to_owned(),
            nodes: nodes
                .iter()
                .map(|(id, label)| NodeRecord {
                    id: (*id).to_owned(),
                    tool_label: label.map(str::to_owned),
                    step_order: None,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(from, to)| EdgeRecord {
                    from: (*from).to_owned(),
                    to: (*to).to_owned(),
                })
                .collect(),
        }
    }

    fn tokens(outcome: &BuildOutcome) -> Vec<Vec<String>> {
        outcome
            .sequences
            .iter()
            .map(|s| s.tokens().to_vec())
            .collect()
    }

    #[test]
    fn test_diamond_yields_two_sequences() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());
        let graph = raw(
            &[
                ("a", Some("A")),
                ("b", Some("B")),
                ("c", Some("C")),
                ("d", Some("D")),
            ],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );

        let outcome = builder.build(&graph)?;
        assert!(!outcome.truncated);
        assert_eq!(outcome.branch_points, 1);
        assert_eq!(
            tokens(&outcome),
            vec![vec!["a", "b", "d"], vec!["a", "c", "d"]]
        );
        Ok(())
    }

    #[test]
    fn test_cycle_is_an_error() {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());
        let graph = raw(
            &[("a", Some("A")), ("b", Some("B"))],
            &[("a", "b"), ("b", "a")],
        );

        let err = builder.build(&graph).unwrap_err();
        assert!(err.to_string().contains("Cycle"));
    }

    #[test]
    fn test_deterministic_under_edge_reordering() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());

        let mut graph = raw(
            &[
                ("a", Some("A")),
                ("b", Some("B")),
                ("c", Some("C")),
                ("d", Some("D")),
            ],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        let first = builder.build(&graph)?;

        graph.edges.reverse();
        graph.nodes.reverse();
        let second = builder.build(&graph)?;

        assert_eq!(first.sequences, second.sequences);
        Ok(())
    }

    #[test]
    fn test_unusable_steps_are_dropped() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());
        // input step has no tool; the rest survive
        let graph = raw(
            &[("a", None), ("b", Some("bwa")), ("c", Some("samtools"))],
            &[("a", "b"), ("b", "c")],
        );

        let outcome = builder.build(&graph)?;
        assert_eq!(tokens(&outcome), vec![vec!["bwa", "samtools"]]);
        Ok(())
    }

    #[test]
    fn test_short_sequences_are_filtered() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());
        let graph = raw(&[("a", Some("A")), ("b", None)], &[("a", "b")]);

        let outcome = builder.build(&graph)?;
        assert!(outcome.sequences.is_empty());
        assert_eq!(outcome.dropped_short, 1);
        Ok(())
    }

    #[test]
    fn test_branch_cap_flags_truncation() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(
            &norm,
            BuildConfig {
                max_sequences: 2,
                min_len: 2,
            },
        );
        let graph = raw(
            &[
                ("a", Some("A")),
                ("m", Some("M")),
                ("n", Some("N")),
                ("z1", Some("Z1")),
                ("z2", Some("Z2")),
            ],
            &[
                ("a", "m"),
                ("a", "n"),
                ("m", "z1"),
                ("m", "z2"),
                ("n", "z1"),
                ("n", "z2"),
            ],
        );

        let outcome = builder.build(&graph)?;
        assert!(outcome.truncated);
        assert_eq!(outcome.sequences.len(), 2);
        Ok(())
    }

    #[test]
    fn test_consecutive_same_tool_collapses() -> Result<()> {
        let norm = Normalizer::empty();
        let builder = SequenceBuilder::new(&norm, BuildConfig::default());
        let graph = raw(
            &[("a", Some("fastqc")), ("b", Some("FastQC")), ("c", Some("bwa"))],
            &[("a", "b"), ("b", "c")],
        );

        let outcome = builder.build(&graph)?;
        assert_eq!(tokens(&outcome), vec![vec!["fastqc", "bwa"]]);
        Ok(())
    }
}
