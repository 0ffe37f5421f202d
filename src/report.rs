use colored::Colorize;
use serde::Serialize;

/// Counters describing what happened across a whole corpus build.
/// Every skipped or trimmed thing is counted here, never silently swallowed.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CorpusMetrics {
    pub total_workflows: usize,
    /// workflows skipped as malformed (cycle, empty, bad edges, dup steps).
    pub malformed_workflows: usize,
    /// workflows whose enumeration hit the path cap.
    pub truncated_workflows: usize,
    /// workflows with at least one branch point.
    pub branching_workflows: usize,
    /// sequences dropped for being shorter than the minimum length.
    pub short_sequences_dropped: usize,
    /// sequences that were exact duplicates of one already in the corpus.
    pub duplicate_sequences: usize,
}

impl CorpusMetrics {
    /// Fold another worker's counters into this one.
    pub fn absorb(&mut self, other: &CorpusMetrics) {
        self.total_workflows += other.total_workflows;
        self.malformed_workflows += other.malformed_workflows;
        self.truncated_workflows += other.truncated_workflows;
        self.branching_workflows += other.branching_workflows;
        self.short_sequences_dropped += other.short_sequences_dropped;
        self.duplicate_sequences += other.duplicate_sequences;
    }
}

/// One skipped workflow and why.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowFailure {
    pub workflow_id: String,
    pub reason: String,
}

/// Per-workflow failures recorded during a corpus build.
/// A failure never aborts the build; it's kept here for the recap.
#[derive(Debug, Default)]
pub struct FailureLog {
    failures: Vec<WorkflowFailure>,
}

impl FailureLog {
    /// Record one skipped workflow.
    pub fn record(&mut self, workflow_id: &str, e: anyhow::Error) {
        log::trace!("{workflow_id}: {e:?}");
        self.failures.push(WorkflowFailure {
            workflow_id: workflow_id.to_owned(),
            reason: format!("{e:#}"),
        });
    }

    /// Number of recorded failures.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if nothing failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Recorded failures, in the order workflows were fed in.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkflowFailure> {
        self.failures.iter()
    }

    /// Fold another worker's failures into this one.
    pub fn absorb(&mut self, other: FailureLog) {
        self.failures.extend(other.failures);
    }

    /// Print the full list of skipped workflows to stderr.
    pub fn print_recap(&self) {
        if self.failures.is_empty() {
            return;
        }
        eprintln!("\nSkipped {} workflows:\n", self.failures.len());
        for f in &self.failures {
            eprintln!("{}: {} ({})", "SKIPPED".red(), f.workflow_id, f.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut log = FailureLog::default();
        log.record("wf-1", anyhow::anyhow!("cycle"));

        let mut other = FailureLog::default();
        other.record("wf-2", anyhow::anyhow!("empty"));

        log.absorb(other);
        assert_eq!(log.len(), 2);
        assert_eq!(log.iter().next().unwrap().workflow_id, "wf-1");
    }
}
