//!
//! The structs in this mod turn one workflow's raw node/edge records into the
//! deterministic, de-duplicated set of linear tool sequences that feed the
//! vocabulary and tensor-encoding stages.
//!
//! The sequence set is created in 4 steps:
//! 1. Compile the raw records into a validated, dense `StepGraph`.
//! 2. Reject the whole workflow if the graph contains a cycle.
//! 3. Enumerate all maximal root-to-sink paths depth-first, forking at each
//!    branch point, with a cap on total paths to bound fan-out.
//! 4. Normalize each path into a token sequence, dropping unusable tokens and
//!    sequences too short to inform training.
//!
//! Every choice point breaks ties on raw step id, so repeated runs over the
//! same graph (however its records are ordered) produce identical output.

/// cycle detection via three-color depth-first visitation
mod cycle;

/// depth-first enumeration of maximal root-to-sink paths
mod enumerate;
pub use enumerate::EnumeratedPaths;

/// struct returned by this mod
mod builder;
pub use builder::{BuildConfig, BuildOutcome, SequenceBuilder};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cycle detected at step \"{0}\"")]
    Cycle(String),
}
