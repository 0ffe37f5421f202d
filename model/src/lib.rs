mod id;
pub use id::{NodeId, TokenId};

mod graph;
pub use graph::{EdgeRecord, NodeRecord, StepGraph, WorkflowGraph};

mod normalize;
pub use normalize::{Normalizer, INVALID_TOKEN};

mod sequence;
pub use sequence::Sequence;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Workflow contains no steps")]
    EmptyGraph,
    #[error("Workflow has {0} steps, exceeding the supported maximum")]
    TooManySteps(usize),
    #[error("Duplicate step id \"{0}\"")]
    DuplicateNode(String),
    #[error("Step \"{0}\" depends on itself")]
    SelfEdge(String),
    #[error("Edge references a missing step: \"{0}\" -> \"{1}\"")]
    DanglingEdge(String, String),
}
