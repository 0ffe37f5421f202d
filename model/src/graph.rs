use serde::{Deserialize, Serialize};

use util::{HashMap, Hasher, IdVec};

use crate::{Error, NodeId};

/// One tool invocation fetched from the graph source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    /// step id, unique within its workflow.
    pub id: String,
    /// raw tool label; `None` means the step carries no tool (e.g. an input dataset).
    pub tool_label: Option<String>,
    /// step-order hint from the source graph. Topology is authoritative,
    /// so we never read this; it's kept so records round-trip losslessly.
    #[serde(default)]
    pub step_order: Option<u32>,
}

/// Directed dependency between two steps of the same workflow:
/// `from` must execute before `to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
}

/// Raw per-workflow node/edge records, as handed over by the graph source.
/// Record order is irrelevant; compilation canonicalizes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub workflow_id: String,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Validated, dense representation of one workflow's step graph.
///
/// Dense ids are assigned in sorted raw-step-id order and successor lists are
/// kept sorted, so the same records compile to the same graph no matter how
/// the source ordered them.
#[derive(Debug)]
pub struct StepGraph {
    pub workflow_id: String,
    step_ids: IdVec<NodeId, String>,
    labels: IdVec<NodeId, Option<String>>,
    out_edges: IdVec<NodeId, Vec<NodeId>>,
    in_degree: IdVec<NodeId, u16>,
}

impl StepGraph {
    /// Compile raw records, rejecting empty graphs, duplicate step ids,
    /// self-edges, and edges with missing endpoints.
    pub fn compile(raw: &WorkflowGraph) -> Result<Self, Error> {
        if raw.nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }
        // NodeId is u16-backed; a larger graph would wrap ids
        if raw.nodes.len() > usize::from(u16::MAX) {
            return Err(Error::TooManySteps(raw.nodes.len()));
        }

        let mut sorted: Vec<&NodeRecord> = raw.nodes.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut index: HashMap<&str, NodeId> =
            HashMap::with_capacity_and_hasher(sorted.len(), Hasher::default());
        let mut step_ids = IdVec::with_capacity(sorted.len());
        let mut labels = IdVec::with_capacity(sorted.len());
        for rec in &sorted {
            let id: NodeId = step_ids.push(rec.id.clone());
            let _: NodeId = labels.push(rec.tool_label.clone());
            if index.insert(rec.id.as_str(), id).is_some() {
                return Err(Error::DuplicateNode(rec.id.clone()));
            }
        }

        let mut out_edges: IdVec<NodeId, Vec<NodeId>> = IdVec::fill(Vec::new(), sorted.len());
        let mut in_degree: IdVec<NodeId, u16> = IdVec::fill(0, sorted.len());
        for edge in &raw.edges {
            if edge.from == edge.to {
                return Err(Error::SelfEdge(edge.from.clone()));
            }
            let (Some(&u), Some(&v)) = (
                index.get(edge.from.as_str()),
                index.get(edge.to.as_str()),
            ) else {
                return Err(Error::DanglingEdge(edge.from.clone(), edge.to.clone()));
            };
            let outs = out_edges.get_mut(u);
            // redundant duplicate edges collapse into one
            if !outs.contains(&v) {
                outs.push(v);
                *in_degree.get_mut(v) += 1;
            }
        }

        // dense ids follow sorted raw ids, so numeric order == lexicographic
        // order on the source step ids:
        for i in 0..sorted.len() {
            out_edges.get_mut(NodeId::from(i)).sort_unstable();
        }

        log::trace!(
            "compiled workflow {} with {} steps, {} edges",
            raw.workflow_id,
            sorted.len(),
            raw.edges.len()
        );

        Ok(Self {
            workflow_id: raw.workflow_id.clone(),
            step_ids,
            labels,
            out_edges,
            in_degree,
        })
    }

    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.step_ids.len()
    }

    /// True if len == 0 (never true for a compiled graph).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.step_ids.is_empty()
    }

    /// Raw source id of the given step.
    #[inline]
    pub fn step_id(&self, node: NodeId) -> &str {
        self.step_ids.get(node)
    }

    /// Raw tool label of the given step, if it has one.
    #[inline]
    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node).as_deref()
    }

    /// Successors of the given step, in ascending raw-step-id order.
    #[inline]
    pub fn successors(&self, node: NodeId) -> &[NodeId] {
        self.out_edges.get(node)
    }

    /// True if the given step has no outgoing edges.
    #[inline]
    pub fn is_sink(&self, node: NodeId) -> bool {
        self.out_edges.get(node).is_empty()
    }

    /// All in-degree-zero steps, in ascending raw-step-id order.
    pub fn roots(&self) -> Vec<NodeId> {
        self.in_degree
            .enumerate()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of steps with more than one outgoing edge.
    pub fn branch_points(&self) -> usize {
        self.out_edges.iter().filter(|outs| outs.len() > 1).count()
    }
}
