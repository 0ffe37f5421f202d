use model::{NodeId, StepGraph};

/// All maximal root-to-sink paths through one workflow graph, possibly cut
/// short by the path cap.
#[derive(Debug)]
pub struct EnumeratedPaths {
    /// complete paths, in deterministic discovery order.
    pub paths: Vec<Vec<NodeId>>,
    /// true if the cap stopped enumeration before all paths were found.
    pub truncated: bool,
}

struct Frame {
    node: NodeId,
    path: Vec<NodeId>,
}

/// Depth-first path enumeration strategy.
///
/// At a branch point the partial path forks, one continuation per outgoing
/// edge. Successors are stored in ascending raw-step-id order, and we push
/// them in reverse, so forks are explored in that order. The cap keeps the
/// first N discovered paths and flags the result truncated; without it a
/// densely cross-linked graph could explode exponentially.
pub struct PathEnumerator<'a> {
    graph: &'a StepGraph,
    cap: usize,
    stack: Vec<Frame>,
}

impl<'a> PathEnumerator<'a> {
    /// Create a new PathEnumerator over the given compiled graph.
    pub fn new(graph: &'a StepGraph, cap: usize) -> Self {
        Self {
            graph,
            cap,
            stack: Vec::with_capacity(graph.len()),
        }
    }

    /// Consume this struct and enumerate.
    /// Multi-root graphs contribute one path set per root, unioned.
    pub fn enumerate(mut self) -> EnumeratedPaths {
        let mut out = EnumeratedPaths {
            paths: Vec::new(),
            truncated: false,
        };

        for root in self.graph.roots().into_iter().rev() {
            self.stack.push(Frame {
                node: root,
                path: Vec::new(),
            });
        }

        while let Some(Frame { node, mut path }) = self.stack.pop() {
            path.push(node);

            let succs = self.graph.successors(node);
            if succs.is_empty() {
                if out.paths.len() == self.cap {
                    out.truncated = true;
                    break;
                }
                out.paths.push(path);
                continue;
            }

            for (i, &next) in succs.iter().enumerate().rev() {
                let path = if i == 0 {
                    std::mem::take(&mut path)
                } else {
                    path.clone()
                };
                self.stack.push(Frame { node: next, path });
            }
        }

        out
    }
}
