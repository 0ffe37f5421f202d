use model::{NodeId, StepGraph};
use util::IdVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// not visited yet
    White,
    /// on the current visitation path
    Gray,
    /// fully explored
    Black,
}

enum Visit {
    Enter(NodeId),
    Exit(NodeId),
}

/// Find a step that sits on a cycle, if the graph has one.
///
/// Iterative three-color depth-first visitation: an edge into a gray node is
/// a back-edge, which means a cycle. Every node is used as a start so
/// components unreachable from any root (e.g. a pure cycle) are still covered.
pub fn find_cycle(graph: &StepGraph) -> Option<NodeId> {
    let mut colors: IdVec<NodeId, Color> = IdVec::fill(Color::White, graph.len());
    let mut stack: Vec<Visit> = Vec::with_capacity(graph.len());

    for i in 0..graph.len() {
        let start = NodeId::from(i);
        if *colors.get(start) != Color::White {
            continue;
        }
        stack.push(Visit::Enter(start));
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(node) => {
                    // a node can be enqueued by several parents; only the
                    // first pop explores it
                    if *colors.get(node) != Color::White {
                        continue;
                    }
                    *colors.get_mut(node) = Color::Gray;
                    stack.push(Visit::Exit(node));
                    for &next in graph.successors(node) {
                        match *colors.get(next) {
                            Color::Gray => return Some(next),
                            Color::White => stack.push(Visit::Enter(next)),
                            Color::Black => {}
                        }
                    }
                }
                Visit::Exit(node) => {
                    *colors.get_mut(node) = Color::Black;
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EdgeRecord, NodeRecord, WorkflowGraph};

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> StepGraph {
        let raw = WorkflowGraph {
            workflow_id: "wf".to_owned(),
            nodes: nodes
                .iter()
                .map(|id| NodeRecord {
                    id: (*id).to_owned(),
                    tool_label: Some((*id).to_owned()),
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
        };
        StepGraph::compile(&raw).unwrap()
    }

    #[test]
    fn test_acyclic_diamond() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")],
        );
        assert_eq!(find_cycle(&g), None);
    }

    #[test]
    fn test_two_cycle() {
        let g = graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert!(find_cycle(&g).is_some());
    }

    #[test]
    fn test_cycle_off_the_main_path() {
        // c <-> d loops, unreachable from the a -> b chain
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("c", "d"), ("d", "c")],
        );
        assert!(find_cycle(&g).is_some());
    }

    #[test]
    fn test_reconverging_is_not_a_cycle() {
        // two paths into d; d must not be flagged just because it's seen twice
        let g = graph(
            &["a", "b", "c", "d", "e"],
            &[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d"), ("d", "e")],
        );
        assert_eq!(find_cycle(&g), None);
    }
}
