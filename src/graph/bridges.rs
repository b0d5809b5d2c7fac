use super::*;

pub trait Bridges {
    /// Returns the ids of all bridges, i.e. edges whose removal disconnects their
    /// component, sorted increasingly. Parallel edges are never bridges.
    fn compute_bridges(&self) -> Vec<EdgeId>;
}

impl<G: IncidenceList> Bridges for G {
    fn compute_bridges(&self) -> Vec<EdgeId> {
        BridgeSearch::new(self).compute()
    }
}

/// Tarjan's low-link search. The DFS keeps its own stack of frames so that long paths
/// (which are common in route networks) do not exhaust the call stack.
struct BridgeSearch<'a, G> {
    graph: &'a G,
    nodes_info: Vec<NodeInfo>,
    time: Node,
    bridges: Vec<EdgeId>,
    stack: Vec<Frame>,
}

struct Frame {
    node: Node,
    parent_edge: Option<EdgeId>,
    next_incidence: usize,
}

impl<'a, G: IncidenceList> BridgeSearch<'a, G> {
    fn new(graph: &'a G) -> Self {
        let n = graph.vertices_range().end;
        Self {
            graph,
            nodes_info: vec![NodeInfo::default(); n as usize],
            time: 0,
            bridges: Vec::new(),
            stack: Vec::with_capacity(128),
        }
    }

    fn compute(mut self) -> Vec<EdgeId> {
        let graph = self.graph;
        for u in graph.vertices() {
            if graph.degree_of(u) == 0 || self.nodes_info[u as usize].is_discovered() {
                continue;
            }

            self.search_from(u);
        }

        self.bridges.sort_unstable();
        self.bridges
    }

    fn discover(&mut self, u: Node, parent_edge: Option<EdgeId>) {
        self.time += 1;
        self.nodes_info[u as usize] = NodeInfo {
            discovery: self.time,
            low: self.time,
        };
        self.stack.push(Frame {
            node: u,
            parent_edge,
            next_incidence: 0,
        });
    }

    fn search_from(&mut self, root: Node) {
        debug_assert!(self.stack.is_empty());
        let graph = self.graph;
        self.discover(root, None);

        while let Some(frame) = self.stack.last_mut() {
            let u = frame.node;
            let next_edge = graph.incident_edges_of(u).get(frame.next_incidence).copied();

            if let Some(e) = next_edge {
                frame.next_incidence += 1;

                // only the very edge instance we arrived on is skipped; a parallel
                // edge to the parent is a valid back edge
                if frame.parent_edge == Some(e) {
                    continue;
                }

                let Some(v) = graph.other_endpoint(e, u) else {
                    continue;
                };

                if self.nodes_info[v as usize].is_discovered() {
                    let v_disc = self.nodes_info[v as usize].discovery;
                    self.nodes_info[u as usize].update_low(v_disc);
                } else {
                    self.discover(v, Some(e));
                }
                continue;
            }

            // all incident edges of u are processed; return to the parent
            let parent_edge = frame.parent_edge;
            self.stack.pop();

            let (Some(edge), Some(parent)) = (parent_edge, self.stack.last()) else {
                continue;
            };

            let parent = parent.node;
            let info_u = self.nodes_info[u as usize];
            self.nodes_info[parent as usize].update_low(info_u.low);

            if info_u.low > self.nodes_info[parent as usize].discovery {
                self.bridges.push(edge);
            }
        }
    }
}

#[derive(Clone, Copy, Default)]
struct NodeInfo {
    low: Node,
    discovery: Node,
}

impl NodeInfo {
    fn is_discovered(&self) -> bool {
        self.discovery > 0
    }

    fn update_low(&mut self, value: Node) {
        self.low = self.low.min(value);
    }
}
