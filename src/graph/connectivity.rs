use itertools::Itertools;

use super::*;

pub type ComponentId = u32;

pub trait Connectivity {
    /// Labels every node with the id of its connected component. Components are numbered
    /// in order of their smallest node; deleted nodes receive `None`.
    fn component_labels(&self) -> Vec<Option<ComponentId>>;

    fn number_of_components(&self) -> NumNodes {
        self.component_labels()
            .into_iter()
            .flatten()
            .max()
            .map_or(0, |c| c + 1)
    }
}

impl<G: IncidenceList> Connectivity for G {
    fn component_labels(&self) -> Vec<Option<ComponentId>> {
        let mut labels = vec![None; self.vertices_range().end as usize];
        let mut stack = Vec::with_capacity(128);
        let mut next_label = 0;

        for root in self.vertices() {
            if labels[root as usize].is_some() {
                continue;
            }

            labels[root as usize] = Some(next_label);
            stack.push(root);

            while let Some(u) = stack.pop() {
                for &e in self.incident_edges_of(u) {
                    let Some(v) = self.other_endpoint(e, u) else {
                        continue;
                    };

                    if labels[v as usize].is_none() {
                        labels[v as usize] = Some(next_label);
                        stack.push(v);
                    }
                }
            }

            next_label += 1;
        }

        labels
    }
}

/// The connected components of a network, each materialized as an independent
/// [`RouteNetwork`], together with the mapping from the original node ids.
pub struct ComponentSplit {
    pub components: Vec<RouteNetwork>,
    mapping: Vec<Option<(ComponentId, Node)>>,
}

impl ComponentSplit {
    /// Returns the component of original node `u` and its id within that component
    pub fn new_id_of(&self, u: Node) -> Option<(ComponentId, Node)> {
        self.mapping.get(u as usize).copied().flatten()
    }

    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteNetwork> + '_ {
        self.components.iter()
    }
}

impl RouteNetwork {
    /// Splits the network into its connected components. Within each component, nodes and
    /// edges keep their relative order; an isolated node becomes a component of its own.
    ///
    /// # Example
    /// ```
    /// use postman::graph::*;
    /// let mut net = RouteNetwork::new();
    /// net.add_named_edge("A", "B", 1);
    /// net.add_named_edge("C", "D", 2);
    /// let split = net.split_into_components();
    /// assert_eq!(split.number_of_components(), 2);
    /// let (c, d) = split.new_id_of(net.find_vertex("D").unwrap()).unwrap();
    /// assert_eq!(split.components[c as usize].name_of(d), "D");
    /// ```
    pub fn split_into_components(&self) -> ComponentSplit {
        let labels = self.component_labels();
        let number_of_components = labels.iter().flatten().max().map_or(0, |c| c + 1);

        let mut components = (0..number_of_components)
            .map(|_| RouteNetwork::new())
            .collect_vec();
        let mut mapping = vec![None; labels.len()];

        for u in self.vertices() {
            let Some(c) = labels[u as usize] else {
                continue;
            };
            let new_u = components[c as usize].add_vertex(self.name_of(u));
            mapping[u as usize] = Some((c, new_u));
        }

        for (_, WeightedEdge(u, v, weight)) in self.edges() {
            let (Some((c, new_u)), Some((_, new_v))) = (mapping[u as usize], mapping[v as usize])
            else {
                continue;
            };
            components[c as usize].add_edge(new_u, new_v, weight);
        }

        ComponentSplit {
            components,
            mapping,
        }
    }
}
