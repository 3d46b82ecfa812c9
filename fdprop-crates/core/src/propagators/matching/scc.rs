const UNVISITED: u32 = u32::MAX;

/// A directed graph over the nodes `0..num_nodes`, stored as successor lists.
///
/// The lists are kept between uses so that rebuilding the graph does not allocate.
#[derive(Debug, Default)]
pub(crate) struct Graph {
    successors: Vec<Vec<usize>>,
}

impl Graph {
    /// Removes all edges and sets the number of nodes.
    pub(crate) fn reset(&mut self, num_nodes: usize) {
        self.successors.truncate(num_nodes);
        self.successors.iter_mut().for_each(Vec::clear);
        self.successors.resize_with(num_nodes, Vec::new);
    }

    pub(crate) fn num_nodes(&self) -> usize {
        self.successors.len()
    }

    pub(crate) fn add_edge(&mut self, from: usize, to: usize) {
        self.successors[from].push(to);
    }

    pub(crate) fn successors(&self, node: usize) -> &[usize] {
        &self.successors[node]
    }
}

/// The strongly connected components of a [`Graph`].
///
/// Computed with Tarjan's algorithm, using explicit stacks rather than recursion so that the depth
/// of the search is bounded by the number of nodes and not by the call stack.
#[derive(Debug, Default)]
pub(crate) struct StronglyConnectedComponents {
    index: Vec<u32>,
    low_link: Vec<u32>,
    component: Vec<u32>,
    on_stack: Vec<bool>,
    /// The nodes of the components which are not yet complete.
    stack: Vec<usize>,
    /// The nodes on the current search path, with the position of the next edge to explore.
    path: Vec<(usize, usize)>,
    num_components: u32,
    next_index: u32,
}

impl StronglyConnectedComponents {
    pub(crate) fn compute(&mut self, graph: &Graph) {
        let num_nodes = graph.num_nodes();

        self.index.clear();
        self.index.resize(num_nodes, UNVISITED);
        self.low_link.clear();
        self.low_link.resize(num_nodes, 0);
        self.component.clear();
        self.component.resize(num_nodes, 0);
        self.on_stack.clear();
        self.on_stack.resize(num_nodes, false);
        self.stack.clear();
        self.path.clear();
        self.num_components = 0;
        self.next_index = 0;

        for root in 0..num_nodes {
            if self.index[root] != UNVISITED {
                continue;
            }

            self.discover(root);

            while let Some(&(node, edge)) = self.path.last() {
                if let Some(&successor) = graph.successors(node).get(edge) {
                    let last = self.path.len() - 1;
                    self.path[last].1 += 1;

                    if self.index[successor] == UNVISITED {
                        self.discover(successor);
                    } else if self.on_stack[successor] {
                        self.low_link[node] = self.low_link[node].min(self.index[successor]);
                    }
                } else {
                    let _ = self.path.pop();

                    if self.low_link[node] == self.index[node] {
                        self.close_component(node);
                    }

                    if let Some(&(parent, _)) = self.path.last() {
                        self.low_link[parent] = self.low_link[parent].min(self.low_link[node]);
                    }
                }
            }
        }
    }

    /// The component of the node; two nodes have the same component iff they are strongly
    /// connected.
    pub(crate) fn component(&self, node: usize) -> u32 {
        self.component[node]
    }

    pub(crate) fn num_components(&self) -> usize {
        self.num_components as usize
    }

    fn discover(&mut self, node: usize) {
        self.index[node] = self.next_index;
        self.low_link[node] = self.next_index;
        self.next_index += 1;

        self.stack.push(node);
        self.on_stack[node] = true;
        self.path.push((node, 0));
    }

    fn close_component(&mut self, root: usize) {
        loop {
            let member = self
                .stack
                .pop()
                .expect("the root of a component is on the stack");
            self.on_stack[member] = false;
            self.component[member] = self.num_components;

            if member == root {
                break;
            }
        }

        self.num_components += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(num_nodes: usize, edges: &[(usize, usize)]) -> Graph {
        let mut graph = Graph::default();
        graph.reset(num_nodes);
        for &(from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    #[test]
    fn cycle_is_a_single_component() {
        let graph = graph(3, &[(0, 1), (1, 2), (2, 0)]);
        let mut components = StronglyConnectedComponents::default();
        components.compute(&graph);

        assert_eq!(1, components.num_components());
        assert_eq!(components.component(0), components.component(2));
    }

    #[test]
    fn path_has_a_component_per_node() {
        let graph = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        let mut components = StronglyConnectedComponents::default();
        components.compute(&graph);

        assert_eq!(4, components.num_components());
    }

    #[test]
    fn two_cycles_joined_by_an_edge() {
        let graph = graph(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)]);
        let mut components = StronglyConnectedComponents::default();
        components.compute(&graph);

        assert_eq!(2, components.num_components());
        assert_eq!(components.component(0), components.component(1));
        assert_eq!(components.component(3), components.component(5));
        assert_ne!(components.component(0), components.component(3));
    }

    #[test]
    fn long_paths_do_not_exhaust_the_stack() {
        let num_nodes = 200_000;
        let edges = (0..num_nodes - 1)
            .map(|node| (node, node + 1))
            .chain(std::iter::once((num_nodes - 1, 0)))
            .collect::<Vec<_>>();
        let graph = graph(num_nodes, &edges);
        let mut components = StronglyConnectedComponents::default();
        components.compute(&graph);

        assert_eq!(1, components.num_components());
    }

    #[test]
    fn reset_removes_previous_edges() {
        let mut graph = graph(2, &[(0, 1), (1, 0)]);
        graph.reset(2);
        let mut components = StronglyConnectedComponents::default();
        components.compute(&graph);

        assert_eq!(2, components.num_components());
    }
}
