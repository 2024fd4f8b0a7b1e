//! Directed graph view of a compiled process.
//!
//! [`ProcessGraph`] mirrors the resolved edges of a [`Diagram`] in a
//! `petgraph` graph so flow questions (loops, dead events) can be answered
//! with standard graph algorithms.

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    Direction,
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, EdgeRef},
};

use tagflow_core::{
    layout::{Diagram, ObjectId, ObjectKind},
    semantic::{EventKind, TargetSlot},
};

/// Object-level flow graph.
///
/// Every layout object becomes a node weighted with its [`ObjectId`]; every
/// resolved edge becomes a graph edge weighted with its [`TargetSlot`].
#[derive(Debug)]
pub struct ProcessGraph {
    graph: DiGraph<ObjectId, TargetSlot>,
    nodes: IndexMap<ObjectId, NodeIndex>,
    kinds: IndexMap<ObjectId, ObjectKind>,
}

impl ProcessGraph {
    /// Builds the graph from a finished diagram.
    pub fn new(diagram: &Diagram) -> Self {
        let mut graph = DiGraph::with_capacity(diagram.objects().len(), diagram.edges().len());
        let mut nodes = IndexMap::with_capacity(diagram.objects().len());
        let mut kinds = IndexMap::with_capacity(diagram.objects().len());

        for (id, object) in diagram.iter() {
            nodes.insert(id, graph.add_node(id));
            kinds.insert(id, object.kind());
        }

        for edge in diagram.edges() {
            let (Some(&from), Some(&to)) = (nodes.get(&edge.from()), nodes.get(&edge.to())) else {
                continue;
            };
            trace!(from:% = edge.from(), to:% = edge.to(), slot:% = edge.slot(); "Graph edge");
            graph.add_edge(from, to, edge.slot());
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Process graph built"
        );

        Self {
            graph,
            nodes,
            kinds,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Objects `id` points at, ordered by slot.
    pub fn successors(&self, id: ObjectId) -> Vec<(ObjectId, TargetSlot)> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut successors: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| (self.graph[edge.target()], *edge.weight()))
            .collect();
        successors.sort_by_key(|&(target, slot)| (slot, target));
        successors
    }

    /// Objects pointing at `id`, ordered by id.
    pub fn predecessors(&self, id: ObjectId) -> Vec<ObjectId> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let mut predecessors: Vec<_> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|source| self.graph[source])
            .collect();
        predecessors.sort();
        predecessors.dedup();
        predecessors
    }

    /// Returns `true` if the flow loops back on itself anywhere.
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Events that no starter can reach, in document order.
    ///
    /// Starters are their own roots and never reported. Subprocess objects
    /// are not part of the flow and are skipped.
    pub fn unreachable_events(&self) -> Vec<ObjectId> {
        let mut dfs = Dfs::empty(&self.graph);
        for (id, _) in self
            .kinds
            .iter()
            .filter(|&(_, kind)| *kind == ObjectKind::Event(EventKind::Starter))
        {
            dfs.move_to(self.nodes[id]);
            while dfs.next(&self.graph).is_some() {}
        }

        self.kinds
            .iter()
            .filter(|&(_, kind)| matches!(kind, ObjectKind::Event(_)))
            .filter(|&(id, _)| !dfs.discovered.contains(self.nodes[id].index()))
            .map(|(&id, _)| id)
            .collect()
    }
}
