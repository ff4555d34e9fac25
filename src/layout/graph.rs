//! Layout domain: the abstract level graph that generation lays out.

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub name: String,
}

/// An edge of the level graph. Corridor rooms carry a copy of the edge they
/// materialize; the graph stays the owner of the edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub to: NodeId,
}

impl Connection {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }

    /// The other endpoint, if `node` is one of the two.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.from == node {
            Some(self.to)
        } else if self.to == node {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelGraph {
    nodes: Vec<GraphNode>,
    connections: Vec<Connection>,
}

impl LevelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(GraphNode {
            id,
            name: name.into(),
        });
        id
    }

    /// Connect two rooms. Connecting a pair twice returns the existing edge.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Connection {
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.touches(a) && c.other(a) == Some(b))
        {
            return *existing;
        }
        let connection = Connection::new(a, b);
        self.connections.push(connection);
        connection
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.connections.iter().filter_map(move |c| c.other(id))
    }

    /// A straight run of `count` rooms.
    pub fn chain(count: u32) -> Self {
        let mut graph = Self::new();
        let mut previous = None;
        for i in 0..count {
            let id = graph.add_room(format!("room_{i}"));
            if let Some(prev) = previous {
                graph.connect(prev, id);
            }
            previous = Some(id);
        }
        graph
    }

    /// A random tree of `count` rooms: every new room hangs off one of the
    /// earlier rooms that still has fewer than three connections.
    pub fn branching<R: Rng>(count: u32, rng: &mut R) -> Self {
        let mut graph = Self::new();
        for i in 0..count {
            let id = graph.add_room(format!("room_{i}"));
            if i == 0 {
                continue;
            }
            let open: Vec<NodeId> = (0..i)
                .map(NodeId)
                .filter(|n| graph.neighbors(*n).count() < 3)
                .collect();
            // The previous room has exactly one connection, so `open` is never empty.
            let parent = open[rng.random_range(0..open.len())];
            graph.connect(parent, id);
        }
        graph
    }
}
