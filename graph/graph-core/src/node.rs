//! Node and edge record types.

use geom_types::Point3;

/// Classification of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A position a walking agent can occupy. The default.
    #[default]
    Walkable,
    /// A point of interest added by the caller rather than the generator.
    PointOfInterest,
    /// Any other node classification.
    Other,
}

/// A graph node: a position plus the dense id the graph assigned to it.
///
/// Ids are non-negative and monotonically assigned from 0; a node's id
/// equals its index in [`Graph::nodes`].
///
/// [`Graph::nodes`]: crate::Graph::nodes
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Position in world space.
    pub position: Point3<f32>,
    /// Dense id assigned by the graph.
    pub id: u32,
    /// Node classification.
    pub kind: NodeKind,
}

impl Node {
    /// Create a walkable node.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f32>, id: u32) -> Self {
        Self {
            position,
            id,
            kind: NodeKind::Walkable,
        }
    }
}

/// An outgoing edge resolved to its child node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// The node this edge leads to.
    pub child: Node,
    /// Traversal cost from the parent.
    pub weight: f32,
}

/// An outgoing edge in id form.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkedEdge {
    /// Id of the child node.
    pub child: u32,
    /// Traversal cost from the parent.
    pub weight: f32,
}

/// All outgoing edges of one node, in id form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSet {
    /// Id of the parent node.
    pub parent: u32,
    /// Outgoing edges, ordered by child id.
    pub children: Vec<LinkedEdge>,
}
