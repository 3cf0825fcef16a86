//! Path representation.

/// One step of a path: a node and the cost of reaching it from its
/// predecessor on the path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathMember {
    /// Id of the node.
    pub node: u32,
    /// Layer cost of the edge from the previous member. The first
    /// member's cost is 0.
    pub cost_from_parent: f32,
}

/// An ordered sequence of nodes from a start to an end.
///
/// # Example
///
/// ```
/// use route_dijkstra::{Path, PathMember};
///
/// let path = Path::new(vec![
///     PathMember { node: 4, cost_from_parent: 0.0 },
///     PathMember { node: 7, cost_from_parent: 1.5 },
///     PathMember { node: 2, cost_from_parent: 0.5 },
/// ]);
/// assert_eq!(path.len(), 3);
/// assert!((path.total_cost() - 2.0).abs() < 1e-6);
/// assert_eq!(path.nodes().collect::<Vec<_>>(), vec![4, 7, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    members: Vec<PathMember>,
}

impl Path {
    /// Create a path from its members.
    #[must_use]
    pub const fn new(members: Vec<PathMember>) -> Self {
        Self { members }
    }

    /// The path's members, start first.
    #[must_use]
    pub fn members(&self) -> &[PathMember] {
        &self.members
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` for a path with no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the node ids along the path.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.members.iter().map(|m| m.node)
    }

    /// Total traversal cost: the sum of every member's
    /// `cost_from_parent`.
    #[must_use]
    pub fn total_cost(&self) -> f32 {
        self.members.iter().map(|m| m.cost_from_parent).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_path() {
        let path = Path::new(Vec::new());
        assert!(path.is_empty());
        assert_eq!(path.total_cost(), 0.0);
    }

    #[test]
    fn cost_sums_members() {
        let path = Path::new(vec![
            PathMember {
                node: 0,
                cost_from_parent: 0.0,
            },
            PathMember {
                node: 3,
                cost_from_parent: 2.0,
            },
            PathMember {
                node: 1,
                cost_from_parent: 0.25,
            },
        ]);
        assert!((path.total_cost() - 2.25).abs() < 1e-6);
        assert_eq!(path.len(), 3);
    }
}
