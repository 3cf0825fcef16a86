//! Bounding volume hierarchy over scene triangles.
//!
//! Median-split construction on the longest axis, with parallel
//! construction of large subtrees.

use geom_types::Aabb;
use smallvec::SmallVec;

/// Subtrees with at least this many triangles are built on both rayon
/// branches of a join.
pub(crate) const PARALLEL_BUILD_THRESHOLD: usize = 4096;

/// Maximum triangles stored per leaf.
pub(crate) const MAX_LEAF_SIZE: usize = 8;

/// BVH node containing either leaf triangles or child nodes.
#[derive(Debug)]
pub(crate) enum BvhNode {
    /// Leaf node containing scene-triangle indices.
    Leaf {
        /// Bounding box of all triangles in this leaf.
        bbox: Aabb,
        /// Scene-triangle indices stored in this leaf.
        triangles: SmallVec<[u32; 8]>,
    },
    /// Internal node with two children.
    Internal {
        /// Bounding box of all triangles in this subtree.
        bbox: Aabb,
        /// Left child node.
        left: Box<Self>,
        /// Right child node.
        right: Box<Self>,
    },
}

impl BvhNode {
    /// Get the bounding box of this node.
    pub(crate) fn bbox(&self) -> &Aabb {
        match self {
            Self::Leaf { bbox, .. } | Self::Internal { bbox, .. } => bbox,
        }
    }

    /// Build a subtree over `indices` (indices into `boxes`).
    pub(crate) fn build(boxes: &[Aabb], indices: Vec<usize>, parallel: bool) -> Self {
        let mut bbox = Aabb::empty();
        for &i in &indices {
            bbox.expand(&boxes[i]);
        }

        if indices.len() <= MAX_LEAF_SIZE {
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: scenes with >4B triangles are unsupported
            let triangles: SmallVec<[u32; 8]> = indices.iter().map(|&i| i as u32).collect();
            return Self::Leaf { bbox, triangles };
        }

        // Split along the longest axis at the median triangle center
        let axis = bbox.longest_axis();
        let mut sorted = indices;
        sorted.sort_by(|&a, &b| {
            let ca = boxes[a].center();
            let cb = boxes[b].center();
            let (va, vb) = match axis {
                0 => (ca.x, cb.x),
                1 => (ca.y, cb.y),
                _ => (ca.z, cb.z),
            };
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = sorted.len() / 2;
        let right_indices = sorted.split_off(mid);
        let left_indices = sorted;

        let (left, right) = if parallel
            && (left_indices.len() >= PARALLEL_BUILD_THRESHOLD
                || right_indices.len() >= PARALLEL_BUILD_THRESHOLD)
        {
            rayon::join(
                || Self::build(boxes, left_indices, parallel),
                || Self::build(boxes, right_indices, parallel),
            )
        } else {
            (
                Self::build(boxes, left_indices, false),
                Self::build(boxes, right_indices, false),
            )
        };

        Self::Internal {
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Count leaves and maximum depth, for build diagnostics.
    pub(crate) fn stats(&self) -> (usize, usize) {
        match self {
            Self::Leaf { .. } => (1, 1),
            Self::Internal { left, right, .. } => {
                let (ll, ld) = left.stats();
                let (rl, rd) = right.stats();
                (ll + rl, 1 + ld.max(rd))
            }
        }
    }
}
