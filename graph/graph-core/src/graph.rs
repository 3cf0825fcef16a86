//! The spatial graph: tolerance-keyed nodes over multi-layer CSR edges.

use geom_types::{Point3, PointKey, DEFAULT_TOLERANCE};
use hashbrown::HashMap;
use tracing::debug;

use crate::csr::{Csr, CsrView};
use crate::error::GraphError;
use crate::node::{Edge, EdgeSet, LinkedEdge, Node, NodeKind};

/// Name of the default (geometric distance) cost layer.
pub const DEFAULT_LAYER: &str = "";

/// How to reduce a node's incident edge weights to one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostAggregation {
    /// Sum of edge weights.
    Sum,
    /// Mean edge weight. Nodes with no incident edges score 0.
    Average,
    /// Number of incident edges.
    Count,
}

/// A graph of positions connected by directed weighted edges.
///
/// Nodes are keyed both ways: by position (under an absolute tolerance)
/// and by the dense id the graph assigns on first sight. All interior
/// algorithms work on ids; positions are a lookup façade.
///
/// Edges live in one or more cost layers. The default layer stores
/// geometric distance; alternate layers (energy, cross-slope, …) share
/// the default layer's (parent, child) topology and may be sparser but
/// never introduce new pairs.
///
/// # Compression
///
/// `add_edge` stages triplets; [`Graph::compress`] merges them into the
/// CSR, with the **last written** weight winning on duplicate
/// (parent, child) pairs. Edge queries, [`Graph::edges`] and
/// [`Graph::aggregate`] require a compressed graph.
///
/// # Example
///
/// ```
/// use graph_core::Graph;
/// use geom_types::Point3;
///
/// let mut graph = Graph::new();
/// let a = Point3::new(0.0, 0.0, 0.0);
/// let b = Point3::new(3.0, 4.0, 0.0);
/// graph.add_edge(a, b, 5.0).unwrap();
/// graph.compress();
///
/// let view = graph.csr_view("").unwrap();
/// assert_eq!(view.nnz, 1);
/// assert_eq!(view.rows, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    ordered_nodes: Vec<Node>,
    id_map: HashMap<PointKey, u32>,
    tolerance: f32,
    default_csr: Csr,
    alt_csrs: HashMap<String, Csr>,
    pending: Vec<(u32, u32, f32)>,
    needs_compression: bool,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with the default position tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    /// Create an empty graph with a custom position tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            ordered_nodes: Vec::new(),
            id_map: HashMap::new(),
            tolerance,
            default_csr: Csr::empty(0, 0),
            alt_csrs: HashMap::new(),
            pending: Vec::new(),
            needs_compression: true,
        }
    }

    /// Build a compressed graph from parallel node/edge/distance arrays.
    ///
    /// `edges[i]` lists the ids of the children of `nodes[i]` and
    /// `distances[i]` the matching weights.
    ///
    /// # Errors
    ///
    /// [`GraphError::ShapeMismatch`] when the outer or inner array
    /// lengths disagree, [`GraphError::DuplicateNode`] when two input
    /// nodes collapse under the tolerance, [`GraphError::UnknownId`] for
    /// a child id past the node list, and [`GraphError::InvalidWeight`]
    /// for non-finite weights.
    ///
    /// # Example
    ///
    /// ```
    /// use graph_core::Graph;
    /// use geom_types::Point3;
    ///
    /// let nodes = [
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    /// ];
    /// let edges = [vec![1, 2], vec![2], vec![]];
    /// let distances = [vec![1.0, 2.0], vec![1.0], vec![]];
    ///
    /// let graph = Graph::from_parts(&nodes, &edges, &distances).unwrap();
    /// assert_eq!(graph.len(), 3);
    /// assert!(graph.has_edge_by_id(0, 2, false).unwrap());
    /// ```
    pub fn from_parts(
        nodes: &[Point3<f32>],
        edges: &[Vec<u32>],
        distances: &[Vec<f32>],
    ) -> Result<Self, GraphError> {
        if edges.len() != nodes.len() {
            return Err(GraphError::ShapeMismatch {
                expected: nodes.len(),
                actual: edges.len(),
            });
        }
        if distances.len() != nodes.len() {
            return Err(GraphError::ShapeMismatch {
                expected: nodes.len(),
                actual: distances.len(),
            });
        }

        let mut graph = Self::new();
        for (index, position) in nodes.iter().enumerate() {
            let id = graph.get_or_assign_id(*position);
            if id as usize != index {
                return Err(GraphError::DuplicateNode { index });
            }
        }
        for (parent, (children, weights)) in edges.iter().zip(distances).enumerate() {
            if children.len() != weights.len() {
                return Err(GraphError::ShapeMismatch {
                    expected: children.len(),
                    actual: weights.len(),
                });
            }
            #[allow(clippy::cast_possible_truncation)]
            // Truncation: node count already fits u32 by construction
            let parent = parent as u32;
            for (&child, &weight) in children.iter().zip(weights) {
                graph.add_edge_by_id(parent, child, weight)?;
            }
        }
        graph.compress();
        Ok(graph)
    }

    /// The id for a position, assigning the next dense id if it is new.
    pub fn get_or_assign_id(&mut self, position: Point3<f32>) -> u32 {
        self.add_node(position, NodeKind::Walkable)
    }

    /// The id for a position, creating a node of `kind` if it is new.
    ///
    /// The kind of an existing node is left unchanged.
    pub fn add_node(&mut self, position: Point3<f32>, kind: NodeKind) -> u32 {
        let key = PointKey::quantize(&position, self.tolerance);
        if let Some(&id) = self.id_map.get(&key) {
            return id;
        }
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: graphs beyond u32 nodes are outside the interop contract
        let id = self.ordered_nodes.len() as u32;
        self.ordered_nodes.push(Node { position, id, kind });
        self.id_map.insert(key, id);
        id
    }

    /// Stage a directed edge between two positions.
    ///
    /// Nodes are created as needed. The edge lands in the CSR on the next
    /// [`Graph::compress`].
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidWeight`] when the weight is NaN or infinite.
    pub fn add_edge(
        &mut self,
        parent: Point3<f32>,
        child: Point3<f32>,
        weight: f32,
    ) -> Result<(), GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::InvalidWeight(weight));
        }
        let parent = self.get_or_assign_id(parent);
        let child = self.get_or_assign_id(child);
        self.pending.push((parent, child, weight));
        self.needs_compression = true;
        Ok(())
    }

    /// Stage a directed edge between two already-assigned ids.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownId`] when either id was never assigned by
    /// this graph, [`GraphError::InvalidWeight`] for NaN or infinite
    /// weights.
    pub fn add_edge_by_id(&mut self, parent: u32, child: u32, weight: f32) -> Result<(), GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::InvalidWeight(weight));
        }
        let count = self.ordered_nodes.len();
        if parent as usize >= count {
            return Err(GraphError::UnknownId(parent));
        }
        if child as usize >= count {
            return Err(GraphError::UnknownId(child));
        }
        self.pending.push((parent, child, weight));
        self.needs_compression = true;
        Ok(())
    }

    /// Merge staged edges into the CSR.
    ///
    /// Duplicate (parent, child) pairs keep the last staged weight. The
    /// pending list is emptied but the graph remains mutable; compressing
    /// an already-compressed graph is a no-op, so compression is
    /// idempotent. Alternate layers are grown to the new shape.
    pub fn compress(&mut self) {
        if !self.needs_compression {
            return;
        }
        let n = self.ordered_nodes.len();

        let mut triplets = self.default_csr.to_triplets();
        triplets.append(&mut self.pending);
        self.default_csr = Csr::from_triplets(n, n, triplets);

        for csr in self.alt_csrs.values_mut() {
            csr.grow(n, n);
        }

        self.needs_compression = false;
        debug!(
            nodes = n,
            edges = self.default_csr.nnz(),
            layers = self.alt_csrs.len(),
            "compressed graph"
        );
    }

    /// Returns `true` once all staged edges are merged.
    #[must_use]
    pub const fn is_compressed(&self) -> bool {
        !self.needs_compression
    }

    fn require_compressed(&self) -> Result<(), GraphError> {
        if self.needs_compression {
            return Err(GraphError::Uncompressed);
        }
        Ok(())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered_nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered_nodes.is_empty()
    }

    /// All nodes, ordered by id.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.ordered_nodes
    }

    /// All node positions as flat float triples, ordered by id.
    #[must_use]
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.ordered_nodes
            .iter()
            .map(|n| [n.position.x, n.position.y, n.position.z])
            .collect()
    }

    /// The id of the node at `position`, if one exists under the
    /// tolerance.
    #[must_use]
    pub fn id_of(&self, position: &Point3<f32>) -> Option<u32> {
        let key = PointKey::quantize(position, self.tolerance);
        self.id_map.get(&key).copied()
    }

    /// Returns `true` if a node exists at `position` under the tolerance.
    #[must_use]
    pub fn contains(&self, position: &Point3<f32>) -> bool {
        self.id_of(position).is_some()
    }

    /// The node with the given id.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownId`] when the id was never assigned.
    pub fn node_from_id(&self, id: u32) -> Result<&Node, GraphError> {
        self.ordered_nodes
            .get(id as usize)
            .ok_or(GraphError::UnknownId(id))
    }

    /// The graph's position tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Check whether an edge exists between two positions.
    ///
    /// With `undirected` set, the reverse direction also counts. Unknown
    /// positions report `false` rather than an error.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged.
    pub fn has_edge(
        &self,
        parent: &Point3<f32>,
        child: &Point3<f32>,
        undirected: bool,
    ) -> Result<bool, GraphError> {
        self.require_compressed()?;
        match (self.id_of(parent), self.id_of(child)) {
            (Some(p), Some(c)) => self.has_edge_by_id(p, c, undirected),
            _ => Ok(false),
        }
    }

    /// Check whether an edge exists between two ids.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged.
    pub fn has_edge_by_id(
        &self,
        parent: u32,
        child: u32,
        undirected: bool,
    ) -> Result<bool, GraphError> {
        self.require_compressed()?;
        Ok(self.default_csr.contains(parent, child)
            || (undirected && self.default_csr.contains(child, parent)))
    }

    /// Every node's outgoing edges, in id form.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged.
    pub fn edges(&self) -> Result<Vec<EdgeSet>, GraphError> {
        self.require_compressed()?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        // Truncation/sign: ids originate from u32 assignment
        let sets = (0..self.ordered_nodes.len())
            .map(|parent| {
                let (cols, vals) = self.default_csr.row(parent);
                EdgeSet {
                    parent: parent as u32,
                    children: cols
                        .iter()
                        .zip(vals)
                        .map(|(&child, &weight)| LinkedEdge {
                            child: child as u32,
                            weight,
                        })
                        .collect(),
                }
            })
            .collect();
        Ok(sets)
    }

    /// Outgoing edges of the node at `position`, resolved to child nodes.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged and
    /// [`GraphError::NodeNotFound`] when no node exists at `position`.
    pub fn edges_from(&self, position: &Point3<f32>) -> Result<Vec<Edge>, GraphError> {
        self.require_compressed()?;
        let id = self.id_of(position).ok_or(GraphError::NodeNotFound {
            x: position.x,
            y: position.y,
            z: position.z,
        })?;
        Ok(self.resolved_row(id))
    }

    /// Outgoing and incoming edges of the node at `position`.
    ///
    /// Incoming edges are reported with their source node as `child`, so
    /// the result is the node's full undirected neighborhood. A pair
    /// connected in both directions appears once, with the outgoing
    /// weight.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged and
    /// [`GraphError::NodeNotFound`] when no node exists at `position`.
    pub fn undirected_edges(&self, position: &Point3<f32>) -> Result<Vec<Edge>, GraphError> {
        self.require_compressed()?;
        let id = self.id_of(position).ok_or(GraphError::NodeNotFound {
            x: position.x,
            y: position.y,
            z: position.z,
        })?;

        let mut result = self.resolved_row(id);
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: node count fits u32 by construction
        for parent in 0..self.ordered_nodes.len() as u32 {
            if parent == id || self.default_csr.contains(id, parent) {
                continue;
            }
            if let Some(weight) = self.default_csr.get(parent, id) {
                result.push(Edge {
                    child: self.ordered_nodes[parent as usize],
                    weight,
                });
            }
        }
        Ok(result)
    }

    #[allow(clippy::cast_sign_loss)]
    // Sign loss: column entries originate from u32 ids
    fn resolved_row(&self, id: u32) -> Vec<Edge> {
        let (cols, vals) = self.default_csr.row(id as usize);
        cols.iter()
            .zip(vals)
            .map(|(&child, &weight)| Edge {
                child: self.ordered_nodes[child as usize],
                weight,
            })
            .collect()
    }

    /// Reduce each node's incident default-layer edges to one score.
    ///
    /// With `directed` set, only outgoing edges count. Otherwise a node's
    /// edge set is the union of outgoing and incoming edges, with a pair
    /// connected in both directions counted once (outgoing weight wins).
    ///
    /// [`CostAggregation::Average`] over a node with no incident edges
    /// yields 0 by convention.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    // Casts: counts fit f32's integer range; ids originate from u32 assignment
    pub fn aggregate(
        &self,
        aggregation: CostAggregation,
        directed: bool,
    ) -> Result<Vec<f32>, GraphError> {
        self.require_compressed()?;
        let n = self.ordered_nodes.len();
        let mut sums = vec![0.0f32; n];
        let mut counts = vec![0u32; n];

        for parent in 0..n {
            let (cols, vals) = self.default_csr.row(parent);
            for (&child, &weight) in cols.iter().zip(vals) {
                sums[parent] += weight;
                counts[parent] += 1;
                if !directed {
                    // Count the incoming edge at the child unless the
                    // reverse direction already covers the pair
                    let child = child as usize;
                    if !self.default_csr.contains(child as u32, parent as u32) {
                        sums[child] += weight;
                        counts[child] += 1;
                    }
                }
            }
        }

        let scores = match aggregation {
            CostAggregation::Sum => sums,
            CostAggregation::Count => counts.iter().map(|&c| c as f32).collect(),
            CostAggregation::Average => sums
                .iter()
                .zip(&counts)
                .map(|(&s, &c)| if c == 0 { 0.0 } else { s / c as f32 })
                .collect(),
        };
        Ok(scores)
    }

    /// Attach a named cost layer over the default topology.
    ///
    /// Triplets must reference (parent, child) pairs present in the
    /// default layer; the layer may cover a subset of them. Duplicates
    /// keep the last weight. Re-attaching a name replaces the layer.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged,
    /// [`GraphError::ReservedLayer`] for the empty name,
    /// [`GraphError::InvalidWeight`] for non-finite weights, and
    /// [`GraphError::NoSuchEdge`] when a triplet's pair is missing from
    /// the default layer.
    pub fn attach_cost_layer(
        &mut self,
        name: &str,
        triplets: &[(u32, u32, f32)],
    ) -> Result<(), GraphError> {
        self.require_compressed()?;
        if name.is_empty() {
            return Err(GraphError::ReservedLayer);
        }
        for &(parent, child, weight) in triplets {
            if !weight.is_finite() {
                return Err(GraphError::InvalidWeight(weight));
            }
            if !self.default_csr.contains(parent, child) {
                return Err(GraphError::NoSuchEdge { parent, child });
            }
        }
        let n = self.ordered_nodes.len();
        let csr = Csr::from_triplets(n, n, triplets.to_vec());
        debug!(layer = name, edges = csr.nnz(), "attached cost layer");
        self.alt_csrs.insert(name.to_owned(), csr);
        Ok(())
    }

    /// Names of the attached alternate layers, sorted.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.alt_csrs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The CSR of a layer. The empty string names the default layer.
    ///
    /// # Errors
    ///
    /// [`GraphError::Uncompressed`] when edges are staged and
    /// [`GraphError::UnknownLayer`] for an unattached name.
    pub fn csr(&self, layer: &str) -> Result<&Csr, GraphError> {
        self.require_compressed()?;
        if layer == DEFAULT_LAYER {
            return Ok(&self.default_csr);
        }
        self.alt_csrs
            .get(layer)
            .ok_or_else(|| GraphError::UnknownLayer(layer.to_owned()))
    }

    /// Borrow a layer's raw CSR arrays for export.
    ///
    /// The view stays valid until the graph is next mutated.
    ///
    /// # Errors
    ///
    /// See [`Graph::csr`].
    pub fn csr_view(&self, layer: &str) -> Result<CsrView<'_>, GraphError> {
        Ok(self.csr(layer)?.view())
    }

    /// Compress if needed, then borrow a layer's raw CSR arrays.
    ///
    /// This is the interop export path: handing out pointers implies the
    /// caller wants the merged matrix, so staged edges are compressed
    /// first rather than reported as an error.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownLayer`] for an unattached name.
    pub fn export_csr(&mut self, layer: &str) -> Result<CsrView<'_>, GraphError> {
        self.compress();
        self.csr_view(layer)
    }

    /// Remove all nodes, edges, and layers.
    ///
    /// The graph returns to its freshly-constructed state and requires
    /// compression before queries.
    pub fn clear(&mut self) {
        self.ordered_nodes.clear();
        self.id_map.clear();
        self.default_csr = Csr::empty(0, 0);
        self.alt_csrs.clear();
        self.pending.clear();
        self.needs_compression = true;
    }
}
