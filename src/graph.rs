//! Immutable weighted graphs with dense vertex identities.
//!
//! Vertices are plain indices into vectors owned by the [`Graph`], so search
//! state can keep predecessor links as [`VertexId`]s without borrowing the
//! graph. Graphs are only assembled through a [`GraphBuilder`].

use derive_more::Display;
use nonmax::NonMaxU32;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cost::Cost;
use crate::data_structures::intrusive_heap::HeapItem;

/// Grid edges never exceed 4 per vertex.
const INLINE_EDGES: usize = 4;

/// A grid position, `(row, col)`, 0-based.
#[derive(Copy, Clone, Debug, Display, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("{row} {col}")]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    #[inline(always)]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn new_from_usize(row: usize, col: usize) -> Option<Self> {
        Some(Self {
            row: u32::try_from(row).ok()?,
            col: u32::try_from(col).ok()?,
        })
    }

    /// Number of unit steps between two positions when moving only along
    /// rows and columns.
    #[inline(always)]
    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Opaque identity of a vertex within one [`Graph`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(NonMaxU32);

impl VertexId {
    #[inline(always)]
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        Some(Self(NonMaxU32::new(index)?))
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0.get() as usize
    }
}

impl HeapItem for VertexId {
    #[inline(always)]
    fn slot(&self) -> usize {
        self.index()
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "v{}", self.0.get())
    }
}

/// A directed, weighted edge. Owned by its source vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Edge<C: Cost> {
    /// Where the edge leads.
    pub to: VertexId,
    /// Cost of entering `to`.
    pub weight: C,
}

#[derive(Clone, Debug)]
struct Vertex<C: Cost> {
    coord: Coord,
    edges: SmallVec<[Edge<C>; INLINE_EDGES]>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Vertex index {index} is out of range (graph has {len} vertices)")]
    OutOfRange { index: usize, len: usize },
    #[error("Edge {from}->{to} has invalid weight {weight}")]
    InvalidWeight {
        from: VertexId,
        to: VertexId,
        weight: String,
    },
    #[error("Graph is full")]
    TooManyVertices,
}

/// Read-only adjacency structure.
///
/// Every edge points to a vertex of the same graph and weighs at least one.
#[derive(Clone, Debug)]
pub struct Graph<C: Cost> {
    vertices: Vec<Vertex<C>>,
    num_edges: usize,
    /// Edges weighing less than the grid distance they span.
    num_shortcuts: usize,
}

/// Whether stepping from `from` to `to` costs less than walking between them
/// one cell at a time.
#[inline(always)]
fn is_shortcut<C: Cost>(from: Coord, to: Coord, weight: C) -> bool {
    let span = u64::from(from.manhattan_distance(&to));
    weight.to_u64().is_none_or(|w| w < span)
}

impl<C: Cost> Graph<C> {
    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline(always)]
    pub fn edge_count(&self) -> usize {
        self.num_edges
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Whether every edge weighs at least the grid distance between its
    /// endpoints, which keeps grid distances a consistent lower bound on path
    /// costs.
    #[inline(always)]
    pub fn is_grid_metric(&self) -> bool {
        self.num_shortcuts == 0
    }

    /// Looks up the vertex with the given index.
    pub fn vertex(&self, index: usize) -> Result<VertexId, GraphError> {
        if index >= self.vertices.len() {
            return Err(GraphError::OutOfRange {
                index,
                len: self.vertices.len(),
            });
        }
        VertexId::from_index(index).ok_or(GraphError::OutOfRange {
            index,
            len: self.vertices.len(),
        })
    }

    #[inline(always)]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertices.len()
    }

    /// Checks `v` belongs to this graph.
    pub fn check(&self, v: VertexId) -> Result<VertexId, GraphError> {
        self.vertex(v.index())
    }

    /// Outgoing edges of `v`, in the order they were added.
    ///
    /// NOTE: Panics when `v` comes from a bigger graph.
    #[inline(always)]
    pub fn edges(&self, v: VertexId) -> &[Edge<C>] {
        &self.vertices[v.index()].edges
    }

    /// NOTE: Panics when `v` comes from a bigger graph.
    #[inline(always)]
    pub fn coord(&self, v: VertexId) -> Coord {
        self.vertices[v.index()].coord
    }

    /// Finds the vertex placed at `coord`, if any.
    pub fn vertex_at(&self, coord: Coord) -> Option<VertexId> {
        // Builders add vertices row-major, so this is usually sorted.
        let index = match self
            .vertices
            .binary_search_by(|vertex| vertex.coord.cmp(&coord))
        {
            Ok(index) => Some(index),
            Err(_) => self.vertices.iter().position(|v| v.coord == coord),
        }?;
        VertexId::from_index(index)
    }

    /// Weight of the edge `from -> to`, if they are adjacent.
    pub fn edge_weight(&self, from: VertexId, to: VertexId) -> Option<C> {
        self.vertices
            .get(from.index())?
            .edges
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.weight)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).filter_map(VertexId::from_index)
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify(&self) {
        // All good... (hopefully)
    }
    #[cfg(feature = "verify")]
    pub(crate) fn verify(&self) {
        let mut num_edges = 0usize;
        let mut num_shortcuts = 0usize;
        for (i, vertex) in self.vertices.iter().enumerate() {
            for e in &vertex.edges {
                assert!(
                    e.to.index() < self.vertices.len(),
                    "Edge v{i}->{} leaves the graph",
                    e.to
                );
                assert!(e.weight.valid_step(), "Edge v{i}->{} weighs {}", e.to, e.weight);
                num_edges += 1;
                num_shortcuts += usize::from(is_shortcut(
                    vertex.coord,
                    self.vertices[e.to.index()].coord,
                    e.weight,
                ));
            }
        }
        assert_eq!(num_edges, self.num_edges);
        assert_eq!(num_shortcuts, self.num_shortcuts);
    }
}

/// Assembles a [`Graph`]. The only way to add vertices or edges.
#[derive(Debug)]
pub struct GraphBuilder<C: Cost> {
    vertices: Vec<Vertex<C>>,
    num_edges: usize,
    num_shortcuts: usize,
}

impl<C: Cost> GraphBuilder<C> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: vec![],
            num_edges: 0,
            num_shortcuts: 0,
        }
    }

    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            num_edges: 0,
            num_shortcuts: 0,
        }
    }

    #[inline(always)]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn add_vertex(&mut self, coord: Coord) -> Result<VertexId, GraphError> {
        let id = VertexId::from_index(self.vertices.len()).ok_or(GraphError::TooManyVertices)?;
        self.vertices.push(Vertex {
            coord,
            edges: SmallVec::new(),
        });
        Ok(id)
    }

    /// Adds the directed edge `from -> to`.
    ///
    /// Edges may connect any two vertices, but ones cheaper than the grid
    /// distance they span make the graph lose [`Graph::is_grid_metric`].
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: C) -> Result<(), GraphError> {
        let len = self.vertices.len();
        for v in [from, to] {
            if v.index() >= len {
                return Err(GraphError::OutOfRange {
                    index: v.index(),
                    len,
                });
            }
        }
        if !weight.valid_step() {
            return Err(GraphError::InvalidWeight {
                from,
                to,
                weight: weight.to_string(),
            });
        }

        let (a, b) = (self.vertices[from.index()].coord, self.vertices[to.index()].coord);
        if is_shortcut(a, b, weight) {
            log::trace!("Edge {from}->{to} weighs {weight} but spans {a} to {b}");
            self.num_shortcuts += 1;
        }
        self.vertices[from.index()].edges.push(Edge { to, weight });
        self.num_edges += 1;
        Ok(())
    }

    #[must_use]
    pub fn build(self) -> Graph<C> {
        let graph = Graph {
            vertices: self.vertices,
            num_edges: self.num_edges,
            num_shortcuts: self.num_shortcuts,
        };
        graph.verify();
        log::debug!(
            "Built graph with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        graph
    }
}

impl<C: Cost> Default for GraphBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: u32) -> Graph<u32> {
        let mut b = GraphBuilder::<u32>::new();
        let ids: Vec<VertexId> = (0..n)
            .map(|col| b.add_vertex(Coord::new(0, col)).unwrap())
            .collect();
        for pair in ids.windows(2) {
            b.add_edge(pair[0], pair[1], 1).unwrap();
            b.add_edge(pair[1], pair[0], 1).unwrap();
        }
        b.build()
    }

    #[test]
    fn vertex_lookup() {
        let g = line(3);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertex(2).unwrap().index(), 2);
        assert_eq!(
            g.vertex(3),
            Err(GraphError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn edges_keep_insertion_order() {
        let mut b = GraphBuilder::<u32>::new();
        let a = b.add_vertex(Coord::new(1, 1)).unwrap();
        let x = b.add_vertex(Coord::new(0, 1)).unwrap();
        let y = b.add_vertex(Coord::new(2, 1)).unwrap();
        b.add_edge(a, y, 2).unwrap();
        b.add_edge(a, x, 1).unwrap();
        let g = b.build();

        let to: Vec<VertexId> = g.edges(a).iter().map(|e| e.to).collect();
        assert_eq!(to, vec![y, x]);
        assert_eq!(g.edge_weight(a, y), Some(2));
        assert_eq!(g.edge_weight(a, x), Some(1));
        assert_eq!(g.edge_weight(x, a), None);
        assert!(g.edges(x).is_empty());
    }

    #[test]
    fn rejects_bad_edges() {
        let mut b = GraphBuilder::<u32>::new();
        let a = b.add_vertex(Coord::new(0, 0)).unwrap();
        let c = b.add_vertex(Coord::new(0, 1)).unwrap();
        let foreign = VertexId::from_index(7).unwrap();

        assert_eq!(
            b.add_edge(a, foreign, 1),
            Err(GraphError::OutOfRange { index: 7, len: 2 })
        );
        assert!(matches!(
            b.add_edge(a, c, 0),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert!(matches!(
            b.add_edge(a, c, u32::MAX),
            Err(GraphError::InvalidWeight { .. })
        ));
        assert_eq!(b.build().edge_count(), 0);
    }

    #[test]
    fn shortcuts_break_the_grid_metric() {
        assert!(line(3).is_grid_metric());

        let mut b = GraphBuilder::<u32>::new();
        let s = b.add_vertex(Coord::new(0, 0)).unwrap();
        let t = b.add_vertex(Coord::new(0, 1)).unwrap();
        let m = b.add_vertex(Coord::new(9, 9)).unwrap();
        b.add_edge(s, t, 5).unwrap();
        // Long but pricey
        b.add_edge(s, m, 18).unwrap();
        assert_eq!(b.num_shortcuts, 0);
        b.add_edge(m, t, 1).unwrap();
        let g = b.build();
        assert_eq!(g.edge_count(), 3);
        assert!(!g.is_grid_metric());
    }

    #[test]
    fn finds_vertices_by_coord() {
        let g = line(4);
        assert_eq!(g.vertex_at(Coord::new(0, 2)), g.vertex(2).ok());
        assert_eq!(g.vertex_at(Coord::new(1, 2)), None);
        assert_eq!(g.coord(g.vertex(3).unwrap()), Coord::new(0, 3));
    }

    #[test]
    fn coords() {
        let a = Coord::new(3, 9);
        let b = Coord::new(5, 1);
        assert_eq!(a.manhattan_distance(&b), 10);
        assert_eq!(b.manhattan_distance(&a), 10);
        assert_eq!(a.to_string(), "3 9");
    }
}
