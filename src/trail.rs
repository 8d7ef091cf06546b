//! Back-linked records of a search.
//!
//! A [`Trail`] is an append-only arena of nodes. Every node points back to an
//! earlier node (or to nothing, for a root), so following back-links from any
//! node spells a path in reverse. The arena order doubles as the order in which
//! vertices were recorded.

use crate::cost::Cost;
use crate::graph::Coord;
use crate::graph::Graph;
use crate::graph::VertexId;

/// Index of a node within its [`Trail`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrailIndex(u32);

impl TrailIndex {
    #[inline(always)]
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TrailNode<C: Cost> {
    pub vertex: VertexId,
    /// Accumulated cost from the root this node descends from.
    pub g: C,
    /// An earlier node.
    pub back: Option<TrailIndex>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trail<C: Cost> {
    nodes: Vec<TrailNode<C>>,
}

impl<C: Cost> Trail<C> {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of recorded vertices.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Records a root vertex.
    pub fn push_root(&mut self, vertex: VertexId) -> TrailIndex {
        self.push_node(TrailNode {
            vertex,
            g: C::zero(),
            back: None,
        })
    }

    /// Records `vertex`, reached from the node at `back` with a step costing
    /// `step`. The new node becomes the head.
    ///
    /// NOTE: Panics when `back` comes from a longer trail.
    pub fn push(&mut self, vertex: VertexId, back: TrailIndex, step: C) -> TrailIndex {
        debug_assert!(back.as_usize() < self.nodes.len());
        let g = self.nodes[back.as_usize()].g.saturating_add(&step);
        self.push_node(TrailNode {
            vertex,
            g,
            back: Some(back),
        })
    }

    #[inline(always)]
    fn push_node(&mut self, node: TrailNode<C>) -> TrailIndex {
        debug_assert!(self.nodes.len() < u32::MAX as usize);
        let index = TrailIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    /// The most recently recorded node.
    pub fn head(&self) -> Option<TrailIndex> {
        self.nodes.len().checked_sub(1).map(|i| TrailIndex(i as u32))
    }

    pub fn node(&self, index: TrailIndex) -> Option<&TrailNode<C>> {
        self.nodes.get(index.as_usize())
    }

    /// Vertices in the order they were recorded.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = VertexId> + ExactSizeIterator + '_ {
        self.nodes.iter().map(|n| n.vertex)
    }

    /// Follows back-links from `index` to its root, yielding nodes in reverse.
    pub fn back_links(&self, index: TrailIndex) -> BackLinks<'_, C> {
        BackLinks {
            trail: self,
            next: Some(index),
        }
    }

    /// Reconstructs the path from the root to the node at `index`.
    ///
    /// NOTE: Panics when `index` comes from a longer trail.
    pub fn path(&self, index: TrailIndex) -> Path<C> {
        let cost = self.nodes[index.as_usize()].g;
        let mut vertices: Vec<VertexId> = self.back_links(index).map(|n| n.vertex).collect();
        vertices.reverse();
        Path::new(vertices, cost)
    }

    /// Coordinates of the recorded vertices, in recording order.
    pub fn coords<'a>(&'a self, graph: &'a Graph<C>) -> impl Iterator<Item = Coord> + 'a {
        self.iter().map(|v| graph.coord(v))
    }
}

impl<C: Cost> Default for Trail<C> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct BackLinks<'a, C: Cost> {
    trail: &'a Trail<C>,
    next: Option<TrailIndex>,
}

impl<'a, C: Cost> Iterator for BackLinks<'a, C> {
    type Item = &'a TrailNode<C>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.trail.node(self.next?)?;
        debug_assert!(node.back.is_none_or(|b| Some(b) < self.next));
        self.next = node.back;
        Some(node)
    }
}

/// A walk from a start vertex to an end vertex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<C: Cost> {
    vertices: Vec<VertexId>,
    cost: C,
}

impl<C: Cost> Path<C> {
    pub(crate) fn new(vertices: Vec<VertexId>, cost: C) -> Self {
        debug_assert!(!vertices.is_empty());
        Self { vertices, cost }
    }

    /// Rebuilds a path by walking a predecessor table back from `end`.
    ///
    /// `predecessor(v)` gives the vertex `v` was reached from and the cost of
    /// that step.
    pub(crate) fn from_predecessors<F>(end: VertexId, mut predecessor: F) -> Self
    where
        F: FnMut(VertexId) -> Option<(VertexId, C)>,
    {
        let mut vertices = vec![end];
        let mut cost = C::zero();
        let mut v = end;
        while let Some((parent, step)) = predecessor(v) {
            debug_assert!(parent != v);
            vertices.push(parent);
            cost = cost.saturating_add(&step);
            v = parent;
        }
        vertices.reverse();
        Self { vertices, cost }
    }

    /// Number of steps, one less than the number of vertices.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Whether the path doesn't move at all.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn cost(&self) -> C {
        self.cost
    }

    pub fn start(&self) -> VertexId {
        self.vertices[0]
    }

    pub fn end(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = VertexId> + ExactSizeIterator + '_ {
        self.vertices.iter().copied()
    }

    pub fn coords<'a>(&'a self, graph: &'a Graph<C>) -> impl Iterator<Item = Coord> + 'a {
        self.iter().map(|v| graph.coord(v))
    }

    /// Checks every step is an edge of `graph` and the cost adds up.
    pub fn valid_in(&self, graph: &Graph<C>) -> bool {
        let mut cost = C::zero();
        for pair in self.vertices.windows(2) {
            match graph.edge_weight(pair[0], pair[1]) {
                Some(w) => cost = cost.saturating_add(&w),
                None => return false,
            }
        }
        cost == self.cost
    }
}

impl<C: Cost> std::fmt::Display for Path<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Path({}, {}:{:?}:{})",
            self.cost,
            self.start(),
            self.vertices.iter().take(20).collect::<Vec<_>>(),
            self.end()
        )
    }
}
