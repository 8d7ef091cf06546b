//! The contract every search strategy follows, and the bookkeeping the
//! weighted ones share.

use thiserror::Error;

use crate::cost::Cost;
use crate::graph::Graph;
use crate::graph::GraphError;
use crate::graph::VertexId;
use crate::trail::Path;
use crate::trail::Trail;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The frontier ran dry before reaching the goal.
    #[error("No path from {start} to {goal}")]
    NoPathFound { start: VertexId, goal: VertexId },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A search from one start vertex to one goal vertex.
///
/// Searches run to completion on the first call; later calls hand back the
/// same outcome.
pub trait Search<C: Cost> {
    fn find_path(&mut self) -> Result<Path<C>, SearchError>;

    /// Number of vertices expanded so far.
    fn expanded(&self) -> usize;
}

/// A search that keeps the order in which it visited vertices.
pub trait Explore<C: Cost>: Search<C> {
    fn trail(&self) -> &Trail<C>;

    fn into_trail(self) -> Trail<C>
    where
        Self: Sized;
}

/// Checks both endpoints belong to `graph`.
pub(crate) fn check_endpoints<C: Cost>(
    graph: &Graph<C>,
    start: VertexId,
    goal: VertexId,
) -> Result<(), SearchError> {
    graph.check(start)?;
    graph.check(goal)?;
    Ok(())
}

/// Per-vertex search bookkeeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Node<C: Cost> {
    pub(crate) parent: Option<VertexId>,
    pub(crate) g: C,
    pub(crate) is_closed: bool,
}

impl<C: Cost> Node<C> {
    fn unseen() -> Self {
        Self {
            parent: None,
            g: C::infinity(),
            is_closed: false,
        }
    }

    /// Gives this Node a better path through a new parent.
    fn reach(&mut self, parent: Option<VertexId>, g: C) {
        debug_assert!(g < self.g);
        debug_assert!(!self.is_closed);
        self.parent = parent;
        self.g = g;
    }
}

/// Search nodes of every vertex in a graph, indexed by [`VertexId`].
///
/// Parent links only ever point to vertices with a smaller `g`, so they form
/// a forest rooted at the start.
#[derive(Clone, Debug)]
pub(crate) struct SearchNodes<C: Cost> {
    nodes: Vec<Node<C>>,
}

impl<C: Cost> SearchNodes<C> {
    pub(crate) fn new(num_vertices: usize) -> Self {
        Self {
            nodes: vec![Node::unseen(); num_vertices],
        }
    }

    #[inline(always)]
    pub(crate) fn g(&self, v: VertexId) -> C {
        self.nodes[v.index()].g
    }

    #[inline(always)]
    pub(crate) fn is_closed(&self, v: VertexId) -> bool {
        self.nodes[v.index()].is_closed
    }

    /// Marks a Search Node as Closed (expanded)
    #[inline(always)]
    pub(crate) fn close(&mut self, v: VertexId) {
        debug_assert!(self.g(v).valid(), "Tried closing {v} without reaching it");
        self.nodes[v.index()].is_closed = true;
    }

    #[inline(always)]
    pub(crate) fn reach(&mut self, v: VertexId, parent: Option<VertexId>, g: C) {
        self.nodes[v.index()].reach(parent, g);
    }

    pub(crate) fn path(&self, end: VertexId) -> Path<C> {
        Path::from_predecessors(end, |v| {
            let node = &self.nodes[v.index()];
            let parent = node.parent?;
            Some((parent, node.g - self.g(parent)))
        })
    }
}
