//! Depth-first search with an explicit stack.

use crate::cost::Cost;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::search::Explore;
use crate::search::Search;
use crate::search::SearchError;
use crate::search::check_endpoints;
use crate::trail::Path;
use crate::trail::Trail;
use crate::trail::TrailIndex;

/// Depth-first search.
///
/// Neighbours are pushed in edge order, so the last edge of a vertex is the
/// first one explored. A vertex is visited when popped; vertices already
/// visited are skipped. The returned path is the first one found, not
/// necessarily the shortest.
#[derive(Debug)]
pub struct DepthFirstSearch<'g, C: Cost> {
    graph: &'g Graph<C>,
    start: VertexId,
    goal: VertexId,

    stack: Vec<VertexId>,
    visited: Vec<bool>,
    /// Trail node of the vertex that last pushed each vertex, with the cost of
    /// that step.
    pushed_by: Vec<Option<(TrailIndex, C)>>,
    /// Every visited vertex, in visiting order.
    trail: Trail<C>,

    outcome: Option<Result<Path<C>, SearchError>>,
}

impl<'g, C: Cost> DepthFirstSearch<'g, C> {
    pub fn new(graph: &'g Graph<C>, start: VertexId, goal: VertexId) -> Result<Self, SearchError> {
        check_endpoints(graph, start, goal)?;
        let n = graph.vertex_count();

        Ok(Self {
            graph,
            start,
            goal,
            stack: vec![start],
            visited: vec![false; n],
            pushed_by: vec![None; n],
            trail: Trail::new(),
            outcome: None,
        })
    }

    fn run(&mut self) -> Result<Path<C>, SearchError> {
        let graph = self.graph;

        while let Some(v) = self.stack.pop() {
            if self.visited[v.index()] {
                continue;
            }
            self.visited[v.index()] = true;

            let node = match self.pushed_by[v.index()] {
                Some((back, step)) => self.trail.push(v, back, step),
                None => self.trail.push_root(v),
            };
            log::trace!("DFS visits {v} ({})", graph.coord(v));

            if v == self.goal {
                return Ok(self.trail.path(node));
            }

            for e in graph.edges(v) {
                if !self.visited[e.to.index()] {
                    self.pushed_by[e.to.index()] = Some((node, e.weight));
                    self.stack.push(e.to);
                }
            }
        }

        Err(SearchError::NoPathFound {
            start: self.start,
            goal: self.goal,
        })
    }
}

impl<C: Cost> Search<C> for DepthFirstSearch<'_, C> {
    fn find_path(&mut self) -> Result<Path<C>, SearchError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.run();
        match &outcome {
            Ok(path) => log::debug!(
                "DFS found a path of {} steps (cost {}) visiting {} vertices",
                path.len(),
                path.cost(),
                self.trail.len()
            ),
            Err(e) => log::debug!("DFS gave up after {} vertices: {e}", self.trail.len()),
        }
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn expanded(&self) -> usize {
        self.trail.len()
    }
}

impl<C: Cost> Explore<C> for DepthFirstSearch<'_, C> {
    fn trail(&self) -> &Trail<C> {
        &self.trail
    }

    fn into_trail(self) -> Trail<C> {
        self.trail
    }
}
