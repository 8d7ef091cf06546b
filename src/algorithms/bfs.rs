//! Breadth-first search, optimising the number of steps.

use std::collections::VecDeque;

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

/// Breadth-first search.
///
/// Vertices are recorded when first discovered, which is also when they are
/// queued, so nothing is queued twice. The search stops as soon as the goal
/// is discovered. Edge weights are ignored for ordering: the path has the
/// fewest steps, not the lowest cost.
#[derive(Debug)]
pub struct BreadthFirstSearch<'g, C: Cost> {
    graph: &'g Graph<C>,
    start: VertexId,
    goal: VertexId,

    open: VecDeque<(VertexId, TrailIndex)>,
    discovered: Vec<bool>,
    /// Every discovered vertex, in discovery order.
    trail: Trail<C>,
    expanded: usize,

    outcome: Option<Result<Path<C>, SearchError>>,
}

impl<'g, C: Cost> BreadthFirstSearch<'g, C> {
    pub fn new(graph: &'g Graph<C>, start: VertexId, goal: VertexId) -> Result<Self, SearchError> {
        check_endpoints(graph, start, goal)?;

        Ok(Self {
            graph,
            start,
            goal,
            open: VecDeque::new(),
            discovered: vec![false; graph.vertex_count()],
            trail: Trail::new(),
            expanded: 0,
            outcome: None,
        })
    }

    fn run(&mut self) -> Result<Path<C>, SearchError> {
        let graph = self.graph;

        let root = self.trail.push_root(self.start);
        self.discovered[self.start.index()] = true;
        if self.start == self.goal {
            return Ok(self.trail.path(root));
        }
        self.open.push_back((self.start, root));

        while let Some((v, node)) = self.open.pop_front() {
            self.expanded += 1;
            log::trace!("BFS expands {v} ({})", graph.coord(v));

            for e in graph.edges(v) {
                if self.discovered[e.to.index()] {
                    continue;
                }
                self.discovered[e.to.index()] = true;

                let child = self.trail.push(e.to, node, e.weight);
                if e.to == self.goal {
                    return Ok(self.trail.path(child));
                }
                self.open.push_back((e.to, child));
            }
        }

        Err(SearchError::NoPathFound {
            start: self.start,
            goal: self.goal,
        })
    }
}

impl<C: Cost> Search<C> for BreadthFirstSearch<'_, C> {
    fn find_path(&mut self) -> Result<Path<C>, SearchError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.run();
        match &outcome {
            Ok(path) => log::debug!(
                "BFS found a path of {} steps (cost {}) discovering {} vertices",
                path.len(),
                path.cost(),
                self.trail.len()
            ),
            Err(e) => log::debug!("BFS gave up after {} vertices: {e}", self.trail.len()),
        }
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
}

impl<C: Cost> Explore<C> for BreadthFirstSearch<'_, C> {
    fn trail(&self) -> &Trail<C> {
        &self.trail
    }

    fn into_trail(self) -> Trail<C> {
        self.trail
    }
}
