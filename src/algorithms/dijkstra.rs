//! Implementation of Dijkstra's path-finding algorithm.

use crate::cost::Cost;
use crate::data_structures::intrusive_heap::IntrusiveHeap;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::search::Search;
use crate::search::SearchError;
use crate::search::SearchNodes;
use crate::search::check_endpoints;
use crate::trail::Path;

/// The ranking value for Dijkstra
///
/// We prefer better g-values, and tie break towards whoever got its g-value
/// first.
///
/// ```
/// use gridsearch::algorithms::dijkstra::DijkstraRank;
///
/// assert!(DijkstraRank::new(3u32, 9) < DijkstraRank::new(4u32, 0));
/// assert!(DijkstraRank::new(3u32, 0) < DijkstraRank::new(3u32, 1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct DijkstraRank<C: Cost> {
    g: C,
    order: u64,
}

impl<C: Cost> DijkstraRank<C> {
    pub fn new(g: C, order: u64) -> Self {
        Self { g, order }
    }
    pub fn g(&self) -> C {
        self.g
    }
}

/// Dijkstra search from one vertex to another.
///
/// Vertices are expanded by increasing distance from the start. Each vertex is
/// expanded at most once, and the search stops when the goal is taken off the
/// frontier, so the returned path is a cheapest one.
#[derive(Debug)]
pub struct DijkstraSearch<'g, C: Cost> {
    graph: &'g Graph<C>,
    start: VertexId,
    goal: VertexId,

    /// Frontier. Reaching a queued vertex through a better parent re-ranks it
    /// in place.
    open: IntrusiveHeap<VertexId, DijkstraRank<C>>,
    nodes: SearchNodes<C>,
    /// Hands out tie-breakers, in the order g-values are set.
    order: u64,
    expanded: usize,

    outcome: Option<Result<Path<C>, SearchError>>,
}

impl<'g, C: Cost> DijkstraSearch<'g, C> {
    /// Initialises the Search
    pub fn new(graph: &'g Graph<C>, start: VertexId, goal: VertexId) -> Result<Self, SearchError> {
        check_endpoints(graph, start, goal)?;
        let n = graph.vertex_count();

        let mut search = Self {
            graph,
            start,
            goal,
            open: IntrusiveHeap::new(n),
            nodes: SearchNodes::new(n),
            order: 0,
            expanded: 0,
            outcome: None,
        };
        search.reach(start, None, C::zero());
        Ok(search)
    }

    fn run(&mut self) -> Result<Path<C>, SearchError> {
        let graph = self.graph;

        while let Some(heap_node) = self.open.pop() {
            let v = heap_node.item;
            let g = heap_node.rank.g();
            debug_assert!(!self.nodes.is_closed(v));
            debug_assert_eq!(g, self.nodes.g(v));

            self.nodes.close(v);
            self.expanded += 1;
            log::trace!("Dijkstra expands {v} ({}) at g={g}", graph.coord(v));

            if v == self.goal {
                return Ok(self.nodes.path(v));
            }

            for e in graph.edges(v) {
                if self.nodes.is_closed(e.to) {
                    continue;
                }
                let new_g = g.saturating_add(&e.weight);
                if new_g < self.nodes.g(e.to) {
                    self.reach(e.to, Some(v), new_g);
                }
            }
        }

        Err(SearchError::NoPathFound {
            start: self.start,
            goal: self.goal,
        })
    }

    /// Records a better way of getting to `v`, queueing or re-ranking it.
    fn reach(&mut self, v: VertexId, parent: Option<VertexId>, g: C) {
        self.nodes.reach(v, parent, g);
        let rank = DijkstraRank::new(g, self.order);
        self.order += 1;
        if self.open.improve(v, rank).is_none() {
            self.open.push(v, rank);
        }
    }
}

impl<C: Cost> Search<C> for DijkstraSearch<'_, C> {
    fn find_path(&mut self) -> Result<Path<C>, SearchError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.run();
        match &outcome {
            Ok(path) => log::debug!(
                "Dijkstra found a path of {} steps (cost {}) expanding {} vertices",
                path.len(),
                path.cost(),
                self.expanded
            ),
            Err(e) => log::debug!("Dijkstra gave up after {} expansions: {e}", self.expanded),
        }
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
}
