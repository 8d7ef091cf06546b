//! A* search guided by a heuristic over grid positions.

use crate::cost::Cost;
use crate::data_structures::intrusive_heap::IntrusiveHeap;
use crate::graph::Coord;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::search::Search;
use crate::search::SearchError;
use crate::search::SearchNodes;
use crate::search::check_endpoints;
use crate::trail::Path;

/// Estimates the remaining cost between two positions.
///
/// Estimates must never exceed the actual cost, otherwise A* may settle for a
/// worse path.
pub trait Heuristic<C: Cost> {
    fn h(&self, from: Coord, to: Coord) -> C;
}

/// Grid distance, consistent on graphs where every edge weighs at least the
/// distance it spans ([`Graph::is_grid_metric`]).
#[derive(Copy, Clone, Debug, Default)]
pub struct ManhattanDistance;

impl<C> Heuristic<C> for ManhattanDistance
where
    C: Cost + num_traits::FromPrimitive,
{
    #[inline(always)]
    fn h(&self, from: Coord, to: Coord) -> C {
        // Underestimating keeps the search correct.
        C::from_u32(from.manhattan_distance(&to)).unwrap_or_else(C::zero)
    }
}

/// Any closure `(from, to) -> cost` works as a heuristic.
impl<C: Cost, F> Heuristic<C> for F
where
    F: Fn(Coord, Coord) -> C,
{
    #[inline(always)]
    fn h(&self, from: Coord, to: Coord) -> C {
        self(from, to)
    }
}

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h, then towards whoever
/// got its g-value first.
///
/// Keeping the raw h value helps to avoid recomputing it later.
///
/// ```
/// use gridsearch::algorithms::astar::AStarRank;
///
/// assert!(AStarRank::new(2u32, 0, 0) < AStarRank::new(2u32, 1, 0));
/// assert!(AStarRank::new(2u32, 0, 0) < AStarRank::new(0u32, 2, 0));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
    order: u64,
}

impl<C: Cost> AStarRank<C> {
    pub fn new(g: C, h: C, order: u64) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
            order,
        }
    }
    pub fn f(&self) -> C {
        self.f
    }
    pub fn h(&self) -> C {
        self.h
    }
}

/// A* search from one vertex to another.
///
/// Like Dijkstra, but vertices are expanded by their estimated total cost
/// `g + h`. With an admissible and consistent heuristic the returned path is a
/// cheapest one.
#[derive(Debug)]
pub struct AStarSearch<'g, C: Cost, H: Heuristic<C>> {
    graph: &'g Graph<C>,
    start: VertexId,
    goal: VertexId,
    heuristic: H,

    open: IntrusiveHeap<VertexId, AStarRank<C>>,
    nodes: SearchNodes<C>,
    order: u64,
    expanded: usize,

    outcome: Option<Result<Path<C>, SearchError>>,
}

impl<'g, C: Cost, H: Heuristic<C>> AStarSearch<'g, C, H> {
    /// Initialises the Search
    pub fn new(
        graph: &'g Graph<C>,
        start: VertexId,
        goal: VertexId,
        heuristic: H,
    ) -> Result<Self, SearchError> {
        check_endpoints(graph, start, goal)?;
        let n = graph.vertex_count();

        let mut search = Self {
            graph,
            start,
            goal,
            heuristic,
            open: IntrusiveHeap::new(n),
            nodes: SearchNodes::new(n),
            order: 0,
            expanded: 0,
            outcome: None,
        };
        let h = search.h(start);
        search.reach(start, None, C::zero(), h);
        Ok(search)
    }

    #[inline(always)]
    pub(crate) fn h(&self, v: VertexId) -> C {
        self.heuristic
            .h(self.graph.coord(v), self.graph.coord(self.goal))
    }

    fn run(&mut self) -> Result<Path<C>, SearchError> {
        let graph = self.graph;

        while let Some(heap_node) = self.open.pop() {
            let v = heap_node.item;
            let g = self.nodes.g(v);
            debug_assert!(!self.nodes.is_closed(v));

            self.nodes.close(v);
            self.expanded += 1;
            log::trace!(
                "A* expands {v} ({}) at f={} h={}",
                graph.coord(v),
                heap_node.rank.f(),
                heap_node.rank.h()
            );

            if v == self.goal {
                return Ok(self.nodes.path(v));
            }

            for e in graph.edges(v) {
                if self.nodes.is_closed(e.to) {
                    // NOTE: An inconsistent heuristic could have closed this
                    // vertex too early. We don't reopen.
                    continue;
                }
                let new_g = g.saturating_add(&e.weight);
                if new_g < self.nodes.g(e.to) {
                    let h = match self.open.rank(e.to) {
                        Some(rank) => rank.h(),
                        None => self.h(e.to),
                    };
                    self.reach(e.to, Some(v), new_g, h);
                }
            }
        }

        Err(SearchError::NoPathFound {
            start: self.start,
            goal: self.goal,
        })
    }

    fn reach(&mut self, v: VertexId, parent: Option<VertexId>, g: C, h: C) {
        self.nodes.reach(v, parent, g);
        let rank = AStarRank::new(g, h, self.order);
        self.order += 1;
        if self.open.improve(v, rank).is_none() {
            self.open.push(v, rank);
        }
    }
}

impl<C: Cost, H: Heuristic<C>> Search<C> for AStarSearch<'_, C, H> {
    fn find_path(&mut self) -> Result<Path<C>, SearchError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let outcome = self.run();
        match &outcome {
            Ok(path) => log::debug!(
                "A* found a path of {} steps (cost {}) expanding {} vertices",
                path.len(),
                path.cost(),
                self.expanded
            ),
            Err(e) => log::debug!("A* gave up after {} expansions: {e}", self.expanded),
        }
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn expanded(&self) -> usize {
        self.expanded
    }
}
