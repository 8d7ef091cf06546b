//! Implementation of search algorithms.
//!
//! All of them find a path between two vertices of a [`Graph`]. DFS and BFS
//! also keep the order in which they visited vertices.

pub mod astar;
pub mod bfs;
pub mod dfs;
pub mod dijkstra;

use derive_more::Display;

use crate::cost::Cost;
use crate::graph::Coord;
use crate::graph::Graph;
use crate::graph::VertexId;
use crate::search::Explore;
use crate::search::Search;
use crate::search::SearchError;
use crate::trail::Path;
use crate::trail::Trail;

use astar::AStarSearch;
use astar::ManhattanDistance;
use bfs::BreadthFirstSearch;
use dfs::DepthFirstSearch;
use dijkstra::DijkstraSearch;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[display("DFS")]
    DepthFirst,
    #[display("BFS")]
    BreadthFirst,
    #[display("Dijkstra")]
    Dijkstra,
    #[display("A*")]
    AStar,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::DepthFirst,
        Strategy::BreadthFirst,
        Strategy::Dijkstra,
        Strategy::AStar,
    ];

    /// Whether this strategy keeps a [`Trail`] of visited vertices.
    pub fn explores(&self) -> bool {
        matches!(self, Strategy::DepthFirst | Strategy::BreadthFirst)
    }

    /// Runs this strategy from `start` to `goal`.
    ///
    /// A* only follows grid distances on graphs where they're a lower bound
    /// (see [`Graph::is_grid_metric`]).
    pub fn solve<C>(
        &self,
        graph: &Graph<C>,
        start: VertexId,
        goal: VertexId,
    ) -> Result<Solution<C>, SearchError>
    where
        C: Cost + num_traits::FromPrimitive,
    {
        match self {
            Strategy::DepthFirst => {
                explore(*self, DepthFirstSearch::new(graph, start, goal)?)
            }
            Strategy::BreadthFirst => {
                explore(*self, BreadthFirstSearch::new(graph, start, goal)?)
            }
            Strategy::Dijkstra => search(*self, DijkstraSearch::new(graph, start, goal)?),
            Strategy::AStar if graph.is_grid_metric() => search(
                *self,
                AStarSearch::new(graph, start, goal, ManhattanDistance)?,
            ),
            Strategy::AStar => {
                // Grid distance would overestimate across shortcuts.
                log::debug!("Graph has shortcuts, running A* without a heuristic");
                let blind = |_: Coord, _: Coord| C::zero();
                search(*self, AStarSearch::new(graph, start, goal, blind)?)
            }
        }
    }
}

/// What a [`Strategy`] found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution<C: Cost> {
    pub strategy: Strategy,
    pub path: Path<C>,
    /// Visited vertices, for strategies that keep them.
    pub trail: Option<Trail<C>>,
    pub expanded: usize,
}

fn search<C: Cost, S: Search<C>>(strategy: Strategy, mut s: S) -> Result<Solution<C>, SearchError> {
    let path = s.find_path()?;
    Ok(Solution {
        strategy,
        path,
        trail: None,
        expanded: s.expanded(),
    })
}

fn explore<C: Cost, S: Explore<C>>(
    strategy: Strategy,
    mut s: S,
) -> Result<Solution<C>, SearchError> {
    let path = s.find_path()?;
    let expanded = s.expanded();
    Ok(Solution {
        strategy,
        path,
        trail: Some(s.into_trail()),
        expanded,
    })
}
