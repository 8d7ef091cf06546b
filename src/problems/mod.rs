//! Problems that reduce to path-finding on a [`Graph`](crate::graph::Graph).

pub mod maze_2d;
