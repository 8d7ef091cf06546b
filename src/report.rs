//! Plain-text listings of search results.
//!
//! A walk is written as its count on one line, followed by one `row col` line
//! per coordinate, 0-based.

use std::io::Write;

use crate::algorithms::Solution;
use crate::cost::Cost;
use crate::graph::Coord;
use crate::graph::Graph;

/// Writes `count`, then every coordinate on its own line.
pub fn write_walk<W, I>(out: &mut W, count: usize, coords: I) -> std::io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Coord>,
{
    writeln!(out, "{count}")?;
    for c in coords {
        writeln!(out, "{c}")?;
    }
    Ok(())
}

/// Writes the trail (if any) with its number of vertices, then the path with
/// its number of steps.
pub fn write_solution<W, C>(
    out: &mut W,
    graph: &Graph<C>,
    solution: &Solution<C>,
) -> std::io::Result<()>
where
    W: Write + ?Sized,
    C: Cost,
{
    if let Some(trail) = &solution.trail {
        write_walk(out, trail.len(), trail.coords(graph))?;
    }
    write_walk(out, solution.path.len(), solution.path.coords(graph))
}
