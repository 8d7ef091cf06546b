//! Pac-Man style mazes: character grids turned into weighted graphs.

use derive_more::Display;
use thiserror::Error;

use crate::algorithms::Solution;
use crate::algorithms::Strategy;
use crate::graph::Coord;
use crate::graph::Graph;
use crate::graph::GraphBuilder;
use crate::graph::GraphError;
use crate::graph::VertexId;
use crate::search::SearchError;

const MAX_ELEMENTS_DISPLAYED: usize = 80;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;
const MAX_PREALLOCATED_ROWS: usize = 1024;

/// Edge weights of maze graphs.
pub type MazeCost = u32;

/// Neighbour offsets, in the order their edges are added: up, left, right,
/// down.
const NEIGHBOURS: [(i64, i64); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum MazeCell {
    #[display("%")]
    Wall,
    #[display("-")]
    Empty,
    #[display(".")]
    Food,
    /// Where Pac-Man starts. Plain floor otherwise.
    #[display("P")]
    Start,
}

impl MazeCell {
    /// Cost of stepping into this cell, or `None` for walls.
    #[inline(always)]
    pub fn cost(&self) -> Option<MazeCost> {
        match self {
            MazeCell::Wall => None,
            MazeCell::Empty | MazeCell::Start => Some(1),
            MazeCell::Food => Some(2),
        }
    }

    #[inline(always)]
    pub fn is_passable(&self) -> bool {
        self.cost().is_some()
    }

    pub fn symbol(&self) -> char {
        match self {
            MazeCell::Wall => '%',
            MazeCell::Empty => '-',
            MazeCell::Food => '.',
            MazeCell::Start => 'P',
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for MazeCell {
    type Error = MazeCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            '%' => Ok(MazeCell::Wall),
            '-' => Ok(MazeCell::Empty),
            '.' => Ok(MazeCell::Food),
            'P' => Ok(MazeCell::Start),
            ch => Err(MazeCellParseError::InvalidCharacter(ch)),
        }
    }
}

/// Why some text isn't a maze.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridDefect {
    #[error("Empty input")]
    EmptyInput,
    #[error("Line {line}: expected two numbers, found '{text}'")]
    BadHeader { line: usize, text: String },
    #[error("Expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("Row {row} is {found} cells wide instead of {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid cell at ({row},{col}): {e}")]
    InvalidCell {
        e: MazeCellParseError,
        row: usize,
        col: usize,
    },
    #[error("{rows}x{cols} grids are too large")]
    TooLarge { rows: usize, cols: usize },
}

/// How to find a start or goal cell.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Endpoint {
    /// A given cell.
    #[display("({_0})")]
    At(Coord),
    /// The only cell showing this character.
    #[display("'{_0}'")]
    Marker(char),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointDefect {
    #[error("not found")]
    Absent,
    #[error("found {0} times")]
    Duplicated(usize),
    #[error("outside the grid")]
    OutOfBounds,
    #[error("inside a wall")]
    Wall,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(#[from] GridDefect),
    #[error("Endpoint {endpoint} is {defect}")]
    MissingEndpoint {
        endpoint: Endpoint,
        defect: EndpointDefect,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A rectangular grid of cells.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeGrid {
    pub(crate) map: Vec<Vec<MazeCell>>,
}

impl MazeGrid {
    /// Parses `rows` lines of exactly `cols` cells.
    ///
    /// Trailing whitespace is ignored and so are lines after the last row.
    pub fn parse<'a, L>(lines: L, rows: usize, cols: usize) -> Result<Self, GridDefect>
    where
        L: IntoIterator<Item = &'a str>,
    {
        if rows == 0 || cols == 0 {
            return Err(GridDefect::EmptyInput);
        }
        if Coord::new_from_usize(rows, cols).is_none() {
            return Err(GridDefect::TooLarge { rows, cols });
        }

        // The header may promise more rows than there are.
        let mut map = Vec::with_capacity(rows.min(MAX_PREALLOCATED_ROWS));
        for (row, line) in lines.into_iter().take(rows).enumerate() {
            let line = line.trim_end();
            let found = line.chars().count();
            if found != cols {
                return Err(GridDefect::RowWidth {
                    row,
                    expected: cols,
                    found,
                });
            }
            let cells = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    MazeCell::try_from(ch).map_err(|e| GridDefect::InvalidCell { e, row, col })
                })
                .collect::<Result<Vec<MazeCell>, GridDefect>>()?;
            map.push(cells);
        }
        if map.len() != rows {
            return Err(GridDefect::RowCount {
                expected: rows,
                found: map.len(),
            });
        }

        Ok(Self { map })
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (usize, usize) {
        if self.map.is_empty() {
            return (0, 0);
        }
        (self.map.len(), self.map[0].len())
    }

    pub fn at(&self, coord: Coord) -> Option<MazeCell> {
        self.map
            .get(coord.row as usize)?
            .get(coord.col as usize)
            .copied()
    }

    pub fn is_passable(&self, coord: Coord) -> bool {
        self.at(coord).is_some_and(|cell| cell.is_passable())
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, MazeCell)> + '_ {
        self.map.iter().enumerate().flat_map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(move |(col, cell)| (Coord::new(row as u32, col as u32), *cell))
        })
    }

    /// Passable neighbours of `coord`, up, left, right and then down.
    pub fn neighbours(&self, coord: Coord) -> impl Iterator<Item = (Coord, MazeCell)> + '_ {
        NEIGHBOURS.iter().filter_map(move |(dr, dc)| {
            let row = u32::try_from(i64::from(coord.row) + dr).ok()?;
            let col = u32::try_from(i64::from(coord.col) + dc).ok()?;
            let n = Coord::new(row, col);
            let cell = self.at(n)?;
            cell.is_passable().then_some((n, cell))
        })
    }

    /// A passable cell picked uniformly at random, if there's any.
    pub fn random_cell<R: rand::Rng>(&self, r: &mut R) -> Option<Coord> {
        let (rows, cols) = self.dimensions();
        if rows == 0 || cols == 0 {
            return None;
        }

        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let row = r.random_range(0..rows);
            let col = r.random_range(0..cols);
            if self.map[row][col].is_passable() {
                return Coord::new_from_usize(row, col);
            }
        }

        log::warn!("Gave up looking for a random cell in a {rows}x{cols} maze");
        None
    }

    fn resolve(&self, endpoint: Endpoint) -> Result<Coord, MazeError> {
        let missing = |defect| MazeError::MissingEndpoint { endpoint, defect };

        match endpoint {
            Endpoint::At(coord) => match self.at(coord) {
                None => Err(missing(EndpointDefect::OutOfBounds)),
                Some(MazeCell::Wall) => Err(missing(EndpointDefect::Wall)),
                Some(_) => Ok(coord),
            },
            Endpoint::Marker(marker) => {
                let mut found = self
                    .cells()
                    .filter(|(_, cell)| cell.symbol() == marker);
                let coord = found.next().ok_or(missing(EndpointDefect::Absent))?;
                let extra = found.count();
                if extra > 0 {
                    return Err(missing(EndpointDefect::Duplicated(extra + 1)));
                }
                if !coord.1.is_passable() {
                    return Err(missing(EndpointDefect::Wall));
                }
                Ok(coord.0)
            }
        }
    }
}

impl std::fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for line in &self.map {
            for cell in line {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "MazeGrid{:?}", self.dimensions())
    }
}

/// Turns a [`MazeGrid`] into a [`Maze`].
///
/// Every passable cell becomes a vertex, in row-major order. Every pair of
/// adjacent passable cells gets an edge each way, weighing the cost of the
/// cell it enters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MazeBuilder {
    start: Endpoint,
    goal: Endpoint,
}

impl MazeBuilder {
    pub fn new(start: Endpoint, goal: Endpoint) -> Self {
        Self { start, goal }
    }

    pub fn build(&self, grid: MazeGrid) -> Result<Maze, MazeError> {
        let start = grid.resolve(self.start)?;
        let goal = grid.resolve(self.goal)?;

        let (rows, cols) = grid.dimensions();
        let mut ids: Vec<Option<VertexId>> = vec![None; rows * cols];
        let slot = |c: Coord| c.row as usize * cols + c.col as usize;

        let mut builder = GraphBuilder::<MazeCost>::with_capacity(rows * cols);
        for (coord, cell) in grid.cells() {
            if cell.is_passable() {
                ids[slot(coord)] = Some(builder.add_vertex(coord)?);
            }
        }
        for (coord, _) in grid.cells() {
            let Some(from) = ids[slot(coord)] else {
                continue;
            };
            for (n, cell) in grid.neighbours(coord) {
                if let (Some(to), Some(weight)) = (ids[slot(n)], cell.cost()) {
                    builder.add_edge(from, to, weight)?;
                }
            }
        }
        let graph = builder.build();

        // Both endpoints are passable, so they got a vertex.
        let missing = |endpoint| MazeError::MissingEndpoint {
            endpoint,
            defect: EndpointDefect::Wall,
        };
        let start = ids[slot(start)].ok_or(missing(self.start))?;
        let goal = ids[slot(goal)].ok_or(missing(self.goal))?;

        Ok(Maze {
            grid,
            graph,
            start,
            goal,
        })
    }
}

/// A maze graph, ready to be searched.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: MazeGrid,
    graph: Graph<MazeCost>,
    start: VertexId,
    goal: VertexId,
}

impl Maze {
    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }
    pub fn graph(&self) -> &Graph<MazeCost> {
        &self.graph
    }
    pub fn start(&self) -> VertexId {
        self.start
    }
    pub fn goal(&self) -> VertexId {
        self.goal
    }

    pub fn solve(&self, strategy: Strategy) -> Result<Solution<MazeCost>, SearchError> {
        strategy.solve(&self.graph, self.start, self.goal)
    }
}

/// A grid with start and goal cells, as read from text:
///
/// ```text
/// <start row> <start col>
/// <goal row> <goal col>
/// <rows> <cols>
/// <rows lines of cols cells>
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeProblem {
    grid: MazeGrid,
    start: Coord,
    goal: Coord,
}

impl MazeProblem {
    pub fn new(grid: MazeGrid, start: Coord, goal: Coord) -> Self {
        Self { grid, start, goal }
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }
    pub fn start(&self) -> Coord {
        self.start
    }
    pub fn goal(&self) -> Coord {
        self.goal
    }

    /// Builds the graph for this problem.
    pub fn maze(&self) -> Result<Maze, MazeError> {
        MazeBuilder::new(Endpoint::At(self.start), Endpoint::At(self.goal)).build(self.grid.clone())
    }

    /// The same grid with new start and goal cells.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R) -> Option<MazeProblem> {
        Some(MazeProblem {
            grid: self.grid.clone(),
            start: self.grid.random_cell(r)?,
            goal: self.grid.random_cell(r)?,
        })
    }
}

/// Parses one `<a> <b>` header line.
fn parse_pair(line: usize, text: Option<&str>) -> Result<(usize, usize), GridDefect> {
    let text = text.ok_or(GridDefect::EmptyInput)?;
    let bad = || GridDefect::BadHeader {
        line,
        text: text.trim_end().to_string(),
    };

    let mut numbers = text.split_whitespace().map(|n| n.parse::<usize>());
    match (numbers.next(), numbers.next(), numbers.next()) {
        (Some(Ok(a)), Some(Ok(b)), None) => Ok((a, b)),
        _ => Err(bad()),
    }
}

fn parse_coord(line: usize, text: Option<&str>) -> Result<Coord, GridDefect> {
    let (row, col) = parse_pair(line, text)?;
    Coord::new_from_usize(row, col).ok_or(GridDefect::BadHeader {
        line,
        text: format!("{row} {col}"),
    })
}

impl std::convert::TryFrom<&str> for MazeProblem {
    type Error = GridDefect;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        if s.trim().is_empty() {
            return Err(GridDefect::EmptyInput);
        }
        let mut lines = s.lines();

        let start = parse_coord(1, lines.next())?;
        let goal = parse_coord(2, lines.next())?;
        let (rows, cols) = parse_pair(3, lines.next())?;
        let grid = MazeGrid::parse(lines, rows, cols)?;

        Ok(MazeProblem { grid, start, goal })
    }
}

impl std::str::FromStr for MazeProblem {
    type Err = GridDefect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MazeProblem::try_from(s)
    }
}

impl std::fmt::Display for MazeProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.grid.dimensions();
        writeln!(
            f,
            "MazeProblem({rows}x{cols}) (s:({}), g:({})):",
            self.start, self.goal
        )?;
        for (row, line) in self.grid.map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (col, cell) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let c = Coord::new(row as u32, col as u32);
                match (c == self.start, c == self.goal) {
                    (true, true) => write!(f, "!")?,
                    (true, false) => write!(f, "S")?,
                    (false, true) => write!(f, "G")?,
                    (false, false) => write!(f, "{cell}")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
