//! Solves HackerRank-style Pac-Man mazes.
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use clap::Parser;
use clap::ValueEnum;
use indoc::indoc;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;
use thousands::Separable;

use gridsearch::algorithms::Strategy;
use gridsearch::problems::maze_2d::GridDefect;
use gridsearch::problems::maze_2d::MazeError;
use gridsearch::problems::maze_2d::MazeProblem;
use gridsearch::report::write_solution;
use gridsearch::search::SearchError;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Depth-first search
    Dfs,
    /// Breadth-first search
    Bfs,
    Dijkstra,
    Astar,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Dfs => Strategy::DepthFirst,
            StrategyArg::Bfs => Strategy::BreadthFirst,
            StrategyArg::Dijkstra => Strategy::Dijkstra,
            StrategyArg::Astar => Strategy::AStar,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = gridsearch::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = indoc! {"
    Finds Pac-Man's way to the food.

    The maze is read from a file, or stdin when none is given:

      <start row> <start col>
      <goal row> <goal col>
      <rows> <cols>
      <rows lines of '%' walls, '-' floor, '.' food and 'P' start>

    DFS and BFS print every visited cell and then the path. Dijkstra and A*
    print just the path. Listings start with their number of steps.
"})]
pub struct Args {
    /// Maze file
    #[arg()]
    pub maze: Option<PathBuf>,

    #[arg(short, long, env = "PACMAN_STRATEGY", value_enum, default_value_t = StrategyArg::Astar)]
    pub strategy: StrategyArg,

    /// Prints search statistics to stderr
    #[arg(long)]
    pub stats: bool,

    /// Ignores the given start and goal, and picks random ones with this seed
    #[arg(long)]
    pub shuffle: Option<u64>,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum PacmanError {
    #[error("I/O error when loading '{p}': {e}")]
    Load { p: String, e: std::io::Error },
    #[error("I/O error when writing the solution: {0}")]
    Write(#[from] std::io::Error),
    #[error("Malformed maze: {0}")]
    Grid(#[from] GridDefect),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("The maze has no room for a random start and goal")]
    NoRoom,
}

fn load(maze: Option<&PathBuf>) -> Result<String, PacmanError> {
    match maze {
        Some(p) => std::fs::read_to_string(p).map_err(|e| PacmanError::Load {
            p: p.display().to_string(),
            e,
        }),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| PacmanError::Load {
                    p: "<stdin>".to_string(),
                    e,
                })?;
            Ok(text)
        }
    }
}

fn run(args: &Args) -> Result<(), PacmanError> {
    let strategy = Strategy::from(args.strategy);
    let text = load(args.maze.as_ref())?;

    let mut problem = MazeProblem::try_from(text.as_str())?;
    if let Some(seed) = args.shuffle {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        problem = problem.randomize(&mut rng).ok_or(PacmanError::NoRoom)?;
        log::info!(
            "Shuffled start to ({}) and goal to ({})",
            problem.start(),
            problem.goal()
        );
    }
    log::debug!("{problem}");

    let maze = problem.maze()?;
    let solution = maze.solve(strategy)?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    write_solution(&mut out, maze.graph(), &solution)?;
    out.flush()?;

    if args.stats {
        let graph = maze.graph();
        eprintln!(
            "{}: {} vertices, {} edges",
            "Maze".green(),
            graph.vertex_count().separate_with_commas(),
            graph.edge_count().separate_with_commas()
        );
        eprintln!(
            "{}: expanded {} vertices, found {} steps costing {}",
            strategy.cyan(),
            solution.expanded.separate_with_commas(),
            solution.path.len().separate_with_commas(),
            solution.path.cost().separate_with_commas()
        );
        if let Some(trail) = &solution.trail {
            eprintln!(
                "{}: visited {} vertices",
                strategy.cyan(),
                trail.len().separate_with_commas()
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
