use std::path::PathBuf;

use indoc::indoc;

use gridsearch::algorithms::Strategy;
use gridsearch::graph::Coord;
use gridsearch::problems::maze_2d::Maze;
use gridsearch::problems::maze_2d::MazeProblem;
use gridsearch::report::write_solution;
use gridsearch::search::SearchError;

fn data(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(path)
}

fn load(name: &str) -> Maze {
    let text = std::fs::read_to_string(data(&format!("mazes/{name}.txt"))).unwrap();
    MazeProblem::try_from(text.as_str()).unwrap().maze().unwrap()
}

fn report(maze: &Maze, strategy: Strategy) -> String {
    let solution = maze.solve(strategy).unwrap();
    let mut out = Vec::new();
    write_solution(&mut out, maze.graph(), &solution).unwrap();
    String::from_utf8(out).unwrap()
}

fn file_name(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::DepthFirst => "dfs",
        Strategy::BreadthFirst => "bfs",
        Strategy::Dijkstra => "dijkstra",
        Strategy::AStar => "astar",
    }
}

fn check_listing(name: &str, strategy: Strategy) {
    let maze = load(name);
    let expected = std::fs::read_to_string(data(&format!(
        "expected/{name}.{}.txt",
        file_name(strategy)
    )))
    .unwrap();
    assert_eq!(report(&maze, strategy), expected, "{name} with {strategy}");
}

#[test]
fn small_maze_listings() {
    for strategy in Strategy::ALL {
        check_listing("small", strategy);
    }
}

#[test]
fn medium_maze_listings() {
    for strategy in Strategy::ALL {
        check_listing("medium", strategy);
    }
}

#[test]
fn large_maze_listings() {
    for strategy in Strategy::ALL {
        check_listing("large", strategy);
    }
}

#[test]
fn small_maze_reports() {
    let maze = load("small");

    assert_eq!(
        report(&maze, Strategy::DepthFirst),
        indoc! {"
            4
            1 2
            2 2
            3 2
            3 3
            3
            1 2
            2 2
            3 2
            3 3
        "}
    );
    assert_eq!(
        report(&maze, Strategy::BreadthFirst),
        indoc! {"
            6
            1 2
            2 2
            2 1
            2 3
            3 2
            3 3
            3
            1 2
            2 2
            2 3
            3 3
        "}
    );
    let dijkstra = maze.solve(Strategy::Dijkstra).unwrap();
    assert_eq!(dijkstra.path.cost(), 5);
    assert_eq!(maze.solve(Strategy::AStar).unwrap().path.cost(), 5);
}

#[test]
fn medium_maze_costs() {
    let maze = load("medium");

    let dfs = maze.solve(Strategy::DepthFirst).unwrap();
    assert_eq!(dfs.trail.as_ref().map(|t| t.len()), Some(33));
    assert_eq!(dfs.path.len(), 32);

    let bfs = maze.solve(Strategy::BreadthFirst).unwrap();
    assert_eq!(bfs.trail.as_ref().map(|t| t.len()), Some(60));
    assert_eq!(bfs.path.len(), 32);

    for strategy in [Strategy::Dijkstra, Strategy::AStar] {
        let solution = maze.solve(strategy).unwrap();
        assert_eq!(solution.path.len(), 32, "{strategy}");
        assert_eq!(solution.path.cost(), 33, "{strategy}");
        assert!(solution.trail.is_none());
    }
}

#[test]
fn large_maze_costs() {
    let maze = load("large");
    let graph = maze.graph();

    let dijkstra = maze.solve(Strategy::Dijkstra).unwrap();
    let astar = maze.solve(Strategy::AStar).unwrap();
    assert_eq!(dijkstra.path.len(), 210);
    assert_eq!(dijkstra.path.cost(), 211);
    assert_eq!(astar.path.cost(), dijkstra.path.cost());
    assert!(astar.expanded < dijkstra.expanded);

    assert_eq!(graph.coord(astar.path.start()), Coord::new(35, 35));
    assert_eq!(graph.coord(astar.path.end()), Coord::new(35, 1));
    assert!(astar.path.valid_in(graph));
}

/// A cheap detour below a corridor full of food.
const FOOD_CORRIDOR: &str = indoc! {"
    1 1
    1 7
    5 9
    %%%%%%%%%
    %P.....-%
    %-%%%%%-%
    %-------%
    %%%%%%%%%
"};

#[test]
fn weights_steer_weighted_searches() {
    let maze = MazeProblem::try_from(FOOD_CORRIDOR)
        .unwrap()
        .maze()
        .unwrap();
    let graph = maze.graph();
    let coords = |path: &gridsearch::trail::Path<u32>| path.coords(graph).collect::<Vec<_>>();

    let bfs = maze.solve(Strategy::BreadthFirst).unwrap();
    assert_eq!(bfs.trail.as_ref().map(|t| t.len()), Some(12));
    assert_eq!(bfs.path.len(), 6);
    assert_eq!(bfs.path.cost(), 11);
    assert_eq!(
        coords(&bfs.path),
        (1..=7).map(|col| Coord::new(1, col)).collect::<Vec<_>>()
    );

    let detour: Vec<Coord> = [(1, 1), (2, 1)]
        .into_iter()
        .chain((1..=7).map(|col| (3, col)))
        .chain([(2, 7), (1, 7)])
        .map(|(row, col)| Coord::new(row, col))
        .collect();

    let dfs = maze.solve(Strategy::DepthFirst).unwrap();
    assert_eq!(dfs.path.len(), 10);
    assert_eq!(dfs.path.cost(), 10);
    assert_eq!(
        dfs.trail.as_ref().map(|t| t.coords(graph).collect::<Vec<_>>()),
        Some(detour.clone())
    );

    for strategy in [Strategy::Dijkstra, Strategy::AStar] {
        let solution = maze.solve(strategy).unwrap();
        assert_eq!(coords(&solution.path), detour, "{strategy}");
        assert_eq!(solution.path.cost(), 10, "{strategy}");
    }
}

#[test]
fn adjacent_start_and_goal() {
    let problem = MazeProblem::try_from(indoc! {"
        1 1
        1 2
        3 4
        %%%%
        %P.%
        %%%%
    "})
    .unwrap();
    let maze = problem.maze().unwrap();

    for strategy in Strategy::ALL {
        let solution = maze.solve(strategy).unwrap();
        assert_eq!(solution.path.len(), 1, "{strategy}");
        assert_eq!(solution.path.cost(), 2, "{strategy}");
    }
}

#[test]
fn isolated_start() {
    let problem = MazeProblem::try_from(indoc! {"
        1 1
        1 3
        3 5
        %%%%%
        %P%-%
        %%%%%
    "})
    .unwrap();
    let maze = problem.maze().unwrap();

    for strategy in Strategy::ALL {
        assert_eq!(
            maze.solve(strategy),
            Err(SearchError::NoPathFound {
                start: maze.start(),
                goal: maze.goal()
            }),
            "{strategy}"
        );
    }

    // Staying put is always possible.
    let stay = MazeProblem::new(problem.grid().clone(), Coord::new(1, 1), Coord::new(1, 1))
        .maze()
        .unwrap();
    for strategy in Strategy::ALL {
        let solution = stay.solve(strategy).unwrap();
        assert!(solution.path.is_empty(), "{strategy}");
        assert_eq!(solution.path.cost(), 0);
    }
}

#[test]
fn reports_are_stable() {
    let maze = load("medium");
    for strategy in Strategy::ALL {
        assert_eq!(report(&maze, strategy), report(&maze, strategy));
    }
}
