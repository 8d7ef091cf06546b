//! Properties checked over seeded random mazes.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use gridsearch::algorithms::Solution;
use gridsearch::algorithms::Strategy;
use gridsearch::graph::Coord;
use gridsearch::graph::Graph;
use gridsearch::graph::GraphBuilder;
use gridsearch::graph::VertexId;
use gridsearch::problems::maze_2d::Maze;
use gridsearch::problems::maze_2d::MazeCell;
use gridsearch::problems::maze_2d::MazeProblem;
use gridsearch::search::SearchError;

const NUM_MAZES: u64 = 200;

/// Maze text with random walls, floor and food.
fn random_maze_text(rng: &mut ChaCha8Rng) -> String {
    let rows = rng.random_range(2..14);
    let cols = rng.random_range(2..14);

    let mut text = format!("0 0\n0 0\n{rows} {cols}\n");
    for _row in 0..rows {
        for _col in 0..cols {
            let ch = match rng.random_range(0..10) {
                0..3 => '%',
                3..5 => '.',
                _ => '-',
            };
            text.push(ch);
        }
        text.push('\n');
    }
    text
}

/// Random mazes with random passable endpoints.
fn mazes() -> impl Iterator<Item = (u64, Maze)> {
    (0..NUM_MAZES).filter_map(|seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let text = random_maze_text(&mut rng);
        let problem = MazeProblem::try_from(text.as_str()).unwrap();
        let problem = problem.randomize(&mut rng)?;
        Some((seed, problem.maze().unwrap()))
    })
}

fn solve_all(maze: &Maze) -> Vec<Result<Solution<u32>, SearchError>> {
    Strategy::ALL.iter().map(|s| maze.solve(*s)).collect()
}

#[test]
fn strategies_agree_on_reachability() {
    for (seed, maze) in mazes() {
        let outcomes = solve_all(&maze);
        let reachable = outcomes[0].is_ok();
        for (strategy, outcome) in Strategy::ALL.iter().zip(&outcomes) {
            assert_eq!(outcome.is_ok(), reachable, "seed {seed}, {strategy}");
            if let Err(e) = outcome {
                assert_eq!(
                    *e,
                    SearchError::NoPathFound {
                        start: maze.start(),
                        goal: maze.goal()
                    }
                );
            }
        }
    }
}

#[test]
fn paths_connect_start_and_goal() {
    for (seed, maze) in mazes() {
        for solution in solve_all(&maze).into_iter().flatten() {
            let path = &solution.path;
            assert_eq!(path.start(), maze.start(), "seed {seed}");
            assert_eq!(path.end(), maze.goal(), "seed {seed}");
            assert!(path.valid_in(maze.graph()), "seed {seed}");
            // Restartable
            assert!(path.iter().eq(path.iter()));
        }
    }
}

#[test]
fn dijkstra_and_astar_costs_are_equal_and_minimal() {
    for (seed, maze) in mazes() {
        let Ok(dijkstra) = maze.solve(Strategy::Dijkstra) else {
            continue;
        };
        let astar = maze.solve(Strategy::AStar).unwrap();
        assert_eq!(astar.path.cost(), dijkstra.path.cost(), "seed {seed}");
        assert!(astar.expanded <= dijkstra.expanded, "seed {seed}");

        for strategy in [Strategy::DepthFirst, Strategy::BreadthFirst] {
            let other = maze.solve(strategy).unwrap();
            assert!(dijkstra.path.cost() <= other.path.cost(), "seed {seed}");
        }
    }
}

#[test]
fn bfs_takes_fewest_steps() {
    for (seed, maze) in mazes() {
        let Ok(bfs) = maze.solve(Strategy::BreadthFirst) else {
            continue;
        };
        for strategy in Strategy::ALL {
            let other = maze.solve(strategy).unwrap();
            assert!(bfs.path.len() <= other.path.len(), "seed {seed}, {strategy}");
        }
    }
}

#[test]
fn trails_start_at_start_and_record_each_vertex_once() {
    for (seed, maze) in mazes() {
        for strategy in [Strategy::DepthFirst, Strategy::BreadthFirst] {
            let Ok(solution) = maze.solve(strategy) else {
                continue;
            };
            let trail = solution.trail.unwrap();
            let mut seen = vec![false; maze.graph().vertex_count()];
            for v in trail.iter() {
                assert!(!seen[v.index()], "seed {seed}, {strategy} visits {v} twice");
                seen[v.index()] = true;
            }
            assert_eq!(trail.iter().next(), Some(maze.start()));
            assert_eq!(trail.iter().last(), Some(maze.goal()));
        }
    }
}

#[test]
fn solving_is_deterministic() {
    for (seed, maze) in mazes().take(50) {
        assert_eq!(solve_all(&maze), solve_all(&maze), "seed {seed}");
    }
}

#[test]
fn graph_matches_grid() {
    for (seed, maze) in mazes() {
        let grid = maze.grid();
        let graph = maze.graph();
        let (rows, cols) = grid.dimensions();

        let mut num_vertices = 0;
        let mut num_edges = 0;
        for (coord, cell) in grid.cells() {
            let Some(v) = graph.vertex_at(coord) else {
                assert_eq!(cell, MazeCell::Wall, "seed {seed}, {coord}");
                continue;
            };
            num_vertices += 1;
            assert_eq!(graph.coord(v), coord);

            for (dr, dc) in [(-1i64, 0i64), (0, -1), (0, 1), (1, 0)] {
                let row = i64::from(coord.row) + dr;
                let col = i64::from(coord.col) + dc;
                if row < 0 || col < 0 || row >= rows as i64 || col >= cols as i64 {
                    continue;
                }
                let n = Coord::new(row as u32, col as u32);
                let expected = grid.at(n).and_then(|c| c.cost());
                let found = graph.vertex_at(n).and_then(|u| graph.edge_weight(v, u));
                assert_eq!(found, expected, "seed {seed}, {coord} -> {n}");
                num_edges += usize::from(expected.is_some());
            }
        }
        assert_eq!(graph.vertex_count(), num_vertices, "seed {seed}");
        assert_eq!(graph.edge_count(), num_edges, "seed {seed}");
        assert!(graph.is_grid_metric(), "seed {seed}");
    }
}

/// Vertices scattered over a grid, joined by random edges of random weights.
///
/// Edges often weigh less than the distance they span.
fn random_graph(rng: &mut ChaCha8Rng) -> (Graph<u32>, Vec<VertexId>) {
    let mut b = GraphBuilder::<u32>::new();
    let n = rng.random_range(2..30);
    let ids: Vec<VertexId> = (0..n)
        .map(|_| {
            let coord = Coord::new(rng.random_range(0..20), rng.random_range(0..20));
            b.add_vertex(coord).unwrap()
        })
        .collect();
    for &from in &ids {
        for &to in &ids {
            if from != to && rng.random_bool(0.15) {
                b.add_edge(from, to, rng.random_range(1..25)).unwrap();
            }
        }
    }
    (b.build(), ids)
}

#[test]
fn astar_matches_dijkstra_on_any_graph() {
    for seed in 0..NUM_MAZES {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (graph, ids) = random_graph(&mut rng);
        let (start, goal) = (ids[0], ids[ids.len() - 1]);

        let dijkstra = Strategy::Dijkstra.solve(&graph, start, goal);
        let astar = Strategy::AStar.solve(&graph, start, goal);
        match (dijkstra, astar) {
            (Ok(d), Ok(a)) => {
                assert_eq!(a.path.cost(), d.path.cost(), "seed {seed}");
                assert!(a.path.valid_in(&graph), "seed {seed}");
            }
            (Err(d), Err(a)) => assert_eq!(a, d, "seed {seed}"),
            (d, a) => panic!("seed {seed}: Dijkstra gave {d:?} but A* gave {a:?}"),
        }
    }
}
