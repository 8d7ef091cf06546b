#![no_main]

use libfuzzer_sys::fuzz_target;

use gridsearch::algorithms::Strategy;
use gridsearch::problems::maze_2d::MazeProblem;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(problem) = MazeProblem::try_from(text) else {
        return;
    };
    let Ok(maze) = problem.maze() else {
        return;
    };

    let costs: Vec<Option<u32>> = Strategy::ALL
        .iter()
        .map(|s| maze.solve(*s).ok().map(|solution| solution.path.cost()))
        .collect();
    assert_eq!(costs[2], costs[3], "Dijkstra and A* disagree");
});
