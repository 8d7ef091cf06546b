use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod data_structures;

// Graphs and search records
// -------------------------
pub mod cost;
pub mod graph;
pub mod search;
pub mod trail;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;

// Output
// ------
pub mod report;
