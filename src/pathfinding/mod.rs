//! Route planning - terrain costs, A* search, and budgeted reachability

pub mod astar;
pub mod cost;
pub mod path;
pub mod reach;

pub use astar::PathPlanner;
pub use cost::{CostModel, CostStep, MoveCost};
pub use path::Path;
pub use reach::ReachabilitySolver;
