pub mod heuristics;
pub mod history;
pub mod risk;
