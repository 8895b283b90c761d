pub mod dataset;
pub mod operations;
pub mod runner;
pub mod split;

pub use runner::run_split;
