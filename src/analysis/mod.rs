pub mod algorithm;
pub mod probability;
pub mod smoothing;
pub mod stationarity;

pub use algorithm::{analyze, AnalysisOutcome, AnalysisRun};
