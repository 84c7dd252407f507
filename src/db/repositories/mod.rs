pub mod checkpoint;
pub mod probabilities;
pub mod samples;
