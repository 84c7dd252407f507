pub mod checkpoint;
pub mod sample;
pub mod sleep_probability;

pub use checkpoint::{Checkpoint, StoredCheckpoint};
pub use sample::SoundSample;
pub use sleep_probability::SleepProbability;
