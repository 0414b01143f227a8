pub mod config;
pub mod logging;
pub mod properties;
pub mod suffix_engine;

pub use config::{ConfigError, Mode, SuffixConfig};
pub use suffix_engine::{FileTask, RunSummary, SuffixEngine, TaskOutcome, add_suffix_to_file};
