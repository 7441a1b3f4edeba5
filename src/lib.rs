pub mod analyzers;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod table;
pub mod visualize;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use pipeline::{ResultBundle, run};
