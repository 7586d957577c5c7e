pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::dataforseo::{Credentials, RankingClient, RankingClientConfig};
pub use adapters::storage::LocalStorage;
pub use app::pipelines::QualificationPipeline;
pub use config::TomlConfig;
pub use core::engine::{BatchEngine, BatchOutcome};
pub use utils::error::{QualifierError, Result};
