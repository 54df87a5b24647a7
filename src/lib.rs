pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{DatasetLoader, LocalStorage, RouterClient};
pub use core::{engine::TranslateEngine, pipeline::TranslatePipeline};
pub use domain::model::{AcceptedFields, Record, TranslationResult};
pub use utils::error::{Result, TranslateError};
