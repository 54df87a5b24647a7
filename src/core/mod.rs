pub mod batcher;
pub mod dispatcher;
pub mod engine;
pub mod extractor;
pub mod pipeline;
pub mod reconstructor;

pub use crate::domain::model::{Record, TransformResult, TranslationResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Translator};
pub use crate::utils::error::Result;
