use crate::domain::model::{AcceptedFields, Record, TransformResult, TranslationResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Json,
    Jsonl,
}

pub trait ConfigProvider: Send + Sync {
    fn router_host(&self) -> &str;
    fn model(&self) -> &str;
    fn dataset_paths(&self) -> &[String];
    fn dataset_type(&self) -> Option<DatasetType>;
    fn accepted_fields(&self) -> AcceptedFields;
    fn num_workers(&self) -> usize;
    fn batch_size(&self) -> usize;
    fn output_path(&self) -> Option<&str>;
    fn show_progress(&self) -> bool;
}

/// Translates one batch of texts with a fixed model.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, texts: &[String]) -> Result<TranslationResult>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for std::sync::Arc<T> {
    async fn translate(&self, texts: &[String]) -> Result<TranslationResult> {
        (**self).translate(texts).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Record>>;
    async fn transform(&self, records: Vec<Record>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
