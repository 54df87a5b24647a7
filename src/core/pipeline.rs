use crate::adapters::dataset::DatasetLoader;
use crate::core::batcher::batch_texts;
use crate::core::dispatcher::ConcurrentDispatcher;
use crate::core::extractor::{flatten, FlattenedTexts};
use crate::core::reconstructor::reconstruct;
use crate::domain::model::{AcceptedFields, Record, RunStats, TransformResult, TranslationResult};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage, Translator};
use crate::utils::error::Result;
use crate::utils::validation::validate_positive_number;
use tokio::io::AsyncWriteExt;

/// Scratch data for a single run. A new one is built for every `transform` call.
#[derive(Debug, Default)]
struct RunState {
    flat: FlattenedTexts,
    batches: usize,
    results: Vec<TranslationResult>,
}

impl RunState {
    fn translated_texts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.results)
            .into_iter()
            .flat_map(TranslationResult::into_texts)
            .collect()
    }
}

/// Load datasets, translate the accepted fields in batches, emit one JSON line per record.
pub struct TranslatePipeline<S: Storage + Clone, T: Translator, C: ConfigProvider> {
    storage: S,
    config: C,
    accepted_fields: AcceptedFields,
    dispatcher: ConcurrentDispatcher<T>,
}

impl<S: Storage + Clone, T: Translator, C: ConfigProvider> TranslatePipeline<S, T, C> {
    pub fn new(storage: S, translator: T, config: C) -> Result<Self> {
        validate_positive_number("batch_size", config.batch_size(), 1)?;
        validate_positive_number("num_workers", config.num_workers(), 1)?;

        let dispatcher = ConcurrentDispatcher::new(translator, config.num_workers())
            .with_progress(config.show_progress());

        Ok(Self {
            storage,
            accepted_fields: config.accepted_fields(),
            config,
            dispatcher,
        })
    }

    pub fn accepted_fields(&self) -> &AcceptedFields {
        &self.accepted_fields
    }
}

#[async_trait::async_trait]
impl<S: Storage + Clone, T: Translator, C: ConfigProvider> Pipeline for TranslatePipeline<S, T, C> {
    async fn extract(&self) -> Result<Vec<Record>> {
        let loader = DatasetLoader::new(self.storage.clone(), self.config.dataset_type());
        loader.load_all(self.config.dataset_paths()).await
    }

    async fn transform(&self, mut records: Vec<Record>) -> Result<TransformResult> {
        let mut state = RunState {
            flat: flatten(&records, &self.accepted_fields),
            ..RunState::default()
        };

        if state.flat.is_empty() {
            tracing::info!("No translatable texts found, skipping the router");
        } else {
            let batches = batch_texts(&state.flat.texts, self.config.batch_size())?;
            state.batches = batches.len();
            tracing::info!(
                "Translating {} texts in {} batches with {} workers",
                state.flat.len(),
                state.batches,
                self.dispatcher.num_workers()
            );
            state.results = self.dispatcher.dispatch(batches).await?;
        }

        let translated = state.translated_texts();
        let serialized_records = reconstruct(
            &mut records,
            &state.flat.positions,
            translated,
            &self.accepted_fields,
        )?;

        Ok(TransformResult {
            stats: RunStats {
                records: records.len(),
                texts: state.flat.len(),
                batches: state.batches,
            },
            serialized_records,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut body = result.serialized_records.join("\n");
        if !body.is_empty() {
            body.push('\n');
        }

        match self.config.output_path() {
            Some(path) => {
                tracing::debug!("Writing {} bytes to {}", body.len(), path);
                self.storage.write_file(path, body.as_bytes()).await?;
                Ok(path.to_string())
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(body.as_bytes()).await?;
                stdout.flush().await?;
                Ok("stdout".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::DatasetType;
    use crate::utils::error::TranslateError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn put(&self, path: &str, content: &str) {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), content.as_bytes().to_vec());
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TranslateError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        dataset_paths: Vec<String>,
        accept_fields: Vec<String>,
        num_workers: usize,
        batch_size: usize,
        output_path: Option<String>,
    }

    impl MockConfig {
        fn new(accept_fields: &[&str], num_workers: usize, batch_size: usize) -> Self {
            Self {
                dataset_paths: vec!["data.jsonl".to_string()],
                accept_fields: accept_fields.iter().map(|f| f.to_string()).collect(),
                num_workers,
                batch_size,
                output_path: Some("out/translated.jsonl".to_string()),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn router_host(&self) -> &str {
            "http://router.test"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        fn dataset_paths(&self) -> &[String] {
            &self.dataset_paths
        }

        fn dataset_type(&self) -> Option<DatasetType> {
            None
        }

        fn accepted_fields(&self) -> AcceptedFields {
            AcceptedFields::new(self.accept_fields.iter().cloned())
        }

        fn num_workers(&self) -> usize {
            self.num_workers
        }

        fn batch_size(&self) -> usize {
            self.batch_size
        }

        fn output_path(&self) -> Option<&str> {
            self.output_path.as_deref()
        }

        fn show_progress(&self) -> bool {
            false
        }
    }

    #[derive(Clone, Default)]
    struct UppercaseTranslator {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn translate(&self, texts: &[String]) -> Result<TranslationResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TranslationResult::Sequence(
                texts.iter().map(|t| t.to_uppercase()).collect(),
            ))
        }
    }

    /// Drops the last text of every batch.
    struct LossyTranslator;

    #[async_trait]
    impl Translator for LossyTranslator {
        async fn translate(&self, texts: &[String]) -> Result<TranslationResult> {
            Ok(TranslationResult::Sequence(texts[..texts.len() - 1].to_vec()))
        }
    }

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_transform_hi_bye_for_sequential_and_concurrent() {
        for workers in [1, 4] {
            let pipeline = TranslatePipeline::new(
                MockStorage::new(),
                UppercaseTranslator::default(),
                MockConfig::new(&["text"], workers, 1),
            )
            .unwrap();

            let result = pipeline
                .transform(records(json!([{"text": "hi"}, {"text": "bye"}])))
                .await
                .unwrap();

            assert_eq!(
                result.serialized_records,
                vec![r#"{"text": "HI"}"#, r#"{"text": "BYE"}"#]
            );
            assert_eq!(result.stats, RunStats { records: 2, texts: 2, batches: 2 });
        }
    }

    #[tokio::test]
    async fn test_transform_without_texts_skips_translator() {
        let translator = UppercaseTranslator::default();
        let calls = translator.calls.clone();
        let pipeline = TranslatePipeline::new(
            MockStorage::new(),
            translator,
            MockConfig::new(&["text"], 2, 4),
        )
        .unwrap();

        let empty = pipeline.transform(Vec::new()).await.unwrap();
        assert!(empty.serialized_records.is_empty());

        let no_text = pipeline
            .transform(records(json!([{"id": 1}, {"id": 2}])))
            .await
            .unwrap();
        assert_eq!(no_text.serialized_records, vec!["{}", "{}"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transform_reports_short_batch_instead_of_truncating() {
        let pipeline = TranslatePipeline::new(
            MockStorage::new(),
            LossyTranslator,
            MockConfig::new(&["text"], 1, 2),
        )
        .unwrap();

        let result = pipeline
            .transform(records(json!([{"text": "a"}, {"text": "b"}, {"text": "c"}])))
            .await;

        assert!(matches!(
            result,
            Err(TranslateError::BatchLengthMismatch { index: 0, expected: 2, actual: 1 })
        ));
    }

    #[tokio::test]
    async fn test_runs_are_independent_and_repeatable() {
        let pipeline = TranslatePipeline::new(
            MockStorage::new(),
            UppercaseTranslator::default(),
            MockConfig::new(&["title", "text"], 3, 2),
        )
        .unwrap();
        let input = records(json!([
            {"title": "one", "text": "first", "id": 1},
            {"text": "second"},
            {"title": "three"}
        ]));

        let first = pipeline.transform(input.clone()).await.unwrap();
        let second = pipeline.transform(input).await.unwrap();

        assert_eq!(first.serialized_records, second.serialized_records);
        assert_eq!(first.stats, second.stats);
        assert_eq!(
            first.serialized_records,
            vec![
                r#"{"title": "ONE", "text": "FIRST"}"#,
                r#"{"text": "SECOND"}"#,
                r#"{"title": "THREE"}"#
            ]
        );
    }

    #[tokio::test]
    async fn test_extract_and_load_through_storage() {
        let storage = MockStorage::new();
        storage
            .put("data.jsonl", "{\"text\": \"hi\"}\n{\"text\": \"bye\", \"id\": 2}\n")
            .await;
        let pipeline = TranslatePipeline::new(
            storage.clone(),
            UppercaseTranslator::default(),
            MockConfig::new(&[], 2, 8),
        )
        .unwrap();

        let extracted = pipeline.extract().await.unwrap();
        let result = pipeline.transform(extracted).await.unwrap();
        let destination = pipeline.load(result).await.unwrap();

        assert_eq!(destination, "out/translated.jsonl");
        let written = String::from_utf8(storage.get_file("out/translated.jsonl").await.unwrap()).unwrap();
        assert_eq!(written, "{\"text\": \"HI\"}\n{\"text\": \"BYE\", \"id\": 2}\n");
    }

    #[test]
    fn test_new_rejects_zero_batch_size() {
        let result = TranslatePipeline::new(
            MockStorage::new(),
            UppercaseTranslator::default(),
            MockConfig::new(&["text"], 1, 0),
        );
        assert!(matches!(result, Err(TranslateError::InvalidConfiguration { .. })));
    }
}
