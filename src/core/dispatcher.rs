use crate::domain::model::{Batch, TranslationResult};
use crate::domain::ports::Translator;
use crate::utils::error::{Result, TranslateError};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};

/// Runs batches through a [`Translator`], sequentially or over a bounded pool.
///
/// `results[i]` always belongs to `batches[i]`, whatever order the calls
/// complete in. The first failing batch fails the whole dispatch. In
/// concurrent mode the calls already handed to the pool still run to
/// completion before that error is returned.
pub struct ConcurrentDispatcher<T: Translator> {
    translator: T,
    num_workers: usize,
    show_progress: bool,
}

impl<T: Translator> ConcurrentDispatcher<T> {
    pub fn new(translator: T, num_workers: usize) -> Self {
        Self {
            translator,
            num_workers,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    pub async fn dispatch(&self, batches: Vec<Batch>) -> Result<Vec<TranslationResult>> {
        if batches.is_empty() {
            return Ok(Vec::new());
        }

        let progress = self.progress_bar(batches.len());
        let results = if self.num_workers <= 1 {
            self.dispatch_sequential(batches, &progress).await
        } else {
            self.dispatch_concurrent(batches, &progress).await
        };

        match &results {
            Ok(_) => progress.finish_and_clear(),
            Err(_) => progress.abandon(),
        }
        results
    }

    async fn dispatch_sequential(
        &self,
        batches: Vec<Batch>,
        progress: &ProgressBar,
    ) -> Result<Vec<TranslationResult>> {
        tracing::debug!("Dispatching {} batches sequentially", batches.len());

        let mut results = Vec::with_capacity(batches.len());
        for batch in &batches {
            let result = self.translate_batch(batch).await?;
            progress.inc(1);
            results.push(result);
        }
        Ok(results)
    }

    async fn dispatch_concurrent(
        &self,
        batches: Vec<Batch>,
        progress: &ProgressBar,
    ) -> Result<Vec<TranslationResult>> {
        tracing::debug!(
            "Dispatching {} batches across {} workers",
            batches.len(),
            self.num_workers
        );

        let mut slots: Vec<Option<TranslationResult>> = vec![None; batches.len()];
        let mut first_error = None;
        let pending: Vec<_> = batches
            .iter()
            .enumerate()
            .map(|(position, batch)| async move { (position, self.translate_batch(batch).await) })
            .collect();
        let mut completed = stream::iter(pending).buffer_unordered(self.num_workers);

        while let Some((position, result)) = completed.next().await {
            match result {
                Ok(result) => {
                    if let Some(slot) = slots.get_mut(position) {
                        *slot = Some(result);
                    }
                    progress.inc(1);
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| {
                slot.ok_or_else(|| TranslateError::UnresolvedBatch {
                    index: batches[position].index,
                })
            })
            .collect()
    }

    async fn translate_batch(&self, batch: &Batch) -> Result<TranslationResult> {
        tracing::debug!("Translating batch {} ({} texts)", batch.index, batch.len());

        let result = self.translator.translate(&batch.texts).await.map_err(|e| {
            tracing::error!("Batch {} failed: {}", batch.index, e);
            e
        })?;

        // A scalar only answers a single-text batch.
        if result.len() != batch.len() {
            tracing::error!(
                "Batch {} returned {} texts for {} inputs",
                batch.index,
                result.len(),
                batch.len()
            );
            return Err(TranslateError::BatchLengthMismatch {
                index: batch.index,
                expected: batch.len(),
                actual: result.len(),
            });
        }
        Ok(result)
    }

    fn progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} batches")
        {
            bar.set_style(style);
        }
        bar
    }
}
