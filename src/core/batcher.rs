use crate::domain::model::Batch;
use crate::utils::error::{Result, TranslateError};

/// Splits items into contiguous chunks of `batch_size`; only the last may be shorter.
pub fn batch<T: Clone>(items: &[T], batch_size: usize) -> Result<Vec<Vec<T>>> {
    if batch_size == 0 {
        return Err(TranslateError::invalid_config(
            "batch_size",
            batch_size,
            "Batch size must be a positive integer",
        ));
    }

    Ok(items.chunks(batch_size).map(<[T]>::to_vec).collect())
}

/// Same partition as [`batch`], tagged with batch indices.
pub fn batch_texts(texts: &[String], batch_size: usize) -> Result<Vec<Batch>> {
    Ok(batch(texts, batch_size)?
        .into_iter()
        .enumerate()
        .map(|(index, texts)| Batch { index, texts })
        .collect())
}
