// Adapters layer: concrete implementations for external systems (storage, datasets, router http).

pub mod dataset;
pub mod router;
pub mod storage;

pub use dataset::{infer_dataset_type, DatasetLoader};
pub use router::RouterClient;
pub use storage::LocalStorage;
