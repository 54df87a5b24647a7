use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;

/// Filesystem storage. Relative paths resolve against `base_path`; absolute paths are used as given.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn current_dir() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_nested_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

        storage.write_file("out/records.jsonl", b"{}\n").await.unwrap();
        let data = storage.read_file("out/records.jsonl").await.unwrap();

        assert_eq!(data, b"{}\n");
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.json");
        std::fs::write(&file, "[]").unwrap();

        let storage = LocalStorage::new("/nonexistent-base");
        let data = storage.read_file(file.to_str().unwrap()).await.unwrap();

        assert_eq!(data, b"[]");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let storage = LocalStorage::current_dir();
        let result = storage.read_file("definitely/not/here.json").await;
        assert!(matches!(result, Err(crate::utils::error::TranslateError::IoError(_))));
    }
}
