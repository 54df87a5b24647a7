use crate::adapters::router::DEFAULT_TIMEOUT_SECS;
use crate::domain::model::AcceptedFields;
use crate::domain::ports::{ConfigProvider, DatasetType};
use crate::utils::error::{Result, TranslateError};
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub router: RouterConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    pub output: Option<OutputConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub host: String,
    pub model: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub paths: Vec<String>,
    pub r#type: Option<DatasetType>,
    #[serde(default)]
    pub accept_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub num_workers: Option<usize>,
    pub batch_size: Option<usize>,
    pub progress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Like [`TomlConfig::from_toml_str`], resolving `${VAR}` through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| TranslateError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the looked-up value; unknown variables are left as written.
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TranslateError::ConfigValidation {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.router.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn router_host(&self) -> &str {
        &self.router.host
    }

    fn model(&self) -> &str {
        &self.router.model
    }

    fn dataset_paths(&self) -> &[String] {
        &self.dataset.paths
    }

    fn dataset_type(&self) -> Option<DatasetType> {
        self.dataset.r#type
    }

    fn accepted_fields(&self) -> AcceptedFields {
        AcceptedFields::new(self.dataset.accept_fields.iter().cloned())
    }

    fn num_workers(&self) -> usize {
        self.dispatch.num_workers.unwrap_or(1)
    }

    fn batch_size(&self) -> usize {
        self.dispatch.batch_size.unwrap_or(8)
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.path.as_deref())
    }

    fn show_progress(&self) -> bool {
        self.dispatch.progress.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("router.host", &self.router.host)?;
        validate_non_empty_string("router.model", &self.router.model)?;
        validate_positive_number("router.timeout_seconds", self.timeout_seconds() as usize, 1)?;
        validate_non_empty_list("dataset.paths", &self.dataset.paths)?;
        for path in &self.dataset.paths {
            validate_path("dataset.paths", path)?;
        }
        validate_positive_number("dispatch.num_workers", self.num_workers(), 1)?;
        validate_positive_number("dispatch.batch_size", self.batch_size(), 1)?;
        if let Some(path) = self.output_path() {
            validate_path("output.path", path)?;
        }
        Ok(())
    }
}
