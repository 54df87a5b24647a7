use crate::adapters::router::DEFAULT_TIMEOUT_SECS;
use crate::domain::model::AcceptedFields;
use crate::domain::ports::{ConfigProvider, DatasetType};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "translate-texts")]
#[command(about = "Translate text fields of JSON / JSON-Lines datasets through an LLM router")]
pub struct CliConfig {
    /// Base URL of the LLM router service (e.g. http://localhost:8000)
    #[arg(long = "llm-router-host")]
    pub router_host: String,

    /// Model name to use for translation
    #[arg(long)]
    pub model: String,

    /// Path to a dataset file; repeat to process several files
    #[arg(long = "dataset-path", required = true)]
    pub dataset_paths: Vec<String>,

    /// Explicit dataset type; inferred from each file's extension when omitted
    #[arg(long, value_enum)]
    pub dataset_type: Option<DatasetType>,

    /// Field to translate and keep; repeat for several. All fields are kept when omitted
    #[arg(long = "accept-field")]
    pub accept_fields: Vec<String>,

    /// Number of concurrent translation requests (1 runs sequentially)
    #[arg(long, default_value = "1")]
    pub num_workers: usize,

    /// How many texts to send in a single request
    #[arg(long, default_value = "8")]
    pub batch_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Write translated records here (one JSON object per line) instead of stdout
    #[arg(long)]
    pub output_path: Option<String>,

    /// Show a batch progress bar on stderr
    #[arg(long)]
    pub progress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn router_host(&self) -> &str {
        &self.router_host
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dataset_paths(&self) -> &[String] {
        &self.dataset_paths
    }

    fn dataset_type(&self) -> Option<DatasetType> {
        self.dataset_type
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
        self.progress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_url("llm_router_host", &self.router_host)?;
        validate_non_empty_string("model", &self.model)?;
        validate_non_empty_list("dataset_path", &self.dataset_paths)?;
        for path in &self.dataset_paths {
            validate_path("dataset_path", path)?;
        }
        for field in &self.accept_fields {
            validate_non_empty_string("accept_field", field)?;
        }
        validate_positive_number("num_workers", self.num_workers, 1)?;
        validate_positive_number("batch_size", self.batch_size, 1)?;
        validate_positive_number("timeout_secs", self.timeout_secs as usize, 1)?;
        if let Some(output_path) = &self.output_path {
            validate_path("output_path", output_path)?;
        }
        Ok(())
    }
}
