use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Invalid configuration for '{field}' ({value}): {reason}")]
    InvalidConfiguration {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Unrecognized dataset format for {path}: {reason}")]
    UnrecognizedFormat { path: String, reason: String },

    #[error("Upstream translation failed: {message}")]
    Upstream { message: String },

    #[error("Batch {index} finished without a result")]
    UnresolvedBatch { index: usize },

    #[error("Batch {index} sent {expected} texts but got {actual} back")]
    BatchLengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Reconstruction mismatch: {expected} positions but {actual} translated texts")]
    ReconstructionMismatch { expected: usize, actual: usize },

    #[error("Position refers to record {record_index} but only {records} records exist")]
    PositionOutOfRange { record_index: usize, records: usize },

    #[error("Dataset error in {path}: {message}")]
    Dataset { path: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Upstream,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl TranslateError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration { .. }
            | Self::MissingConfig { .. }
            | Self::ConfigValidation { .. } => ErrorCategory::Configuration,
            Self::UnrecognizedFormat { .. } | Self::Dataset { .. } => ErrorCategory::Input,
            Self::Upstream { .. } => ErrorCategory::Upstream,
            Self::UnresolvedBatch { .. }
            | Self::BatchLengthMismatch { .. }
            | Self::ReconstructionMismatch { .. }
            | Self::PositionOutOfRange { .. }
            | Self::SerializationError(_) => ErrorCategory::Processing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for a failed run. Never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } | Self::ConfigValidation { .. } => {
                "Check the command line flags or the TOML configuration values"
            }
            Self::MissingConfig { .. } => "Provide the missing option and run again",
            Self::UnrecognizedFormat { .. } => {
                "Use a .json or .jsonl file, or pass --dataset-type explicitly"
            }
            Self::Dataset { .. } | Self::SerializationError(_) => {
                "Make sure every dataset entry is a JSON object"
            }
            Self::Upstream { .. } => {
                "Verify the router host is reachable and the model name is served"
            }
            Self::UnresolvedBatch { .. }
            | Self::BatchLengthMismatch { .. }
            | Self::ReconstructionMismatch { .. }
            | Self::PositionOutOfRange { .. } => {
                "The router returned a different number of texts than it received; try a smaller batch size"
            }
            Self::IoError(_) => "Check file paths and permissions",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Could not read the dataset: {}", self),
            ErrorCategory::Upstream => format!("The translation router failed: {}", self),
            ErrorCategory::Processing => format!("Translation results could not be assembled: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
