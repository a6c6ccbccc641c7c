use thiserror::Error;

#[derive(Error, Debug)]
pub enum GpaError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{notice}")]
    PrivacyBlocked { notice: String },

    #[error("No grades found for student {student_id}")]
    NoGradesFound {
        student_id: String,
        debug_trace: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GpaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GpaError::ConfigError { .. }
            | GpaError::ConfigValidationError { .. }
            | GpaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GpaError::ValidationError { .. } | GpaError::PrivacyBlocked { .. } => {
                ErrorCategory::Input
            }
            GpaError::NoGradesFound { .. }
            | GpaError::ProcessingError { .. }
            | GpaError::CsvError(_)
            | GpaError::SerializationError(_) => ErrorCategory::Data,
            GpaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 隱私保護不是失敗，只是拒絕查詢
            GpaError::PrivacyBlocked { .. } => ErrorSeverity::Low,
            GpaError::NoGradesFound { .. } => ErrorSeverity::Medium,
            GpaError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            GpaError::PrivacyBlocked { notice } => notice.clone(),
            GpaError::NoGradesFound { student_id, .. } => format!(
                "No grades could be found for student '{}' in any course.",
                student_id
            ),
            GpaError::ValidationError { message } => message.clone(),
            other if other.category() == ErrorCategory::Configuration => {
                format!("The curriculum configuration is invalid: {}", other)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => "Fix the curriculum TOML file and run with --dry-run to verify it",
            ErrorCategory::Input => "Check the student identifier and try again",
            ErrorCategory::Data => "Verify the student identifier, or check the sources and proxy strategies in [fetch]",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// 完全找不到成績時附帶的逐課程除錯紀錄
    pub fn debug_trace(&self) -> Option<&[String]> {
        match self {
            GpaError::NoGradesFound { debug_trace, .. } => Some(debug_trace),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GpaError>;
