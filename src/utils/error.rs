use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Malformed displacement count '{}'{}: {}", .value, row_suffix(.row), .reason)]
    MalformedCount {
        value: String,
        reason: String,
        row: Option<usize>,
    },

    #[error("Missing required column '{column}' in displacement table")]
    MissingColumn { column: String },

    #[error("Unknown period '{period}'")]
    UnknownPeriod { period: String },

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

    #[error("Missing required configuration field '{field}'")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {}", r)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, EtlError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Configuration,
    Io,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn malformed_count(value: impl Into<String>, reason: impl Into<String>) -> Self {
        EtlError::MalformedCount {
            value: value.into(),
            reason: reason.into(),
            row: None,
        }
    }

    /// Attach a 1-based data row number to a count error. Other errors pass through.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            EtlError::MalformedCount { value, reason, .. } => EtlError::MalformedCount {
                value,
                reason,
                row: Some(row),
            },
            other => other,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_)
            | EtlError::MalformedCount { .. }
            | EtlError::MissingColumn { .. }
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::TomlError(_)
            | EtlError::UnknownPeriod { .. }
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::SerializationError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::MalformedCount { row: Some(row), .. } => format!(
                "Fix the Number_Displaced value on data row {} (use digits, optionally a range like 1,000–2,000)",
                row
            ),
            EtlError::MalformedCount { .. } => {
                "Use digits, optionally a range like 1,000–2,000 separated by an en-dash".to_string()
            }
            EtlError::MissingColumn { column } => format!(
                "Add a '{}' column to the displacement table header",
                column
            ),
            EtlError::UnknownPeriod { .. } => {
                "Select one of the periods listed in the [[periods]] configuration".to_string()
            }
            EtlError::CsvError(_) => "Check that the data file is valid CSV".to_string(),
            EtlError::IoError(_) => "Check that the paths exist and are readable/writable".to_string(),
            EtlError::TomlError(_) => "Check the configuration file for TOML syntax errors".to_string(),
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the configuration file and command-line overrides".to_string()
            }
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                "Re-run with --verbose and report the log output".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Data => format!("The displacement data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Io => format!("A file could not be read or written: {}", self),
            ErrorCategory::Internal => format!("An internal error occurred: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_count_message_includes_row() {
        let err = EtlError::malformed_count("abc", "not an integer").at_row(4);
        assert_eq!(
            err.to_string(),
            "Malformed displacement count 'abc' at row 4: not an integer"
        );
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_malformed_count_message_without_row() {
        let err = EtlError::malformed_count("1–2–3", "expected exactly two range bounds");
        assert_eq!(
            err.to_string(),
            "Malformed displacement count '1–2–3': expected exactly two range bounds"
        );
    }

    #[test]
    fn test_at_row_leaves_other_errors_alone() {
        let err = EtlError::UnknownPeriod {
            period: "2001".to_string(),
        }
        .at_row(3);
        assert!(matches!(err, EtlError::UnknownPeriod { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_io_error_is_medium_severity() {
        let err = EtlError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.user_friendly_message().starts_with("A file could not be read"));
    }
}
