//! Configuration validation issues.
//!
//! The config loader collects these instead of failing on the first bad
//! value, so every problem in a file is reported at once.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field holds an unknown enum value.
    InvalidEnumValue,
    /// A numeric field is outside its allowed range.
    OutOfRange,
    /// A classification pattern is not a valid regex.
    InvalidPattern,
    /// A permission entry names an unknown action or scope.
    InvalidPermission,
    /// A required value is empty.
    MissingValue,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let issue = ConfigIssue::error(ConfigIssueCode::OutOfRange, "threshold must be in [0, 1]");
        assert!(issue.is_error());
        assert_eq!(issue.to_string(), "error: threshold must be in [0, 1]");

        let issue = ConfigIssue::warning(ConfigIssueCode::InvalidEnumValue, "unknown tier");
        assert!(!issue.is_error());
    }
}
