//! Finding entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finding severity, ordered `Low < Medium < High < Critical`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "MEDIUM")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
    #[serde(alias = "CRITICAL")]
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "info" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// Source location in `file[:line]` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}

impl Location {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Parse `file` or `file:line`.
    ///
    /// A trailing segment that is not a number stays part of the file name,
    /// so Windows-style `C:\src\lib.rs` parses as a bare file.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidLocation(raw.to_string()));
        }
        if let Some((file, line)) = raw.rsplit_once(':')
            && let Ok(line) = line.trim().parse::<u32>()
        {
            if file.is_empty() {
                return Err(DomainError::InvalidLocation(raw.to_string()));
            }
            return Ok(Self::new(file, Some(line)));
        }
        Ok(Self::new(raw, None))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

impl TryFrom<String> for Location {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Location::parse(&value)
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.to_string()
    }
}

/// One reported issue from one agent (Value Object)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Filled in by the coordinator when the agent omits it
    #[serde(default)]
    pub agent: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub finding_type: String,
    pub description: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub phase: u32,
}

impl Finding {
    pub fn new(
        agent: impl Into<String>,
        severity: Severity,
        finding_type: impl Into<String>,
        description: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            agent: agent.into(),
            severity,
            finding_type: finding_type.into(),
            description: description.into(),
            location,
            recommendation: None,
            phase: 0,
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_phase(mut self, phase: u32) -> Self {
        self.phase = phase;
        self
    }

    /// Two findings with the same key describe the same problem.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.location.file, &self.finding_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!("CRITICAL".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_location_parse() {
        assert_eq!(
            Location::parse("src/lib.rs:42").unwrap(),
            Location::new("src/lib.rs", Some(42))
        );
        assert_eq!(
            Location::parse("src/lib.rs").unwrap(),
            Location::new("src/lib.rs", None)
        );
        assert_eq!(
            Location::parse("C:\\src\\lib.rs").unwrap(),
            Location::new("C:\\src\\lib.rs", None)
        );
        assert!(Location::parse("  ").is_err());
        assert!(Location::parse(":12").is_err());
    }

    #[test]
    fn test_finding_from_agent_json() {
        let json = r#"{
            "severity": "HIGH",
            "type": "sql-injection",
            "description": "query built from user input",
            "location": "src/db.rs:17",
            "recommendation": "use bound parameters"
        }"#;
        let finding: Finding = serde_json::from_str(json).unwrap();
        assert_eq!(finding.severity, Severity::High);
        assert_eq!(finding.location.line, Some(17));
        assert_eq!(finding.agent, "");
        assert_eq!(finding.phase, 0);

        let back = serde_json::to_value(&finding).unwrap();
        assert_eq!(back["location"], "src/db.rs:17");
        assert_eq!(back["severity"], "high");
    }

    #[test]
    fn test_dedup_key_ignores_line() {
        let a = Finding::new("x", Severity::Low, "xss", "a", Location::new("f.rs", Some(1)));
        let b = Finding::new("y", Severity::High, "xss", "b", Location::new("f.rs", Some(9)));
        assert_eq!(a.dedup_key(), b.dedup_key());
    }
}
