//! Configuration value objects for the domain layer
//!
//! These are used by both the config loader and the presentation layer.

mod output_format;
pub mod validation;

pub use output_format::OutputFormat;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
