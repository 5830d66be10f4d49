//! Task classification results.
//!
//! A [`TaskProfile`](profile::TaskProfile) is produced by an external classifier
//! and is read-only for the rest of the system.

pub mod profile;
