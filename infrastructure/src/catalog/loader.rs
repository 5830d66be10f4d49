//! TOML agent catalog loader
//!
//! ```toml
//! [[agents]]
//! name = "security-auditor"
//! category = "reviewer"
//! description = "Finds authentication and injection flaws"
//! dimensions = ["security"]
//! domains = ["authentication"]
//! model_tier = "high"
//! ```

use serde::Deserialize;
use squad_domain::{AgentCatalog, AgentDescriptor};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Cannot read agent catalog {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Invalid agent catalog: {0}")]
    Parse(String),
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    agents: Vec<AgentDescriptor>,
}

pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> Result<AgentCatalog, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let catalog = Self::parse(&content)?;
        info!("Loaded {} agents from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse catalog TOML. Agents with a blank name are rejected; later
    /// duplicates of a name are dropped with a warning.
    pub fn parse(content: &str) -> Result<AgentCatalog, CatalogError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;

        if let Some(index) = file.agents.iter().position(|a| a.name.trim().is_empty()) {
            return Err(CatalogError::Parse(format!(
                "agent #{} has an empty name",
                index + 1
            )));
        }

        let declared = file.agents.len();
        let catalog = AgentCatalog::new(file.agents);
        if catalog.len() < declared {
            warn!(
                "Agent catalog declares {} duplicate agent name(s); keeping the first of each",
                declared - catalog.len()
            );
        }
        Ok(catalog)
    }
}
