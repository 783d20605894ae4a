//! Catalog persistence.
//!
//! The catalog is an ordered JSON array of projects at a fixed home-relative
//! path. Loading is tolerant: a missing or unparsable file yields an empty
//! catalog. Saving is a synchronous, pretty-printed write performed after
//! every mutation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::project::Project;

/// Reads and writes the project catalog file.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the catalog. A missing or corrupt file is an empty catalog.
    pub fn load(&self) -> Vec<Project> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Writes the catalog, creating parent directories on first save.
    pub fn save(&self, projects: &[Project]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let data =
            serde_json::to_string_pretty(projects).context("failed to serialize catalog")?;
        fs::write(&self.path, data)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Default catalog location under the user's home directory.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not resolve home directory")?;
    Ok(home.join(".config").join("launchpad").join("projects.json"))
}
