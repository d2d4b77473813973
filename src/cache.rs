use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::dashboard::ProjectRecord;

/// On-disk snapshot of the last fetched project register.
///
/// Powers `--offline` runs and gives the interactive UI something to draw
/// before the first network round-trip completes. This caches raw wire
/// records, never computed buckets - the occupancy view is always derived
/// fresh from projects, criteria and range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCache {
    pub projects: Vec<ProjectRecord>,
    pub last_updated: String, // ISO 8601 timestamp
}

impl ProjectCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        ProjectCache {
            projects: Vec::new(),
            last_updated: Local::now().to_rfc3339(),
        }
    }

    /// Get the cache file path
    pub fn get_cache_path() -> Option<PathBuf> {
        ProjectDirs::from("nl", "bezetting", "bezetting")
            .map(|proj_dirs| proj_dirs.cache_dir().join("projects_cache.json"))
    }

    /// Load cache from disk
    pub fn load() -> Result<Self> {
        let cache_path =
            Self::get_cache_path().ok_or_else(|| anyhow!("Could not determine cache directory"))?;

        if !cache_path.exists() {
            return Ok(Self::new());
        }

        let cache_data = fs::read_to_string(&cache_path)
            .map_err(|e| anyhow!("Failed to read cache file: {}", e))?;

        let cache: ProjectCache = serde_json::from_str(&cache_data)
            .map_err(|e| anyhow!("Failed to parse cache: {}", e))?;

        Ok(cache)
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        let cache_path =
            Self::get_cache_path().ok_or_else(|| anyhow!("Could not determine cache directory"))?;

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create cache directory: {}", e))?;
        }

        let cache_data = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize cache: {}", e))?;

        fs::write(&cache_path, cache_data)
            .map_err(|e| anyhow!("Failed to write cache file: {}", e))?;

        Ok(())
    }

    /// Replace the snapshot with a freshly fetched register
    pub fn update(&mut self, projects: Vec<ProjectRecord>) {
        self.projects = projects;
        self.last_updated = Local::now().to_rfc3339();
    }

    /// Check if cache is stale (older than specified hours)
    pub fn is_stale(&self, hours: i64) -> bool {
        if let Ok(last_updated) = DateTime::parse_from_rfc3339(&self.last_updated) {
            let now = Local::now();
            let duration = now.signed_duration_since(last_updated);
            duration.num_hours() > hours
        } else {
            true // If we can't parse the date, consider it stale
        }
    }

    /// Discard the snapshot
    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.projects.clear();
        self.last_updated = Local::now().to_rfc3339();
    }
}

impl Default for ProjectCache {
    fn default() -> Self {
        Self::new()
    }
}


// Made with Bob
