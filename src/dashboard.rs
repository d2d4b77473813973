//! HTTP client for the project dashboard
//!
//! The dashboard exposes the project register as a flat JSON array under
//! `/api/projects`. This module owns the wire format and its quirks (ids
//! that arrive as strings or numbers, two payload shapes, optional columns)
//! and converts records into the plain [`ProjectInterval`] the occupancy
//! engine consumes.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::occupancy::ProjectInterval;
use crate::utils;

/// Envelope some dashboard deployments wrap the project list in
#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Option<Vec<ProjectRecord>>,
    error: Option<String>,
}

/// One project as the dashboard serves it
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(deserialize_with = "deserialize_string_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub manager: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub discipline: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub planned_end_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ProjectRecord {
    /// Reduce the wire record to what the occupancy engine needs.
    ///
    /// The working end date is the planned end date when set, otherwise the
    /// actual end date. Unparseable or missing dates become None, which the
    /// engine treats as "never active".
    pub fn to_interval(&self) -> ProjectInterval {
        let end_source = self
            .planned_end_date
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.end_date.as_deref());

        ProjectInterval {
            id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.clone(),
            manager: self.manager.clone(),
            location: self.location.clone(),
            organization: self.organization.clone(),
            category: self.category.clone(),
            discipline: self.discipline.clone(),
            start: self.start_date.as_deref().and_then(utils::parse_date),
            end: end_source.and_then(utils::parse_date),
        }
    }
}

/// Convert a batch of wire records for the engine
pub fn to_intervals(records: &[ProjectRecord]) -> Vec<ProjectInterval> {
    records.iter().map(ProjectRecord::to_interval).collect()
}

// Custom deserializer: dashboard ids come back as strings or numbers
// depending on the backing store
fn deserialize_string_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Number(num) => Ok(num.to_string()),
        Value::String(s) => Ok(s),
        _ => Err(serde::de::Error::custom("ID must be a string or number")),
    }
}

pub struct DashboardClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DashboardClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        DashboardClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Fetch the full project register
    pub async fn get_projects(&self) -> Result<Vec<ProjectRecord>> {
        self.get_projects_verbose(false).await
    }

    /// Fetch the full project register, optionally echoing the raw response
    pub async fn get_projects_verbose(&self, verbose: bool) -> Result<Vec<ProjectRecord>> {
        let body = self.send_request("/api/projects", verbose).await?;
        let records = parse_projects(&body)?;
        tracing::debug!(count = records.len(), "Parsed project list");
        Ok(records)
    }

    async fn send_request(&self, path: &str, verbose: bool) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "Requesting dashboard endpoint");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => ApiError::AuthenticationFailed,
                404 => ApiError::ProjectsNotFound,
                429 => ApiError::RateLimitExceeded,
                _ => {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    ApiError::RequestFailed(format!("{}: {}", status, error_text))
                }
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        if verbose {
            let preview = if body.len() > 500 {
                format!("{}...", &body[..500])
            } else {
                body.clone()
            };
            println!("Dashboard response: {}", preview);
        }

        Ok(body)
    }

    /// Cheap reachability/authentication check used during first-run setup
    pub async fn test_connection(&self) -> Result<()> {
        self.get_projects().await?;
        Ok(())
    }
}

/// Parse a project-list payload in either accepted shape.
///
/// Most deployments return a bare array; older ones wrap it in an envelope
/// that may carry an application-level error instead of data.
pub fn parse_projects(json: &str) -> Result<Vec<ProjectRecord>> {
    if let Ok(records) = serde_json::from_str::<Vec<ProjectRecord>>(json) {
        return Ok(records);
    }

    let response: ProjectsResponse = serde_json::from_str(json)
        .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse project list: {}", e)))?;

    if let Some(message) = response.error {
        return Err(ApiError::RequestFailed(message).into());
    }

    response
        .projects
        .ok_or_else(|| ApiError::ProjectsNotFound.into())
}


// Made with Bob
