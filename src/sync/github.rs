//! GitHub Contents API implementation of `RemoteStore`.
//!
//! One JSON file, addressed by (owner, repo, path):
//! - `GET  /repos/{owner}/{repo}/contents/{path}` returns `{content, sha}` or 404
//! - `PUT  /repos/{owner}/{repo}/contents/{path}` with `{message, content, sha?}`

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{RemoteDocument, RemoteStore};
use crate::data::{JobRecord, Settings};
use crate::error::{Result, TrackerError};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("jobtrack/", env!("CARGO_PKG_VERSION"));
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const COMMIT_MESSAGE: &str = "Update job tracker data";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope of a contents read
#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    #[serde(default)]
    content: String,
    #[serde(default)]
    sha: String,
}

/// Request body of a contents upsert
#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// Client for a single file in a GitHub repository
pub struct GitHubContents {
    client: Client,
    url: String,
    token: String,
}

impl GitHubContents {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_base_url(settings, DEFAULT_API_BASE)
    }

    /// Point the client at a different API root (GitHub Enterprise, test servers)
    pub fn with_base_url(settings: &Settings, base_url: &str) -> Result<Self> {
        let owner = settings.owner.trim();
        let repo = settings.repo.trim();
        if owner.is_empty() || repo.is_empty() {
            return Err(TrackerError::Config(
                "GitHub owner and repository must be set to enable sync".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            base_url.trim_end_matches('/'),
            owner,
            repo,
            settings.remote_path()
        );

        Ok(GitHubContents {
            client,
            url,
            token: settings.token.trim().to_string(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_MEDIA_TYPE)
    }

    fn read_envelope(&self) -> Result<Option<ContentsEnvelope>> {
        let response = self.authorized(self.client.get(&self.url)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response)?;
        Ok(Some(response.json()?))
    }
}

impl RemoteStore for GitHubContents {
    fn fetch(&self) -> Result<Option<RemoteDocument>> {
        let Some(envelope) = self.read_envelope()? else {
            tracing::debug!(url = %self.url, "remote document does not exist yet");
            return Ok(None);
        };
        let records = decode_content(&envelope.content)?;
        tracing::debug!(count = records.len(), sha = %envelope.sha, "fetched remote document");
        Ok(Some(RemoteDocument {
            records,
            revision: envelope.sha,
        }))
    }

    fn write(&self, records: &[JobRecord]) -> Result<()> {
        // The current sha must accompany an overwrite. A concurrent change
        // between this read and the PUT surfaces as an API error.
        let revision = self.read_envelope()?.map(|envelope| envelope.sha);
        let body = upsert_body(records, revision)?;

        let response = self
            .authorized(self.client.put(&self.url))
            .json(&body)
            .send()?;
        ensure_success(response)?;
        tracing::debug!(count = records.len(), "wrote remote document");
        Ok(())
    }
}

fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().unwrap_or_default();
    Err(TrackerError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Decode base64 file content (GitHub wraps it at 60 columns) into records
fn decode_content(content: &str) -> Result<Vec<JobRecord>> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| TrackerError::Decode(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| TrackerError::Decode(e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretty JSON encoded as base64 over its UTF-8 bytes
fn encode_content(records: &[JobRecord]) -> Result<String> {
    let text = serde_json::to_string_pretty(records)?;
    Ok(STANDARD.encode(text.as_bytes()))
}

fn upsert_body(records: &[JobRecord], revision: Option<String>) -> Result<UpsertBody<'static>> {
    Ok(UpsertBody {
        message: COMMIT_MESSAGE,
        content: encode_content(records)?,
        sha: revision.filter(|sha| !sha.is_empty()),
    })
}
