//! Data models for tracked job applications and sync settings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default file path of the remote JSON document inside the repository
pub const DEFAULT_REMOTE_PATH: &str = "jobs.json";

/// Application stage of a tracked job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobStatus {
    Wishlist,
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Withdrawn,
    /// Any status string this build does not recognise
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Stages selectable from the edit form, in pipeline order
    pub const ALL: [JobStatus; 6] = [
        JobStatus::Wishlist,
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offer,
        JobStatus::Rejected,
        JobStatus::Withdrawn,
    ];

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Wishlist => "Wishlist",
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offer => "Offer",
            JobStatus::Rejected => "Rejected",
            JobStatus::Withdrawn => "Withdrawn",
            JobStatus::Unknown => "Unknown",
        }
    }

    /// Next selectable stage (wraps around). `Unknown` moves to the first stage.
    pub fn next(self) -> Self {
        match Self::ALL.iter().position(|s| *s == self) {
            Some(idx) => Self::ALL[(idx + 1) % Self::ALL.len()],
            None => Self::ALL[0],
        }
    }

    pub fn prev(self) -> Self {
        match Self::ALL.iter().position(|s| *s == self) {
            Some(idx) => Self::ALL[idx.checked_sub(1).unwrap_or(Self::ALL.len() - 1)],
            None => Self::ALL[0],
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    /// Case-insensitive match against the selectable stages
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|s| s.label()).collect();
                format!("unknown status {wanted:?} (expected one of: {})", names.join(", "))
            })
    }
}

/// One tracked job application.
///
/// Every field except `id` tolerates being absent so that hand-edited backups
/// and documents written by other clients still load. Fields this build does
/// not know about are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    /// Calendar date as an ISO string (`YYYY-MM-DD`)
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_code: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: JobStatus,
    /// Set once when the record is first added
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    /// Parse `date` into a calendar date, accepting plain dates and RFC 3339 timestamps
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }

    /// Case-insensitive search over company, role and job code
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.company.to_lowercase().contains(&query)
            || self.role.to_lowercase().contains(&query)
            || self
                .job_code
                .as_deref()
                .is_some_and(|code| code.to_lowercase().contains(&query))
    }
}

/// Ids are opaque, but older backups may carry numeric ids
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Field-wise update for an existing record. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPatch {
    pub id: String,
    pub company: Option<String>,
    pub role: Option<String>,
    pub date: Option<String>,
    pub job_code: Option<Option<String>>,
    pub url: Option<String>,
    pub status: Option<JobStatus>,
}

impl JobPatch {
    pub fn new(id: impl Into<String>) -> Self {
        JobPatch {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Overwrite the provided fields on `record`
    pub fn apply(self, record: &mut JobRecord) {
        if let Some(company) = self.company {
            record.company = company;
        }
        if let Some(role) = self.role {
            record.role = role;
        }
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(job_code) = self.job_code {
            record.job_code = job_code;
        }
        if let Some(url) = self.url {
            record.url = url;
        }
        if let Some(status) = self.status {
            record.status = status;
        }
    }
}

/// GitHub sync settings, persisted locally as a singleton
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
            path: DEFAULT_REMOTE_PATH.to_string(),
        }
    }
}

impl Settings {
    /// A non-empty token is the only switch for remote sync
    pub fn sync_enabled(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Remote path, falling back to the default when left blank
    pub fn remote_path(&self) -> &str {
        let path = self.path.trim().trim_start_matches('/');
        if path.is_empty() {
            DEFAULT_REMOTE_PATH
        } else {
            path
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Settings")
            .field("token", &token)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .finish()
    }
}
