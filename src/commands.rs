//! Non-interactive subcommands. Each opens the store, does one thing and exits.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};

use crate::cli::{AppConfig, Commands};
use crate::data::{github_remote, JobRecord, JobStore, Settings, Storage};
use crate::sync::{Phase, StatusKind};

/// Upper bound for a fetch plus a write at the client timeout
const SYNC_WAIT_LIMIT: Duration = Duration::from_secs(90);

/// Open the store backing `config`
pub fn open_store(config: &AppConfig) -> Result<JobStore> {
    let db_path = config.db_path();
    let storage = Storage::open(&db_path)
        .with_context(|| format!("Failed to open job database: {db_path:?}"))?;
    JobStore::open(storage, github_remote()).context("Failed to load job data")
}

pub fn run(config: &AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Show => crate::app::run(config.clone()),
        Commands::List { search } => list(config, search.as_deref()),
        Commands::Add {
            company,
            role,
            date,
            job_code,
            url,
            status,
        } => {
            let record = JobRecord {
                company,
                role,
                date: normalize_date(date.as_deref())?,
                job_code: job_code.filter(|c| !c.trim().is_empty()),
                url,
                status,
                ..Default::default()
            };
            add(config, record)
        }
        Commands::Export { dir } => {
            let dir = dir
                .map(PathBuf::from)
                .unwrap_or_else(|| config.export_dir.clone());
            export(config, &dir)
        }
        Commands::Import { file } => import(config, Path::new(&file)),
        Commands::Sync => sync(config),
        Commands::Settings {
            token,
            owner,
            repo,
            path,
            clear_token,
        } => settings(config, token, owner, repo, path, clear_token),
    }
}

/// Default to today, otherwise require `YYYY-MM-DD`
fn normalize_date(date: Option<&str>) -> Result<String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        Some(raw) => {
            let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))?;
            Ok(parsed.format("%Y-%m-%d").to_string())
        }
    }
}

fn list(config: &AppConfig, search: Option<&str>) -> Result<()> {
    let store = open_store(config)?;
    if store.is_empty() {
        println!("No applications tracked yet. Add one with `jobtrack add`.");
        return Ok(());
    }
    let jobs: Vec<JobRecord> = store
        .get_all()
        .into_iter()
        .filter(|j| j.matches(search.unwrap_or_default()))
        .collect();

    for job in &jobs {
        println!("{}", format_line(job));
    }
    println!("Tracking {} active opportunities", jobs.len());
    Ok(())
}

fn format_line(job: &JobRecord) -> String {
    let code = job
        .job_code
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!(" #{c}"))
        .unwrap_or_default();
    format!(
        "{:<10} {:<13} {} / {}{}",
        job.date,
        job.status.label(),
        job.company,
        job.role,
        code
    )
}

fn add(config: &AppConfig, record: JobRecord) -> Result<()> {
    let mut store = open_store(config)?;
    let added = store.add(record).context("Failed to save job")?;
    println!("Added {} ({})", added.company, added.id);
    finish_pending_sync(&mut store)
}

fn export(config: &AppConfig, dir: &Path) -> Result<()> {
    let store = open_store(config)?;
    let path = store
        .export_data(dir)
        .with_context(|| format!("Failed to export to {dir:?}"))?;
    println!("Exported {} applications to {}", store.len(), path.display());
    Ok(())
}

fn import(config: &AppConfig, file: &Path) -> Result<()> {
    let mut store = open_store(config)?;
    let count = store
        .import_data(file)
        .with_context(|| format!("Failed to import {file:?}"))?;
    println!("Imported {count} applications");
    finish_pending_sync(&mut store)
}

fn sync(config: &AppConfig) -> Result<()> {
    let mut store = open_store(config)?;
    let status = store.sync_now_blocking()?;
    report_status(status.message, status.kind)?;
    println!("Tracking {} active opportunities", store.len());
    Ok(())
}

fn settings(
    config: &AppConfig,
    token: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
    path: Option<String>,
    clear_token: bool,
) -> Result<()> {
    let mut store = open_store(config)?;
    let current = store.settings().clone();

    if token.is_none() && owner.is_none() && repo.is_none() && path.is_none() && !clear_token {
        println!("{}", describe_settings(&current));
        return Ok(());
    }

    let updated = Settings {
        token: if clear_token {
            String::new()
        } else {
            token.unwrap_or(current.token)
        },
        owner: owner.unwrap_or(current.owner),
        repo: repo.unwrap_or(current.repo),
        path: path.unwrap_or(current.path),
    };
    store
        .save_settings(updated)
        .context("Settings saved, but sync could not be enabled")?;
    println!("{}", describe_settings(store.settings()));
    finish_pending_sync(&mut store)
}

fn describe_settings(settings: &Settings) -> String {
    format!(
        "token: {}\nowner: {}\nrepo:  {}\npath:  {}\nsync:  {}",
        if settings.token.is_empty() { "(not set)" } else { "(set)" },
        settings.owner,
        settings.repo,
        settings.remote_path(),
        if settings.sync_enabled() { "enabled" } else { "disabled" },
    )
}

/// Mutations hand sync to a worker thread; a one-shot command waits for it
/// so the process does not exit mid-request.
fn finish_pending_sync(store: &mut JobStore) -> Result<()> {
    if !store.sync_enabled() {
        return Ok(());
    }
    let deadline = Instant::now() + SYNC_WAIT_LIMIT;
    loop {
        store.pump_sync_events()?;
        let settled = store.sync_phase() == Phase::Idle
            && store
                .sync_status()
                .is_some_and(|s| s.kind != StatusKind::Info);
        if settled {
            break;
        }
        if Instant::now() >= deadline {
            bail!("Timed out waiting for sync to finish");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    if let Some(status) = store.sync_status() {
        report_status(status.message, status.kind)?;
    }
    Ok(())
}

fn report_status(message: &str, kind: StatusKind) -> Result<()> {
    match kind {
        StatusKind::Error => bail!("{message} (run with -v for details)"),
        _ => {
            println!("{message}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::JobStatus;

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date(Some("2026-02-03")).unwrap(), "2026-02-03");
        assert_eq!(normalize_date(Some(" 2026-02-03 ")).unwrap(), "2026-02-03");
        assert!(normalize_date(Some("03/02/2026")).is_err());
        assert_eq!(normalize_date(None).unwrap().len(), 10);
    }

    #[test]
    fn test_format_line() {
        let job = JobRecord {
            company: "Acme".to_string(),
            role: "SRE".to_string(),
            date: "2026-02-03".to_string(),
            job_code: Some("R1".to_string()),
            status: JobStatus::Offer,
            ..Default::default()
        };
        let line = format_line(&job);
        assert!(line.starts_with("2026-02-03 Offer"));
        assert!(line.ends_with("Acme / SRE #R1"));
    }

    #[test]
    fn test_add_then_list_against_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::from_cli(Some(dir.path().display().to_string()), 0);
        run(
            &config,
            Commands::Add {
                company: "Acme".to_string(),
                role: "SRE".to_string(),
                date: Some("2026-02-03".to_string()),
                job_code: Some(String::new()),
                url: String::new(),
                status: JobStatus::Applied,
            },
        )
        .unwrap();

        let store = open_store(&config).unwrap();
        let jobs = store.get_all();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].job_code, None);
    }

    #[test]
    fn test_describe_settings_hides_token() {
        let settings = Settings {
            token: "ghp_secret".to_string(),
            owner: "me".to_string(),
            repo: "career".to_string(),
            ..Settings::default()
        };
        let text = describe_settings(&settings);
        assert!(!text.contains("ghp_secret"));
        assert!(text.contains("sync:  enabled"));
    }
}
