//! Command-line interface argument parsing for jobtrack.
//!
//! - `jobtrack show` opens the job board
//! - `jobtrack list --search rust` prints matching applications
//! - `jobtrack settings --token ... --owner me --repo career` enables GitHub sync

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::data::JobStatus;

/// A terminal job-application tracker with optional GitHub sync.
#[derive(Parser, Debug)]
#[command(name = "jobtrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the job database and log file.
    /// Defaults to $JOBTRACK_DIR, then the platform data directory.
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the TUI job board
    Show,

    /// Print tracked applications, most recent first
    List {
        /// Only show applications whose company, role or job code match
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Track a new application
    Add {
        #[arg(long)]
        company: String,

        #[arg(long)]
        role: String,

        /// Application date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        job_code: Option<String>,

        #[arg(long, default_value = "")]
        url: String,

        #[arg(long, default_value = "Applied")]
        status: JobStatus,
    },

    /// Write a JSON backup of all applications
    Export {
        /// Target directory, defaults to the downloads directory
        #[arg(short, long)]
        dir: Option<String>,
    },

    /// Replace all applications with the contents of a JSON backup
    Import {
        /// Backup file (a JSON array of job records)
        file: String,
    },

    /// Merge with the configured GitHub repository now
    Sync,

    /// Show or change the GitHub sync settings
    Settings {
        /// Personal access token with contents read/write access
        #[arg(long)]
        token: Option<String>,

        /// Repository owner (user or organization)
        #[arg(long)]
        owner: Option<String>,

        /// Repository name
        #[arg(long)]
        repo: Option<String>,

        /// File path inside the repository
        #[arg(long)]
        path: Option<String>,

        /// Remove the stored token, disabling sync
        #[arg(long, conflicts_with = "token")]
        clear_token: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments and the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub verbose: u8,
}

impl AppConfig {
    pub fn from_cli(data_dir: Option<String>, verbose: u8) -> Self {
        let data_dir = data_dir.map(PathBuf::from).unwrap_or_else(|| {
            // Check JOBTRACK_DIR environment variable first
            if let Ok(dir) = std::env::var("JOBTRACK_DIR") {
                PathBuf::from(dir)
            } else {
                dirs::data_dir()
                    .map(|d| d.join("jobtrack"))
                    .unwrap_or_else(|| PathBuf::from(".jobtrack"))
            }
        });

        let export_dir = dirs::download_dir().unwrap_or_else(|| data_dir.join("backups"));

        AppConfig {
            data_dir,
            export_dir,
            verbose,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("jobtrack.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("jobtrack.log")
    }
}
