use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "scheduler";
const DB_FILE: &str = "scheduler.sqlite3";
const LOG_DIR: &str = "logs";

/// Resolved on-disk locations.
///
/// Flags and `SCHEDULER_*` env vars win; otherwise everything lives under
/// the platform data directory (e.g. ~/.local/share/scheduler).
pub struct AppPaths {
    pub db: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    pub fn resolve(db: Option<PathBuf>, log_dir: Option<PathBuf>) -> Result<Self> {
        let db = match db {
            Some(path) => absolute(path)?,
            None => Self::data_dir()?.join(DB_FILE),
        };
        let log_dir = match log_dir {
            Some(path) => absolute(path)?,
            None => Self::data_dir()?.join(LOG_DIR),
        };

        if let Some(parent) = db.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }

        Ok(Self { db, log_dir })
    }

    pub fn data_dir() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join(APP_DIR))
    }

    pub fn init_logging(&self, level: Option<&str>) -> Result<()> {
        let level = level.unwrap_or_else(|| scheduler_core::default_log_level());
        scheduler_core::init_logging(level, &self.log_dir)
            .map_err(|err| anyhow::anyhow!("{err}"))
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Could not read current directory")?;
    Ok(cwd.join(path))
}
