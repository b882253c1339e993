//! JSON snapshots of dashboard responses.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── 09-15-02.json
//!     └── 14-40-51.json
//! ```

use crate::models::DashboardResponse;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the snapshot for a response produced at `now`.
pub fn snapshot_path<Tz>(json_output_dir: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    json_output_dir
        .join(now.format("%Y-%m-%d").to_string())
        .join(format!("{}.json", now.format("%H-%M-%S")))
}

/// Write `response` as pretty JSON under a date directory and return the path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_response<Tz>(
    response: &DashboardResponse,
    json_output_dir: &Path,
    now: &DateTime<Tz>,
) -> Result<PathBuf, Box<dyn Error>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let json = serde_json::to_string_pretty(response)?;
    let path = snapshot_path(json_output_dir, now);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), articles = response.articles.len(), "Wrote JSON snapshot");
    Ok(path)
}
