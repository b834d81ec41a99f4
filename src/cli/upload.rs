use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use crate::{
    config::{SettingsFile, SettingsSource},
    daemon::{
        create_reporting_client,
        reporting::{CountReport, ReportingClient, UploadError},
        storage::snapshot_storage::{FileSnapshotStore, SnapshotStore},
    },
};

use super::output::leaderboard::render_leaderboard;

/// Sends today's stored total and prints the leaderboard the service answers with.
pub async fn upload_once(app_dir: &Path, counts_dir: &Path) -> Result<()> {
    let settings_file = SettingsFile::in_dir(app_dir);
    let settings = settings_file.current();
    let Some(token) = settings.token.clone() else {
        println!("No token configured. Set `token` in {app_dir:?}/settings.json or KEYRACE_TOKEN");
        return Ok(());
    };

    let today = Local::now().date_naive();
    let count = FileSnapshotStore::new(counts_dir)
        .load(today)
        .await
        .total
        .unwrap_or(0);

    let client = create_reporting_client(&settings_file)?;
    let report = CountReport {
        count,
        only_follows: settings.only_follows,
        token,
    };
    let leaderboard = tokio::time::timeout(settings.upload_timeout(), client.upload(report))
        .await
        .unwrap_or(Err(UploadError::Timeout(settings.upload_timeout())))
        .context("Failed to upload count")?;

    print!("{}", render_leaderboard(&leaderboard));
    Ok(())
}
