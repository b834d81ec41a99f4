use std::{ffi::OsString, io::ErrorKind, path::Path};

use chrono::NaiveDate;
use tokio::{fs, io};

use crate::utils::time::local_date;

/// Replaces the contents of `path` so that readers only ever see the old or the new contents.
/// Data is written into a sibling file first and then renamed over the target.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), io::Error> {
    let mut staging_name = path
        .file_name()
        .map(OsString::from)
        .ok_or_else(|| io::Error::new(ErrorKind::InvalidInput, "path has no file name"))?;
    staging_name.push(".partial");
    let staging = path.with_file_name(staging_name);

    let result = async {
        fs::write(&staging, contents).await?;
        fs::rename(&staging, path).await
    }
    .await;

    if result.is_err() {
        // Nothing useful can be done if cleanup fails as well.
        let _ = fs::remove_file(&staging).await;
    }
    result
}

/// Reads `path` only if it was last modified on `today` (local time). Returns `Ok(None)` for
/// files that are missing or stale.
pub async fn read_if_modified_on(path: &Path, today: NaiveDate) -> Result<Option<String>, io::Error> {
    let metadata = match fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    if local_date(metadata.modified()?) != today {
        return Ok(None);
    }

    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
