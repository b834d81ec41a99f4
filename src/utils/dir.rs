use std::{env, io, path::PathBuf};

use anyhow::{anyhow, Result};

/// Directory holding logs and `settings.json`. Tries `$XDG_STATE_HOME` and falls back to
/// `$HOME/.local/state` on unix, `%APPDATA%` on Windows.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        cfg_if::cfg_if! {
            if #[cfg(windows)] {
                let mut path = env::var("APPDATA")
                    .map(PathBuf::from)
                    .map_err(|_| anyhow!("APPDATA should be present on Windows"))?;
                path.push("keyrace");
                path
            } else {
                let mut path = env::var("XDG_STATE_HOME")
                    .map(PathBuf::from)
                    .or_else(|_| {
                        home_dir().map(|mut path| {
                            path.push(".local/state");
                            path
                        })
                    })
                    .map_err(|_| anyhow!("Couldn't find neither XDG_STATE_HOME nor HOME"))?;
                path.push("keyrace");
                path
            }
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// The user's home directory. Count files live directly inside it.
pub fn home_dir() -> Result<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Couldn't find home directory"))
}
