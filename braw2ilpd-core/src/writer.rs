//! Crash-safe persistence of text artifacts.
//!
//! Content goes to a sibling temporary file first and is renamed onto the
//! destination only after the write has been flushed and synced, so a
//! destination is never observed in a partially written state.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Suffix appended to the destination path for the in-flight temporary file.
const TMP_SUFFIX: &str = ".tmp";

/// Writes `content` to `dest` atomically.
///
/// Parent directories are created as needed. On any failure before the
/// rename, the temporary file is removed (best effort) and the destination
/// is left untouched.
pub fn write_atomic(dest: &Path, content: &str) -> CoreResult<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::AtomicWrite(format!(
                    "failed to create parent directory for '{}': {}",
                    dest.display(),
                    e
                ))
            })?;
        }
    }

    let tmp_path = tmp_path_for(dest);
    if let Err(e) = write_and_sync(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CoreError::AtomicWrite(format!(
            "failed to write '{}': {}",
            dest.display(),
            e
        )));
    }

    if let Err(e) = fs::rename(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(CoreError::AtomicWrite(format!(
            "failed to publish '{}': {}",
            dest.display(),
            e
        )));
    }

    Ok(())
}

fn tmp_path_for(dest: &Path) -> PathBuf {
    let mut tmp = dest.as_os_str().to_os_string();
    tmp.push(TMP_SUFFIX);
    PathBuf::from(tmp)
}

fn write_and_sync(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}
