//! Atomic write primitives
//!
//! Uses temp→rename so readers only ever see a complete file

use crate::errors::{io_error, Result};
use roster_core::errors::{reason, RosterError, RosterErrorKind};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace `target_path` with `content`
///
/// The temporary file lives next to the target so the rename stays on one
/// filesystem. On failure it is removed and the target is left untouched.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(target_path)?;

    if let Some(parent) = target_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| io_error(RosterErrorKind::WriteFailure, "create_snapshot_dir", e))?;
        }
    }

    let written = write_synced(&temp_path, content)
        .and_then(|()| fs::rename(&temp_path, target_path))
        .map_err(|e| io_error(RosterErrorKind::WriteFailure, "replace_snapshot", e));

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

fn temp_path_for(target_path: &Path) -> Result<PathBuf> {
    let file_name = target_path.file_name().ok_or_else(|| {
        RosterError::new(RosterErrorKind::WriteFailure)
            .with_reason(reason::INVALID_PATH)
            .with_op("replace_snapshot")
            .with_message(format!("not a file path: {}", target_path.display()))
    })?;

    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".tmp");
    Ok(target_path.with_file_name(temp_name))
}
