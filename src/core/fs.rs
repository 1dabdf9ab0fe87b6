//! File system helpers: data directory resolution and atomic publishing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::DATA_DIR_ENV_VAR;

/// Resolve the root directory for artifacts.
///
/// Order: explicit value, `FPL_GAMEWEEK_DATA_DIR`, the platform data dir,
/// and finally `./fpl-gameweek`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV_VAR) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fpl-gameweek")
}

/// Write `contents` to `path` so readers never observe a partial file.
///
/// The bytes go to a hidden sibling temp file which is synced and then renamed
/// over `path`. When `overwrite` is false and `path` appears in the meantime,
/// the temp file is discarded and `Ok(false)` is returned.
pub fn publish_atomically(path: &Path, contents: &[u8], overwrite: bool) -> std::io::Result<bool> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let tmp = temp_path_for(path);
    let result = write_synced(&tmp, contents).and_then(|()| {
        // Narrow check-then-act window: another writer may have published
        // between the caller's existence check and now.
        if !overwrite && path.exists() {
            return Ok(false);
        }
        fs::rename(&tmp, path)?;
        Ok(true)
    });

    if !matches!(result, Ok(true)) {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(contents)?;
    f.sync_all()
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
