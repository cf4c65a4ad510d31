//! Temp-file-then-rename replacement of whole files.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Sibling path used while rewriting `path`: `store.json` → `store.json.tmp`
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Create (truncating) the temp sibling of `path` for writing
pub(crate) fn create_temp(path: &Path) -> Result<(PathBuf, File)> {
    let tmp = temp_path(path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)?;
    Ok((tmp, file))
}

/// Sync `file`, then rename `tmp` over `path`.
/// The temp file is removed if anything fails before the rename lands.
pub(crate) fn commit(tmp: &Path, file: File, path: &Path) -> Result<()> {
    let synced = file.sync_all();
    drop(file);
    let result = synced.and_then(|_| fs::rename(tmp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(tmp);
        return Err(e.into());
    }

    sync_parent_dir(path);
    Ok(())
}

/// Replace the contents of `path` with `contents`
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let (tmp, mut file) = create_temp(path)?;
    if let Err(e) = file.write_all(contents) {
        drop(file);
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    commit(&tmp, file, path)
}

/// Best effort: persist the rename itself. Not supported on every platform.
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}
