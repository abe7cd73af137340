use crate::manifest::Manifest;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use walkdir::WalkDir;

/// Filesystem location of a `/`-separated member name under `root`
pub fn source_path(root: &Path, member: &str) -> PathBuf {
    member
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Member name for a file found under `root`
pub fn member_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Files under `root` that the manifest does not name, sorted by path.
///
/// A missing root yields nothing. Unreadable directory entries are skipped.
pub fn unlisted_files(root: &Path, manifest: &Manifest) -> Vec<String> {
    if !root.is_dir() {
        return Vec::new();
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| member_name(root, e.path()))
        .filter(|name| !manifest.contains(name))
        .collect()
}

/// Zip timestamp for a file modification time.
///
/// Zip timestamps cannot represent dates before 1980, those return `None`.
pub fn zip_datetime(modified: std::time::SystemTime) -> Option<zip::DateTime> {
    let t = OffsetDateTime::from(modified);
    zip::DateTime::from_date_and_time(
        u16::try_from(t.year()).ok()?,
        u8::from(t.month()),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
    )
    .ok()
}
