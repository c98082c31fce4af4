//! Saving generated SQL to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

/// File name for a script saved without an explicit path.
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use etshell_db::timestamped_name;
///
/// let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(timestamped_name(at), "query_20240309_140507_000.sql");
/// ```
pub fn timestamped_name(at: DateTime<Local>) -> String {
    format!("query_{}.sql", at.format("%Y%m%d_%H%M%S_%3f"))
}

/// Writes `text` to `path`, or to a timestamped file in the current
/// directory when no path is given. Returns the path written.
pub fn save_query(path: Option<&Path>, text: &str) -> io::Result<PathBuf> {
    match path {
        Some(path) => write_query(path.to_path_buf(), text),
        None => save_query_in(Path::new("."), text),
    }
}

/// Writes `text` to a new timestamped file inside `dir`.
///
/// An existing file is never overwritten; a numeric suffix is added
/// instead.
pub fn save_query_in(dir: &Path, text: &str) -> io::Result<PathBuf> {
    let name = timestamped_name(Local::now());
    let mut path = dir.join(&name);
    let stem = name.trim_end_matches(".sql");
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{stem}_{n}.sql"));
        n += 1;
    }
    write_query(path, text)
}

fn write_query(path: PathBuf, text: &str) -> io::Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut contents = text.to_string();
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(&path, contents)?;
    info!(path = %path.display(), bytes = text.len(), "Saved query");
    Ok(path)
}
