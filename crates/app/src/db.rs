//! SQLite URL handling for the local state file.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, bail};

pub const MEMORY_URL: &str = "sqlite::memory:";

/// Turn `path`, `sqlite:path`, or `sqlite://path` into an absolute `sqlite://` URL.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_URL || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Make sure the database file and its directory exist before connecting.
pub fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == MEMORY_URL {
        return Ok(());
    }

    let Some(path) = db_url.strip_prefix("sqlite://") else {
        bail!("invalid database url: {db_url}");
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid database url: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_and_full_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), MEMORY_URL);
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/quiz.sqlite3"),
            "sqlite:///tmp/quiz.sqlite3"
        );
    }

    #[test]
    fn relative_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:state/quiz.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("state/quiz.sqlite3"));
    }

    #[test]
    fn prepare_rejects_foreign_urls() {
        assert!(prepare_sqlite_file("postgres://x").is_err());
        assert!(prepare_sqlite_file(MEMORY_URL).is_ok());
    }
}
