use std::path::{Path, PathBuf};
use std::time::Duration;

use services::{BackendConfig, ServicesOptions};
use thiserror::Error;

use crate::cli::GlobalArgs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid --db value: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("invalid --api-base-url value: {raw}")]
    InvalidApiBaseUrl { raw: String },
    #[error("--api-timeout-ms must be greater than zero")]
    ZeroTimeout,
    #[error("cannot prepare database file: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved startup settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub options: ServicesOptions,
}

impl Config {
    /// # Errors
    ///
    /// Returns `ConfigError` if a flag or environment value is unusable.
    pub fn from_args(args: &GlobalArgs) -> Result<Self, ConfigError> {
        if args.db_url.trim().is_empty() {
            return Err(ConfigError::InvalidDbUrl {
                raw: args.db_url.clone(),
            });
        }
        if args.api_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let backend = match args.api_base_url.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(base) if base.starts_with("http://") || base.starts_with("https://") => {
                let mut config = BackendConfig::new(base)
                    .with_timeout(Duration::from_millis(args.api_timeout_ms));
                if let Some(token) = &args.api_token {
                    config = config.with_token(token.clone());
                }
                Some(config)
            }
            Some(other) => {
                return Err(ConfigError::InvalidApiBaseUrl {
                    raw: other.to_owned(),
                });
            }
        };

        Ok(Self {
            db_url: normalize_sqlite_url(&args.db_url),
            options: ServicesOptions {
                subjects_per_user: args.subjects_per_user,
                backend,
            },
        })
    }
}

/// Turn a bare or relative path into an absolute `sqlite://` URL.
/// A `?query` suffix is kept as given.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" {
        return trimmed.to_owned();
    }

    let rest = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let (path_str, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    if path_str.is_empty() {
        return trimmed.to_owned();
    }

    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

/// Create the database file and its parent directories if missing.
///
/// # Errors
///
/// Returns `ConfigError` if the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let invalid = || ConfigError::InvalidDbUrl {
        raw: db_url.to_owned(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid());
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

    fn args() -> GlobalArgs {
        GlobalArgs {
            db_url: "sqlite://plania.sqlite3".into(),
            subjects_per_user: false,
            api_base_url: None,
            api_token: None,
            api_timeout_ms: 30_000,
        }
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/plania.sqlite3");
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/plania.sqlite3"));

        assert_eq!(normalize_sqlite_url("sqlite:/tmp/x.db"), "sqlite:///tmp/x.db");
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///var/lib/plania.db"),
            "sqlite:///var/lib/plania.db"
        );
    }

    #[test]
    fn relative_sqlite_urls_are_resolved_against_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            normalize_sqlite_url("sqlite://plania.sqlite3"),
            format!("sqlite://{}", cwd.join("plania.sqlite3").display())
        );
        assert_eq!(
            normalize_sqlite_url("sqlite://data/plania.sqlite3?mode=rwc"),
            format!("sqlite://{}?mode=rwc", cwd.join("data/plania.sqlite3").display())
        );
        assert_eq!(normalize_sqlite_url("sqlite://"), "sqlite://");

        let config = Config::from_args(&args()).unwrap();
        assert!(config.db_url.starts_with("sqlite:///"));
    }

    #[test]
    fn prepare_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("plania-config-{}", std::process::id()));
        let file = dir.join("nested").join("db.sqlite3");
        let url = format!("sqlite://{}?mode=rwc", file.display());

        prepare_sqlite_file(&url).unwrap();
        assert!(file.exists());
        prepare_sqlite_file(&url).unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn prepare_rejects_non_file_urls() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(matches!(
            prepare_sqlite_file("postgres://db"),
            Err(ConfigError::InvalidDbUrl { .. })
        ));
        assert!(prepare_sqlite_file("sqlite://").is_err());
    }

    #[test]
    fn backend_is_optional() {
        let config = Config::from_args(&args()).unwrap();
        assert!(config.options.backend.is_none());
        assert!(!config.options.subjects_per_user);

        let mut with_api = args();
        with_api.api_base_url = Some("http://localhost:8000".into());
        with_api.api_token = Some("t0ken".into());
        with_api.api_timeout_ms = 1_500;
        let backend = Config::from_args(&with_api).unwrap().options.backend.unwrap();
        assert_eq!(backend.token.as_deref(), Some("t0ken"));
        assert_eq!(backend.timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn rejects_bad_values() {
        let mut zero = args();
        zero.api_timeout_ms = 0;
        assert!(matches!(Config::from_args(&zero), Err(ConfigError::ZeroTimeout)));

        let mut bad_url = args();
        bad_url.api_base_url = Some("localhost:8000".into());
        assert!(matches!(
            Config::from_args(&bad_url),
            Err(ConfigError::InvalidApiBaseUrl { .. })
        ));

        let mut blank_db = args();
        blank_db.db_url = "  ".into();
        assert!(Config::from_args(&blank_db).is_err());
    }
}
