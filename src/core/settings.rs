/*
 * Environment-driven configuration for one search invocation. The process
 * environment is read exactly once, in `Settings::from_env`; every component
 * afterwards receives the resulting value explicitly instead of consulting
 * globals. This keeps the components testable with synthetic settings.
 */
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

const CACHE_DIR_VAR: &str = "alfred_workflow_cache";
const PROJECT_DIRS_VAR: &str = "jb_project_dirs";
const DEBUG_VAR: &str = "jb_debug";
const CACHE_LIFETIME_VAR: &str = "jb_cache_lifetime";
const HOME_VAR: &str = "HOME";

const DEFAULT_CACHE_LIFETIME_SECS: u64 = 3600;
const APP_NAME: &str = "jetscout";

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    NoCacheDirectory,
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "Settings I/O error: {e}"),
            SettingsError::NoCacheDirectory => {
                write!(f, "Could not determine or create a cache directory")
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub project_dirs: Vec<PathBuf>,
    pub debug: bool,
    pub cache_ttl: Duration,
    pub home: PathBuf,
}

impl Settings {
    /*
     * Builds the invocation settings from the process environment. The cache
     * directory must exist afterwards (it is created if missing); everything
     * else degrades to a sensible default when absent.
     */
    pub fn from_env() -> Result<Settings> {
        let cache_dir = match env::var_os(CACHE_DIR_VAR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_cache_dir().ok_or(SettingsError::NoCacheDirectory)?,
        };
        fs::create_dir_all(&cache_dir)?;

        let project_dirs = env::var(PROJECT_DIRS_VAR)
            .map(|raw| parse_project_dirs(&raw))
            .unwrap_or_default();

        let debug = env::var(DEBUG_VAR)
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        let cache_ttl = env::var(CACHE_LIFETIME_VAR)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_LIFETIME_SECS));

        let home = env::var_os(HOME_VAR)
            .map(PathBuf::from)
            .unwrap_or_default();

        log::debug!(
            "Settings: cache_dir={cache_dir:?}, roots={}, debug={debug}, ttl={}s",
            project_dirs.len(),
            cache_ttl.as_secs()
        );

        Ok(Settings {
            cache_dir,
            project_dirs,
            debug,
            cache_ttl,
            home,
        })
    }
}

impl Settings {
    /*
     * The debug log is one append-only file per calendar day under the cache
     * directory, so a user can attach the whole file to an issue without it
     * growing unbounded.
     */
    pub fn debug_log_file(&self) -> PathBuf {
        let format = time::macros::format_description!("[year][month][day]");
        let stamp = time::OffsetDateTime::now_utc()
            .format(&format)
            .unwrap_or_else(|_| "unknown".to_string());
        self.cache_dir.join(format!("debug_{stamp}.log"))
    }
}

/// Splits the colon-separated scan-root list, dropping empty segments.
pub fn parse_project_dirs(raw: &str) -> Vec<PathBuf> {
    raw.split(':')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True")
}

fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.cache_dir().to_path_buf())
}
