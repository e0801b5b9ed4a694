/*
 * Resolves the IDE's installation and configuration directories from its
 * command-line launcher script. JetBrains launchers are generated scripts
 * carrying `RUN_PATH = u'...'` and `CONFIG_PATH = u'...'` assignments near the
 * top; this module line-scans the script for those two markers and validates
 * that each value is an existing readable directory.
 *
 * A trait (`LauncherResolverOperations`) abstracts the resolution so the
 * search orchestrator can be tested against a stub.
 */
use crate::core::models::{AppPaths, Severity};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const RUN_PATH_MARKER: &str = "RUN_PATH =";
const CONFIG_PATH_MARKER: &str = "CONFIG_PATH =";
// The launcher scripts write values as Python unicode literals: u'...'.
const VALUE_PREFIX: &str = "u";

#[derive(Debug)]
pub enum LauncherError {
    Unreadable(PathBuf),
    RunPathMissing(PathBuf),
    ConfigPathMissing(PathBuf),
}

impl LauncherError {
    /// Severity used to classify the resulting error item.
    pub fn severity(&self) -> Severity {
        match self {
            // A descriptor that cannot even be opened points at a bad
            // argument, not a broken installation.
            LauncherError::Unreadable(_) => Severity::Caution,
            _ => Severity::Stop,
        }
    }
}

impl std::fmt::Display for LauncherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LauncherError::Unreadable(p) => {
                write!(f, "Can't find command line launcher for '{}'", p.display())
            }
            LauncherError::RunPathMissing(p) => {
                write!(f, "Can't find application path for '{}'", p.display())
            }
            LauncherError::ConfigPathMissing(p) => {
                write!(
                    f,
                    "Can't find application configuration path for '{}'",
                    p.display()
                )
            }
        }
    }
}

impl std::error::Error for LauncherError {}

pub type Result<T> = std::result::Result<T, LauncherError>;

pub trait LauncherResolverOperations: Send + Sync {
    fn resolve(&self, launcher: &Path) -> Result<AppPaths>;
}

pub struct CoreLauncherResolver {}

impl CoreLauncherResolver {
    pub fn new() -> Self {
        CoreLauncherResolver {}
    }
}

impl Default for CoreLauncherResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LauncherResolverOperations for CoreLauncherResolver {
    /*
     * Scans the launcher script line by line. A line starting with a marker
     * assigns its value to the matching slot, provided the value names an
     * existing readable directory. Scanning stops as soon as both slots are
     * filled; reaching end-of-file with an empty slot is an error.
     */
    fn resolve(&self, launcher: &Path) -> Result<AppPaths> {
        log::trace!("LauncherResolver: Resolving app paths from {launcher:?}");
        let file =
            File::open(launcher).map_err(|_| LauncherError::Unreadable(launcher.to_path_buf()))?;
        let reader = BufReader::new(file);

        let mut run_path: Option<PathBuf> = None;
        let mut config_path: Option<PathBuf> = None;

        for line in reader.lines() {
            // Launcher scripts are generated ASCII; a malformed line is
            // treated the same as an uninteresting one.
            let Ok(line) = line else { continue };

            if run_path.is_none()
                && let Some(value) = marker_value(&line, RUN_PATH_MARKER)
            {
                run_path = accept_directory(value);
                if run_path.is_some() {
                    log::debug!("LauncherResolver: run_path = {run_path:?}");
                }
            } else if config_path.is_none()
                && let Some(value) = marker_value(&line, CONFIG_PATH_MARKER)
            {
                config_path = accept_directory(value);
                if config_path.is_some() {
                    log::debug!("LauncherResolver: config_path = {config_path:?}");
                }
            }

            if run_path.is_some() && config_path.is_some() {
                break;
            }
        }

        let run_path = run_path.ok_or_else(|| LauncherError::RunPathMissing(launcher.to_path_buf()))?;
        let config_path =
            config_path.ok_or_else(|| LauncherError::ConfigPathMissing(launcher.to_path_buf()))?;

        Ok(AppPaths {
            run_path,
            config_path,
        })
    }
}

/*
 * Extracts the assigned value from a marker line, stripping the Python `u`
 * string prefix, surrounding whitespace, and single quotes. Returns None when
 * the line does not start with the marker.
 */
fn marker_value<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    let rest = rest.trim();
    let rest = rest.strip_prefix(VALUE_PREFIX).unwrap_or(rest);
    Some(rest.trim().trim_matches('\''))
}

fn accept_directory(value: &str) -> Option<PathBuf> {
    let path = PathBuf::from(value);
    if path.is_dir() { Some(path) } else { None }
}
