/*
 * This module consolidates the core logic of the locator. It re-exports the
 * data model and the component abstractions (`LauncherResolverOperations`,
 * `RecentProjectsOperations`, `FolderScannerOperations`,
 * `ProjectCacheOperations`) together with their default implementations, the
 * name-resolution probe chain, and the `SearchEngine` orchestrator.
 */
pub mod cache;
pub mod folder_scan;
pub mod launcher;
pub mod models;
pub mod project_name;
pub mod recent_projects;
pub mod search;
pub mod settings;

// Re-export key structures and enums
pub use models::{AppPaths, ProjectCandidate, ResultItem, SearchResult, Severity};

// Re-export launcher related items
pub use launcher::{CoreLauncherResolver, LauncherError, LauncherResolverOperations};

// Re-export recent-projects related items
pub use recent_projects::{
    CoreRecentProjectsReader, RecentProjectsError, RecentProjectsOperations,
};

// Re-export folder-scan related items
pub use folder_scan::{CoreFolderScanner, FolderScannerOperations};

// Re-export cache related items
pub use cache::{CoreProjectCache, ProjectCacheOperations, cache_key};

pub use project_name::resolve_project_name;

pub use search::{SearchEngine, SearchError, parse_query};

pub use settings::{Settings, SettingsError};
