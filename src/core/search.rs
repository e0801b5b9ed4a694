/*
 * The search orchestrator. One invocation runs the whole pipeline
 * sequentially: normalize the query, resolve the application paths from the
 * launcher script, obtain recent-project candidates through the cache-aside
 * layer, scan the configured roots for version-controlled folders, then
 * merge, deduplicate, and filter everything into the final item list.
 *
 * Collaborators are held as trait objects so tests can substitute any stage.
 * Fatal errors never escape `search`; they are converted into exactly one
 * error item carrying the message, a numeric code, and a severity that picks
 * the alert icon.
 *
 * Note on the failure domain: the recents read and the folder scan run in one
 * fallible block, so a recents failure suppresses folder-scan results as
 * well. This mirrors the behavior of the configuration readers jetscout is
 * compatible with.
 */
use crate::core::cache::{CoreProjectCache, ProjectCacheOperations, cache_key};
use crate::core::folder_scan::{CoreFolderScanner, FolderScannerOperations};
use crate::core::launcher::{CoreLauncherResolver, LauncherError, LauncherResolverOperations};
use crate::core::models::{AppPaths, ProjectCandidate, ResultItem, SearchResult, Severity};
use crate::core::recent_projects::{
    CoreRecentProjectsReader, RecentProjectsError, RecentProjectsOperations,
};
use crate::core::settings::Settings;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SearchError {
    Launcher(LauncherError),
    Recents(RecentProjectsError),
}

impl SearchError {
    pub fn severity(&self) -> Severity {
        match self {
            SearchError::Launcher(e) => e.severity(),
            SearchError::Recents(e) => e.severity(),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            SearchError::Launcher(_) => 0,
            SearchError::Recents(e) => e.code(),
        }
    }
}

impl From<LauncherError> for SearchError {
    fn from(err: LauncherError) -> Self {
        SearchError::Launcher(err)
    }
}

impl From<RecentProjectsError> for SearchError {
    fn from(err: RecentProjectsError) -> Self {
        SearchError::Recents(err)
    }
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Launcher(e) => write!(f, "{e}"),
            SearchError::Recents(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Launcher(e) => Some(e),
            SearchError::Recents(e) => Some(e),
        }
    }
}

/// Un-escapes the `\ ` convention used by the input layer and trims
/// surrounding whitespace. An empty normalized query means match-all.
pub fn parse_query(raw: &str) -> String {
    raw.replace("\\ ", " ").trim().to_string()
}

pub struct SearchEngine {
    launcher: PathBuf,
    settings: Settings,
    resolver: Box<dyn LauncherResolverOperations>,
    reader: Box<dyn RecentProjectsOperations>,
    scanner: Box<dyn FolderScannerOperations>,
    cache: Box<dyn ProjectCacheOperations>,
}

impl SearchEngine {
    /// Wires the default component implementations for one invocation.
    pub fn new(launcher: PathBuf, settings: Settings) -> Self {
        let reader = CoreRecentProjectsReader::new(settings.home.clone());
        let cache = CoreProjectCache::new(settings.cache_dir.clone(), settings.cache_ttl);
        SearchEngine {
            launcher,
            settings,
            resolver: Box::new(CoreLauncherResolver::new()),
            reader: Box::new(reader),
            scanner: Box::new(CoreFolderScanner::new()),
            cache: Box::new(cache),
        }
    }

    /// Constructor with injectable collaborators, used by tests.
    pub fn with_components(
        launcher: PathBuf,
        settings: Settings,
        resolver: Box<dyn LauncherResolverOperations>,
        reader: Box<dyn RecentProjectsOperations>,
        scanner: Box<dyn FolderScannerOperations>,
        cache: Box<dyn ProjectCacheOperations>,
    ) -> Self {
        SearchEngine {
            launcher,
            settings,
            resolver,
            reader,
            scanner,
            cache,
        }
    }

    /*
     * Runs one search. Never fails: every fatal condition is folded into a
     * single error item, and an empty outcome is represented by the
     * appropriate sentinel item.
     */
    pub fn search(&self, raw_query: &str) -> SearchResult {
        let query = parse_query(raw_query);
        log::debug!("SearchEngine: search('{query}') via {:?}", self.launcher);

        let mut result = SearchResult::new();

        match self.resolver.resolve(&self.launcher) {
            Ok(app) => {
                // The launcher is echoed back so the consumer can start the
                // right application for whichever item is actioned.
                result.add_variable("bin", self.launcher.to_string_lossy().into_owned());

                match self.collect_candidates(&app, &query) {
                    Ok(candidates) => {
                        for candidate in &candidates {
                            result.add_item(ResultItem::project(candidate, &app.run_path));
                        }
                    }
                    Err(e) => self.add_error_item(&mut result, &e),
                }

                if !result.has_items() {
                    if query.is_empty() {
                        log::debug!("SearchEngine: No projects found");
                        result.add_item(ResultItem::no_results(&app.run_path));
                    } else {
                        log::debug!("SearchEngine: No project match for '{query}'");
                        result.add_item(ResultItem::no_project_match(&query, &app.run_path));
                    }
                }
            }
            Err(e) => self.add_error_item(&mut result, &SearchError::Launcher(e)),
        }

        if self.settings.debug {
            result.add_item(ResultItem::debug(&self.settings.debug_log_file()));
        }

        log::debug!("SearchEngine: Returning {} items", result.items.len());
        result
    }

    /*
     * Gathers and merges both candidate sources. The `?` on the recents read
     * deliberately aborts folder scanning too; see the module comment.
     */
    fn collect_candidates(
        &self,
        app: &AppPaths,
        query: &str,
    ) -> std::result::Result<Vec<ProjectCandidate>, SearchError> {
        let key = cache_key(&self.launcher);
        let mut recents = self.cache.get(&key);
        if recents.is_empty() {
            recents = self.reader.read(app)?;
            self.cache.set(&key, &recents);
        }

        let mut scanned = Vec::new();
        for root in &self.settings.project_dirs {
            for path in self.scanner.scan(root) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned());
                scanned.push(ProjectCandidate::new(name, path));
            }
        }

        Ok(merge_candidates(&recents, &scanned, query))
    }

    fn add_error_item(&self, result: &mut SearchResult, error: &SearchError) {
        log::warn!("SearchEngine: {error}");
        result.add_item(ResultItem::error(
            &error.to_string(),
            &format!("{error:?}"),
            error.code(),
            error.severity(),
        ));
    }
}

/*
 * Merges recents first, then scanned folders, preserving each source's order.
 * A non-empty query filters case-insensitively: recents candidates match on
 * name or basename, scanned candidates on name only. Duplicate paths keep the
 * first occurrence, which gives recents entries priority over scanned ones.
 */
fn merge_candidates(
    recents: &[ProjectCandidate],
    scanned: &[ProjectCandidate],
    query: &str,
) -> Vec<ProjectCandidate> {
    let query_lower = query.to_lowercase();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut merged = Vec::new();

    for candidate in recents {
        if !query_lower.is_empty()
            && !contains_ci(&candidate.name, &query_lower)
            && !contains_ci(&candidate.basename, &query_lower)
        {
            continue;
        }
        if seen.insert(candidate.path.clone()) {
            merged.push(candidate.clone());
        }
    }

    for candidate in scanned {
        if !query_lower.is_empty() && !contains_ci(&candidate.name, &query_lower) {
            continue;
        }
        if seen.insert(candidate.path.clone()) {
            merged.push(candidate.clone());
        }
    }

    merged
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
