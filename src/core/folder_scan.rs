/*
 * Discovers project roots on disk by walking configured directories and
 * looking for version-control markers. A directory containing a `.git`
 * subdirectory is a project root: it is emitted and its subtree is not
 * entered. Descent is bounded at a fixed depth so a pathological tree cannot
 * make a search unbounded in the vertical direction.
 *
 * Unreadable subtrees fail soft: the walker logs a warning and moves on.
 * Symlinks are not followed, which also removes the loop hazard.
 */
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const VCS_MARKER: &str = ".git";
const MAX_SCAN_DEPTH: usize = 6;

pub trait FolderScannerOperations: Send + Sync {
    fn scan(&self, root: &Path) -> Vec<PathBuf>;
}

pub struct CoreFolderScanner {}

impl CoreFolderScanner {
    pub fn new() -> Self {
        CoreFolderScanner {}
    }
}

impl Default for CoreFolderScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderScannerOperations for CoreFolderScanner {
    /*
     * Depth-first walk from `root` (depth 0) down to MAX_SCAN_DEPTH. Entries
     * are visited in file-name order so results are deterministic across
     * platforms. Returns every marker-carrying directory found; an empty
     * vector when the root does not exist or nothing matches.
     */
    fn scan(&self, root: &Path) -> Vec<PathBuf> {
        log::debug!("FolderScanner: Scanning {root:?} (max depth {MAX_SCAN_DEPTH})");
        let mut found = Vec::new();

        let mut walker = WalkDir::new(root)
            .max_depth(MAX_SCAN_DEPTH)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("FolderScanner: Skipping unreadable entry under {root:?}: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if entry.path().join(VCS_MARKER).is_dir() {
                found.push(entry.path().to_path_buf());
                // A project root is a leaf for this scan; nested repositories
                // below it are intentionally not reported.
                walker.skip_current_dir();
            }
        }

        log::debug!("FolderScanner: Found {} project roots under {root:?}", found.len());
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn make_repo(base: &Path, rel: &str) -> PathBuf {
        let repo = base.join(rel);
        fs::create_dir_all(repo.join(VCS_MARKER)).expect("Failed to create repo marker");
        repo
    }

    #[test]
    fn test_scan_finds_marker_at_depth_two_and_stops_descent() {
        // Arrange
        let dir = tempdir().unwrap();
        let repo = make_repo(dir.path(), "a/b");
        // A nested repository inside the found root must not be reported.
        make_repo(dir.path(), "a/b/vendor/nested");

        // Act
        let roots = CoreFolderScanner::new().scan(dir.path());

        // Assert
        assert_eq!(roots, vec![repo]);
    }

    #[test]
    fn test_scan_root_itself_can_be_a_project() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(VCS_MARKER)).unwrap();
        make_repo(dir.path(), "inner");

        let roots = CoreFolderScanner::new().scan(dir.path());
        assert_eq!(roots, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_scan_depth_limit_is_six() {
        let dir = tempdir().unwrap();
        // Depth 6 relative to the root: reachable.
        let at_limit = make_repo(dir.path(), "1/2/3/4/5/6");
        // Depth 7: one past the bound, never visited.
        make_repo(dir.path(), "a/b/c/d/e/f/g");

        let roots = CoreFolderScanner::new().scan(dir.path());
        assert_eq!(roots, vec![at_limit]);
    }

    #[test]
    fn test_scan_ignores_files_and_marker_files() {
        let dir = tempdir().unwrap();
        // A `.git` *file* (worktree pointer) is not a marker directory.
        let worktree = dir.path().join("worktree");
        fs::create_dir_all(&worktree).unwrap();
        fs::write(worktree.join(VCS_MARKER), "gitdir: elsewhere").unwrap();
        fs::write(dir.path().join("loose_file.txt"), "x").unwrap();
        let repo = make_repo(dir.path(), "real");

        let roots = CoreFolderScanner::new().scan(dir.path());
        assert_eq!(roots, vec![repo]);
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let roots = CoreFolderScanner::new().scan(Path::new("/nonexistent/scan/root"));
        assert!(roots.is_empty());
    }

    #[test]
    fn test_scan_results_are_sorted_by_name() {
        let dir = tempdir().unwrap();
        let beta = make_repo(dir.path(), "beta");
        let alpha = make_repo(dir.path(), "alpha");

        let roots = CoreFolderScanner::new().scan(dir.path());
        assert_eq!(roots, vec![alpha, beta]);
    }
}
