/*
 * Time-bounded cache for resolved recent-project candidates. One JSON blob is
 * kept per host-application identity under the cache directory; the key is
 * derived from the launcher path by the caller. A miss, a corrupt payload,
 * and an expired entry are indistinguishable to the caller — all three come
 * back as an empty list, which triggers a fresh recents pass.
 *
 * `set` replaces the whole blob; entries are never merged or updated in
 * place. Write failures are logged and swallowed: the cache is an
 * optimization, never a correctness dependency.
 */
use crate::core::models::ProjectCandidate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::OffsetDateTime;

const CACHE_FILE_EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    created_at: i64,
    projects: Vec<ProjectCandidate>,
}

/// Derives the on-disk cache key for a launcher path.
pub fn cache_key(launcher: &Path) -> String {
    launcher.to_string_lossy().replace('/', "_")
}

pub trait ProjectCacheOperations: Send + Sync {
    fn get(&self, key: &str) -> Vec<ProjectCandidate>;
    fn set(&self, key: &str, projects: &[ProjectCandidate]);
}

pub struct CoreProjectCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl CoreProjectCache {
    pub fn new(cache_dir: PathBuf, ttl: Duration) -> Self {
        CoreProjectCache { cache_dir, ttl }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{key}.{CACHE_FILE_EXTENSION}"))
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let age = now.saturating_sub(entry.created_at);
        age < 0 || age as u64 >= self.ttl.as_secs()
    }
}

impl ProjectCacheOperations for CoreProjectCache {
    fn get(&self, key: &str) -> Vec<ProjectCandidate> {
        let path = self.entry_path(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(_) => {
                log::trace!("ProjectCache: Miss for key '{key}'");
                return Vec::new();
            }
        };
        let entry: CacheEntry = match serde_json::from_reader(BufReader::new(file)) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("ProjectCache: Corrupt payload at {path:?}: {e}");
                return Vec::new();
            }
        };
        if self.is_expired(&entry) {
            log::debug!("ProjectCache: Entry for key '{key}' expired");
            return Vec::new();
        }
        log::debug!(
            "ProjectCache: Hit for key '{key}' ({} projects)",
            entry.projects.len()
        );
        entry.projects
    }

    fn set(&self, key: &str, projects: &[ProjectCandidate]) {
        let path = self.entry_path(key);
        let entry = CacheEntry {
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
            projects: projects.to_vec(),
        };
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                log::warn!("ProjectCache: Failed to create {path:?}: {e}");
                return;
            }
        };
        if let Err(e) = serde_json::to_writer(BufWriter::new(file), &entry) {
            log::warn!("ProjectCache: Failed to write {path:?}: {e}");
        } else {
            log::debug!("ProjectCache: Stored {} projects for key '{key}'", projects.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample_projects() -> Vec<ProjectCandidate> {
        vec![
            ProjectCandidate::new("One".to_string(), PathBuf::from("/p/one")),
            ProjectCandidate::new("Two".to_string(), PathBuf::from("/p/two")),
        ]
    }

    #[test]
    fn test_set_then_get_round_trips_unchanged() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        let projects = sample_projects();

        cache.set("app_key", &projects);
        let loaded = cache.get("app_key");

        assert_eq!(loaded, projects);
    }

    #[test]
    fn test_get_miss_returns_empty() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        assert!(cache.get("never_set").is_empty());
    }

    #[test]
    fn test_get_corrupt_payload_returns_empty() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));
        fs::write(dir.path().join("bad_key.json"), "{not json").unwrap();

        assert!(cache.get("bad_key").is_empty());
    }

    #[test]
    fn test_get_expired_entry_returns_empty() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(60));

        // Write an entry whose creation time is well past the TTL.
        let stale = CacheEntry {
            created_at: OffsetDateTime::now_utc().unix_timestamp() - 120,
            projects: sample_projects(),
        };
        let file = File::create(dir.path().join("stale.json")).unwrap();
        serde_json::to_writer(BufWriter::new(file), &stale).unwrap();

        assert!(cache.get("stale").is_empty());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(0));

        cache.set("k", &sample_projects());
        assert!(cache.get("k").is_empty());
    }

    #[test]
    fn test_set_overwrites_wholesale() {
        let dir = tempdir().unwrap();
        let cache = CoreProjectCache::new(dir.path().to_path_buf(), Duration::from_secs(3600));

        cache.set("k", &sample_projects());
        let replacement = vec![ProjectCandidate::new(
            "Only".to_string(),
            PathBuf::from("/p/only"),
        )];
        cache.set("k", &replacement);

        assert_eq!(cache.get("k"), replacement);
    }

    #[test]
    fn test_cache_key_substitutes_path_separators() {
        assert_eq!(
            cache_key(Path::new("/usr/local/bin/clion")),
            "_usr_local_bin_clion"
        );
    }

    #[test]
    fn test_set_into_missing_directory_is_swallowed() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let cache = CoreProjectCache::new(missing, Duration::from_secs(3600));

        // Must not panic; subsequent get is a plain miss.
        cache.set("k", &sample_projects());
        assert!(cache.get("k").is_empty());
    }
}
