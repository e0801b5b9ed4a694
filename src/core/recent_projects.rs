/*
 * Extracts the list of recently opened projects from the IDE's configuration
 * directory. Depending on product and version the IDE maintains one of three
 * recents documents under `options/`; they are probed in a fixed priority
 * order and the first readable file is authoritative — no merging across
 * files, and no fallback queries within a file.
 *
 * Raw paths from the document may carry placeholder tokens ($USER_HOME$,
 * $APPLICATION_CONFIG_DIR$) which are substituted before the path is used.
 * Unreadable paths and paths with no resolvable display name are silently
 * skipped; they reduce the candidate set, they are not errors.
 */
use crate::core::models::{AppPaths, ProjectCandidate, Severity};
use crate::core::project_name::resolve_project_name;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const USER_HOME_TOKEN: &str = "$USER_HOME$";
const CONFIG_DIR_TOKEN: &str = "$APPLICATION_CONFIG_DIR$";

// Relative path under the config dir, paired with the component name whose
// recentPaths option holds the project list. Priority order matters.
const RECENTS_SOURCES: [(&str, &str); 3] = [
    (
        "options/recentProjectDirectories.xml",
        "RecentDirectoryProjectsManager",
    ),
    ("options/recentProjects.xml", "RecentProjectsManager"),
    ("options/recentSolutions.xml", "RiderRecentProjectsManager"),
];

#[derive(Debug)]
pub enum RecentProjectsError {
    NoRecentsFile(PathBuf),
    Io(io::Error),
    Xml(roxmltree::Error),
}

impl RecentProjectsError {
    pub fn severity(&self) -> Severity {
        match self {
            // The installation exists but has never recorded a project, or
            // the layout is unknown: a hard configuration problem.
            RecentProjectsError::NoRecentsFile(_) => Severity::Stop,
            _ => Severity::Caution,
        }
    }

    /// Numeric code carried into the error item's uid.
    pub fn code(&self) -> u32 {
        match self {
            RecentProjectsError::NoRecentsFile(_) => 100,
            _ => 0,
        }
    }
}

impl From<io::Error> for RecentProjectsError {
    fn from(err: io::Error) -> Self {
        RecentProjectsError::Io(err)
    }
}

impl From<roxmltree::Error> for RecentProjectsError {
    fn from(err: roxmltree::Error) -> Self {
        RecentProjectsError::Xml(err)
    }
}

impl std::fmt::Display for RecentProjectsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecentProjectsError::NoRecentsFile(config) => {
                write!(f, "Can't find 'options' XML in '{}'", config.display())
            }
            RecentProjectsError::Io(e) => write!(f, "Recent projects I/O error: {e}"),
            RecentProjectsError::Xml(e) => write!(f, "Recent projects XML error: {e}"),
        }
    }
}

impl std::error::Error for RecentProjectsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecentProjectsError::Io(e) => Some(e),
            RecentProjectsError::Xml(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RecentProjectsError>;

pub trait RecentProjectsOperations: Send + Sync {
    fn read(&self, app: &AppPaths) -> Result<Vec<ProjectCandidate>>;
}

pub struct CoreRecentProjectsReader {
    home: PathBuf,
}

impl CoreRecentProjectsReader {
    pub fn new(home: PathBuf) -> Self {
        CoreRecentProjectsReader { home }
    }

    fn substitute_tokens(&self, raw: &str, config_path: &Path) -> PathBuf {
        let resolved = raw
            .replace(USER_HOME_TOKEN, &self.home.to_string_lossy())
            .replace(CONFIG_DIR_TOKEN, &config_path.to_string_lossy());
        PathBuf::from(resolved)
    }
}

impl RecentProjectsOperations for CoreRecentProjectsReader {
    /*
     * Picks the first readable recents document, extracts its recorded paths,
     * and turns each readable, nameable path into a ProjectCandidate in
     * document order.
     */
    fn read(&self, app: &AppPaths) -> Result<Vec<ProjectCandidate>> {
        let (file, component) = RECENTS_SOURCES
            .iter()
            .map(|(rel, component)| (app.config_path.join(rel), *component))
            .find(|(path, _)| path.is_file())
            .ok_or_else(|| RecentProjectsError::NoRecentsFile(app.config_path.clone()))?;

        log::debug!("RecentProjects: Working with {file:?} (component '{component}')");

        let content = fs::read_to_string(&file)?;
        let doc = roxmltree::Document::parse(&content)?;
        let raw_paths = extract_recent_paths(&doc, component);
        log::trace!("RecentProjects: {} raw entries in {file:?}", raw_paths.len());

        let mut candidates = Vec::new();
        for raw in raw_paths {
            let path = self.substitute_tokens(&raw, &app.config_path);
            if !path.exists() {
                log::debug!("RecentProjects: {path:?} doesn't exist, skipping");
                continue;
            }
            match resolve_project_name(&path) {
                Some(name) => candidates.push(ProjectCandidate::new(name, path)),
                None => {
                    log::debug!("RecentProjects: Can't find project name for {path:?}, skipping");
                }
            }
        }

        log::debug!("RecentProjects: {} candidates resolved", candidates.len());
        Ok(candidates)
    }
}

/*
 * Pulls the option values out of
 * `component[@name=<component>]/option[@name='recentPaths']/list/option/@value`.
 * A document without the expected structure simply yields nothing; the chosen
 * file stays authoritative either way.
 */
fn extract_recent_paths(doc: &roxmltree::Document, component: &str) -> Vec<String> {
    let Some(component_node) = doc
        .descendants()
        .find(|n| n.has_tag_name("component") && n.attribute("name") == Some(component))
    else {
        return Vec::new();
    };
    let Some(recent_paths) = component_node
        .descendants()
        .find(|n| n.has_tag_name("option") && n.attribute("name") == Some("recentPaths"))
    else {
        return Vec::new();
    };
    recent_paths
        .children()
        .filter(|n| n.has_tag_name("list"))
        .flat_map(|list| list.children().filter(|n| n.has_tag_name("option")))
        .filter_map(|n| n.attribute("value"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn recents_xml(component: &str, values: &[&str]) -> String {
        let options: String = values
            .iter()
            .map(|v| format!("        <option value=\"{v}\" />\n"))
            .collect();
        format!(
            r#"<application>
  <component name="{component}">
    <option name="recentPaths">
      <list>
{options}      </list>
    </option>
  </component>
</application>"#
        )
    }

    fn named_project(base: &Path, rel: &str, name: &str) -> PathBuf {
        let project = base.join(rel);
        fs::create_dir_all(project.join(".idea")).unwrap();
        fs::write(project.join(".idea/name"), name).unwrap();
        project
    }

    fn app_paths(config: &Path) -> AppPaths {
        AppPaths {
            run_path: config.to_path_buf(),
            config_path: config.to_path_buf(),
        }
    }

    #[test]
    fn test_read_resolves_candidates_in_document_order() {
        // Arrange
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        let p1 = named_project(dir.path(), "projects/one", "One");
        let p2 = named_project(dir.path(), "projects/two", "Two");
        let xml = recents_xml(
            "RecentDirectoryProjectsManager",
            &[&p2.to_string_lossy(), &p1.to_string_lossy()],
        );
        fs::write(config.join("options/recentProjectDirectories.xml"), xml).unwrap();

        // Act
        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let candidates = reader.read(&app_paths(&config)).unwrap();

        // Assert: document order preserved, basename derived.
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Two");
        assert_eq!(candidates[0].path, p2);
        assert_eq!(candidates[0].basename, "two");
        assert_eq!(candidates[1].name, "One");
    }

    #[test]
    fn test_read_priority_order_first_file_wins() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        let from_dirs = named_project(dir.path(), "a", "FromDirectories");
        let from_projects = named_project(dir.path(), "b", "FromProjects");

        fs::write(
            config.join("options/recentProjectDirectories.xml"),
            recents_xml(
                "RecentDirectoryProjectsManager",
                &[&from_dirs.to_string_lossy()],
            ),
        )
        .unwrap();
        fs::write(
            config.join("options/recentProjects.xml"),
            recents_xml("RecentProjectsManager", &[&from_projects.to_string_lossy()]),
        )
        .unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let candidates = reader.read(&app_paths(&config)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "FromDirectories");
    }

    #[test]
    fn test_read_substitutes_user_home_token() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        let home = dir.path().join("home");
        named_project(&home, "proj", "HomeProj");

        let xml = recents_xml("RecentProjectsManager", &["$USER_HOME$/proj"]);
        fs::write(config.join("options/recentProjects.xml"), xml).unwrap();

        let reader = CoreRecentProjectsReader::new(home.clone());
        let candidates = reader.read(&app_paths(&config)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].path, home.join("proj"));
    }

    #[test]
    fn test_read_substitutes_config_dir_token() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        named_project(&config, "scratch", "Scratch");

        let xml = recents_xml(
            "RecentProjectsManager",
            &["$APPLICATION_CONFIG_DIR$/scratch"],
        );
        fs::write(config.join("options/recentProjects.xml"), xml).unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let candidates = reader.read(&app_paths(&config)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Scratch");
    }

    #[test]
    fn test_read_skips_missing_and_nameless_paths() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        let good = named_project(dir.path(), "good", "Good");
        // Exists but has no resolvable name.
        let nameless = dir.path().join("nameless");
        fs::create_dir_all(&nameless).unwrap();

        let xml = recents_xml(
            "RecentProjectsManager",
            &[
                "/definitely/not/there",
                &nameless.to_string_lossy(),
                &good.to_string_lossy(),
            ],
        );
        fs::write(config.join("options/recentProjects.xml"), xml).unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let candidates = reader.read(&app_paths(&config)).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Good");
    }

    #[test]
    fn test_read_no_recents_file_errors_with_code_100() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(&config).unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let result = reader.read(&app_paths(&config));

        match result {
            Err(err @ RecentProjectsError::NoRecentsFile(_)) => {
                assert_eq!(err.code(), 100);
                assert_eq!(err.severity(), Severity::Stop);
            }
            other => panic!("Expected NoRecentsFile, got {other:?}"),
        }
    }

    #[test]
    fn test_read_corrupt_xml_propagates_as_caution() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        fs::write(
            config.join("options/recentProjects.xml"),
            "<application><unclosed",
        )
        .unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let result = reader.read(&app_paths(&config));

        match result {
            Err(err @ RecentProjectsError::Xml(_)) => {
                assert_eq!(err.severity(), Severity::Caution);
                assert_eq!(err.code(), 0);
            }
            other => panic!("Expected Xml error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_wrong_component_yields_empty_list() {
        // The chosen file is authoritative even when its structure is off.
        let dir = tempdir().unwrap();
        let config = dir.path().join("config");
        fs::create_dir_all(config.join("options")).unwrap();
        let xml = recents_xml("SomeOtherManager", &["/home/u/proj"]);
        fs::write(config.join("options/recentProjects.xml"), xml).unwrap();

        let reader = CoreRecentProjectsReader::new(PathBuf::from("/home/u"));
        let candidates = reader.read(&app_paths(&config)).unwrap();
        assert!(candidates.is_empty());
    }
}
