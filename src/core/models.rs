use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// A single discovered project. Identity is `path` (filesystem-native,
// case-sensitive); instances are never mutated after creation. Derives
// Serialize/Deserialize because the cache layer persists these as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCandidate {
    pub name: String,
    pub path: PathBuf,
    pub basename: String,
}

impl ProjectCandidate {
    /// Creates a candidate, deriving `basename` from the last path segment.
    pub fn new(name: String, path: PathBuf) -> Self {
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        ProjectCandidate {
            name,
            path,
            basename,
        }
    }
}

// Paths extracted from the IDE's command-line launcher script. Resolved once
// per search invocation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub run_path: PathBuf,
    pub config_path: PathBuf,
}

// Classification of a fatal search error, used to pick the alert icon on the
// synthesized error item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Stop,
    Caution,
}

const STOP_ICON: &str = "AlertStopIcon.icns";
const CAUTION_ICON: &str = "AlertCautionIcon.icns";
const NOTE_ICON: &str = "AlertNoteIcon.icns";

#[derive(Debug, Clone, Serialize)]
pub struct ItemIcon {
    pub path: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<String>,
}

impl ItemIcon {
    fn named(path: &str) -> Self {
        ItemIcon {
            path: path.to_string(),
            icon_type: None,
        }
    }

    // "fileicon" tells the consumer to render the icon of the file at `path`,
    // here the IDE application bundle itself.
    fn file_icon(path: &Path) -> Self {
        ItemIcon {
            path: path.to_string_lossy().into_owned(),
            icon_type: Some("fileicon".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemText {
    pub copy: String,
    pub largetype: String,
}

/*
 * One entry of the result list in the downstream script-filter schema. Only
 * the fields the core semantically produces are modeled; optional ones are
 * omitted from the serialized document when absent.
 */
#[derive(Debug, Clone, Serialize)]
pub struct ResultItem {
    pub uid: String,
    pub title: String,
    pub subtitle: String,
    pub arg: String,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_text: Option<String>,
    pub autocomplete: String,
    pub valid: bool,
    pub icon: ItemIcon,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<ItemText>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, String>,
}

impl ResultItem {
    /// Builds the item for one matched project.
    pub fn project(candidate: &ProjectCandidate, run_path: &Path) -> Self {
        let path_text = candidate.path.to_string_lossy().into_owned();
        let mut variables = HashMap::new();
        variables.insert("name".to_string(), candidate.name.clone());
        ResultItem {
            uid: candidate.name.clone(),
            title: candidate.name.clone(),
            subtitle: path_text.clone(),
            arg: path_text.clone(),
            match_text: Some(candidate.name.clone()),
            autocomplete: candidate.name.clone(),
            valid: true,
            icon: ItemIcon::file_icon(run_path),
            text: Some(ItemText {
                copy: path_text.clone(),
                largetype: path_text,
            }),
            variables,
        }
    }

    /// Sentinel for a non-empty query with zero hits.
    pub fn no_project_match(query: &str, run_path: &Path) -> Self {
        let title = format!("No project match '{query}'");
        ResultItem {
            uid: "not_found".to_string(),
            title: title.clone(),
            subtitle: title,
            arg: String::new(),
            match_text: None,
            autocomplete: String::new(),
            valid: false,
            icon: ItemIcon::file_icon(run_path),
            text: None,
            variables: HashMap::new(),
        }
    }

    /// Sentinel for an empty query that discovered nothing at all.
    pub fn no_results(run_path: &Path) -> Self {
        ResultItem {
            uid: "none".to_string(),
            title: "Can't find projects".to_string(),
            subtitle: "check configuration or contact developer".to_string(),
            arg: String::new(),
            match_text: None,
            autocomplete: String::new(),
            valid: false,
            icon: ItemIcon::file_icon(run_path),
            text: None,
            variables: HashMap::new(),
        }
    }

    /*
     * Converts a fatal search error into the single user-visible item. The
     * uid embeds the error code, and the severity selects a stop or caution
     * alert icon.
     */
    pub fn error(message: &str, detail: &str, code: u32, severity: Severity) -> Self {
        let icon = match severity {
            Severity::Stop => ItemIcon::named(STOP_ICON),
            Severity::Caution => ItemIcon::named(CAUTION_ICON),
        };
        ResultItem {
            uid: format!("e_{code}"),
            title: message.to_string(),
            subtitle: "Please enable log and contact developer".to_string(),
            arg: String::new(),
            match_text: None,
            autocomplete: String::new(),
            valid: false,
            icon,
            text: Some(ItemText {
                copy: detail.to_string(),
                largetype: detail.to_string(),
            }),
            variables: HashMap::new(),
        }
    }

    /// Trailing item pointing at the active debug log file.
    pub fn debug(debug_file: &Path) -> Self {
        let path_text = debug_file.to_string_lossy().into_owned();
        ResultItem {
            uid: "debug".to_string(),
            title: format!("Debug file: {path_text}"),
            subtitle: "Add this file to your issue - ⌘+C to get the path".to_string(),
            arg: String::new(),
            match_text: None,
            autocomplete: String::new(),
            valid: false,
            icon: ItemIcon::named(NOTE_ICON),
            text: Some(ItemText {
                copy: path_text.clone(),
                largetype: path_text,
            }),
            variables: HashMap::new(),
        }
    }
}

// The complete response document: ordered items plus result-level variables
// (currently only `bin`, the launcher path, set once AppPaths resolution
// succeeded). Built once per query.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SearchResult {
    pub items: Vec<ResultItem>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, String>,
}

impl SearchResult {
    pub fn new() -> Self {
        SearchResult::default()
    }

    pub fn add_item(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn add_variable(&mut self, key: &str, value: String) {
        self.variables.insert(key.to_string(), value);
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}
