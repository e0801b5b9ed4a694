/*
 * Resolves a human-readable display name for a project directory. The IDE
 * records the name in one of several places depending on product and version,
 * so resolution runs an ordered chain of file-format probes with
 * first-success semantics. Every probe treats a missing or unreadable file as
 * a plain failure; only structural corruption of an existing workspace.xml is
 * worth a logged warning, and even that never escalates past the probe.
 *
 * Callers treat "no name" as "skip this candidate", never as an error.
 */
use glob::glob;
use std::fs;
use std::path::Path;

type Probe = fn(&Path) -> Option<String>;

// Evaluated in order; the one file layout per probe keeps each strategy a
// plain function instead of dispatching on names at runtime.
const PROBES: [(&str, Probe); 5] = [
    ("idea-name", probe_idea_name),
    ("idea-dot-name", probe_idea_dot_name),
    ("idea-iml", probe_idea_iml),
    ("idea-workspace", probe_idea_workspace),
    ("solution-file", probe_solution_file),
];

/// Runs the probe chain; first non-empty result wins.
pub fn resolve_project_name(project: &Path) -> Option<String> {
    for (label, probe) in PROBES {
        if let Some(name) = probe(project) {
            log::trace!("ProjectName: {project:?} resolved via '{label}' probe: {name}");
            return Some(name);
        }
    }
    log::debug!("ProjectName: No probe produced a name for {project:?}");
    None
}

/// `<project>/.idea/name` — plain-text name file used by recent IDE versions.
fn probe_idea_name(project: &Path) -> Option<String> {
    read_trimmed(&project.join(".idea").join("name"))
}

/// `<project>/.idea/.name` — the legacy hidden variant of the same file.
fn probe_idea_dot_name(project: &Path) -> Option<String> {
    read_trimmed(&project.join(".idea").join(".name"))
}

/// `<project>/.idea/*.iml` — module descriptor files are conventionally named
/// after the project; the first match's file stem is the name.
fn probe_idea_iml(project: &Path) -> Option<String> {
    let pattern = project.join(".idea").join("*.iml");
    let entries = glob(&pattern.to_string_lossy()).ok()?;
    for entry in entries.flatten() {
        if let Some(stem) = entry.file_stem() {
            let name = stem.to_string_lossy().into_owned();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

/*
 * `<project>/.idea/workspace.xml` — two known places carry the name:
 * the ProjectView pane's first PATH_ELEMENT option value, or (for products
 * that track a `.iws` workspace file in ChangeListManager's ignore list) the
 * stem of that ignored path.
 */
fn probe_idea_workspace(project: &Path) -> Option<String> {
    let workspace = project.join(".idea").join("workspace.xml");
    let content = fs::read_to_string(&workspace).ok()?;
    let doc = match roxmltree::Document::parse(&content) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("ProjectName: Failed to parse {workspace:?}: {e}");
            return None;
        }
    };

    if let Some(name) = project_view_name(&doc) {
        return Some(name);
    }
    iws_ignore_name(&doc)
}

fn project_view_name(doc: &roxmltree::Document) -> Option<String> {
    let pane = doc
        .descendants()
        .find(|n| n.has_tag_name("component") && n.attribute("name") == Some("ProjectView"))?
        .descendants()
        .find(|n| n.has_tag_name("pane") && n.attribute("id") == Some("ProjectPane"))?;
    pane.descendants()
        .filter(|n| n.has_tag_name("PATH_ELEMENT"))
        .flat_map(|n| n.children().filter(|c| c.has_tag_name("option")))
        .filter_map(|n| n.attribute("value"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn iws_ignore_name(doc: &roxmltree::Document) -> Option<String> {
    let ignored = doc
        .descendants()
        .find(|n| n.has_tag_name("component") && n.attribute("name") == Some("ChangeListManager"))?
        .children()
        .filter(|n| n.has_tag_name("ignored"))
        .filter_map(|n| n.attribute("path"))
        .find(|p| p.contains(".iws"))?;
    let stem = Path::new(ignored).file_stem()?.to_string_lossy().into_owned();
    if stem.is_empty() { None } else { Some(stem) }
}

/// The project directory itself may be a solution container: `<project>/*.sln`.
fn probe_solution_file(project: &Path) -> Option<String> {
    let pattern = project.join("*.sln");
    let entries = glob(&pattern.to_string_lossy()).ok()?;
    for entry in entries.flatten() {
        if let Some(stem) = entry.file_stem() {
            let name = stem.to_string_lossy().into_owned();
            if !name.is_empty() {
                return Some(name);
            }
        }
    }
    None
}

fn read_trimmed(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
