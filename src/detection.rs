//! Auto-detection of project defaults for the config wizard.
//!
//! Probes a book project directory to suggest sensible defaults for title,
//! author, entry files, and theme stylesheets based on common project
//! conventions.

use crate::entry_ordering::sort_entries;
use std::path::{Path, PathBuf};

/// Detected default values for a book project.
#[derive(Debug, Default)]
pub struct DetectedDefaults {
    pub title: Option<String>,
    pub author: Option<String>,
    pub entries: Vec<PathBuf>,
    pub stylesheets: Vec<PathBuf>,
}

/// Detect sensible defaults from a project path.
pub fn detect_defaults(project_dir: &Path) -> DetectedDefaults {
    DetectedDefaults {
        title: detect_title(project_dir),
        author: detect_author(project_dir),
        entries: detect_entries(project_dir),
        stylesheets: detect_stylesheets(project_dir),
    }
}

/// Detect title from `package.json`, falling back to the directory name.
///
/// Book projects rendered by an npm-based engine usually carry a
/// `package.json`; its `name` beats a guess from the directory.
fn detect_title(project_dir: &Path) -> Option<String> {
    if let Some(name) = read_package_json_field(project_dir, "name") {
        let title = title_case(&name);
        if !title.is_empty() {
            return Some(title);
        }
    }

    let canonical = project_dir.canonicalize().ok()?;
    let dir_name = canonical.file_name()?.to_str()?;
    let title = title_case(dir_name);

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Detect author from `package.json`.
fn detect_author(project_dir: &Path) -> Option<String> {
    read_package_json_field(project_dir, "author").filter(|a| !a.is_empty())
}

fn read_package_json_field(project_dir: &Path, field: &str) -> Option<String> {
    let contents = std::fs::read_to_string(project_dir.join("package.json")).ok()?;
    let parsed: serde_json::Value = serde_json::from_str(&contents).ok()?;
    Some(parsed.get(field)?.as_str()?.to_string())
}

/// Replace separators with spaces and title-case each word.
fn title_case(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Detect entry candidates: top-level Markdown files, in reading order.
fn detect_entries(project_dir: &Path) -> Vec<PathBuf> {
    let mut entries = files_with_extension(project_dir, "md");
    sort_entries(&mut entries);
    entries
}

/// Detect local stylesheet candidates: `*.css` in the root and under `theme/`.
fn detect_stylesheets(project_dir: &Path) -> Vec<PathBuf> {
    let mut stylesheets = files_with_extension(project_dir, "css");
    for path in files_with_extension(&project_dir.join("theme"), "css") {
        stylesheets.push(PathBuf::from("theme").join(path));
    }
    stylesheets.sort();
    stylesheets
}

/// Non-recursive listing of `*.{ext}` file names in a directory.
fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    read_dir
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = PathBuf::from(entry.file_name());
            let matches = name
                .extension()
                .map(|e| e.eq_ignore_ascii_case(ext))
                .unwrap_or(false);
            matches.then_some(name)
        })
        .collect()
}
