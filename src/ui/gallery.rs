//! Gallery templates: ready-made documents the user can start from.
//!
//! Templates live at `gallery/<name>/<name>.json` relative to the working
//! directory; a couple of built-ins ship embedded so the gallery is never
//! empty. Both feed through the regular template load path.

use crate::constants;
use std::path::PathBuf;

/// Built-in gallery templates embedded at compile time.
pub const BUILTIN_GALLERY: [(&str, &str); 2] = [
    (
        "daily-planner",
        include_str!("../../gallery/daily-planner/daily-planner.json"),
    ),
    (
        "meeting-notes",
        include_str!("../../gallery/meeting-notes/meeting-notes.json"),
    ),
];

/// Path a named gallery template is expected at on disk.
fn gallery_path(name: &str) -> PathBuf {
    PathBuf::from(constants::GALLERY_DIR)
        .join(name)
        .join(format!("{name}.json"))
}

/// Lists gallery template names: built-ins first, then any extra templates
/// found on disk, in directory order.
pub fn gallery_template_names() -> Vec<String> {
    let mut names: Vec<String> = BUILTIN_GALLERY
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect();

    if let Ok(entries) = std::fs::read_dir(constants::GALLERY_DIR) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if names.contains(&name) {
                continue;
            }
            if gallery_path(&name).is_file() {
                names.push(name);
            }
        }
    }
    names
}

/// Loads a gallery template's raw JSON: the on-disk file when present,
/// otherwise the embedded built-in.
pub fn load_gallery_template(name: &str) -> Result<String, String> {
    let path = gallery_path(name);
    if path.is_file() {
        return std::fs::read_to_string(&path)
            .map_err(|err| format!("failed to read {}: {err}", path.display()));
    }
    BUILTIN_GALLERY
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, json)| (*json).to_string())
        .ok_or_else(|| format!("unknown gallery template `{name}`"))
}
