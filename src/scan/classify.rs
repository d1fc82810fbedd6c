//! Path classification: what to skip and what kind an entry is

use std::fs::Metadata;
use std::path::{Component, Path};

use super::exclusion::ExclusionSet;
use super::types::EntryKind;

/// Outcome of classifying one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Include,
    /// Hidden entry; skipped without comment
    ExcludeSilently,
    /// Matched a configured system path or name
    ExcludeWithWarning,
}

impl Classification {
    pub fn is_included(self) -> bool {
        matches!(self, Classification::Include)
    }
}

/// Decide whether a path takes part in the scan.
///
/// System exclusions win over the hidden rule: a hidden folder that is
/// also a configured system folder is reported as `ExcludeWithWarning`.
/// The entry kind does not change the outcome today; it is part of the
/// contract so callers never need to re-stat to classify.
pub fn classify(path: &Path, _kind: EntryKind, exclusions: &ExclusionSet) -> Classification {
    if is_system_excluded(path, exclusions) {
        return Classification::ExcludeWithWarning;
    }

    match leaf_name(path) {
        Some(name) if is_hidden_name(&name) && !exclusions.is_allowed_hidden(&name) => {
            Classification::ExcludeSilently
        }
        _ => Classification::Include,
    }
}

/// Classify the scan root. The root was chosen explicitly, so the hidden
/// rule does not apply to it.
pub fn classify_root(root: &Path, exclusions: &ExclusionSet) -> Classification {
    if is_system_excluded(root, exclusions) {
        Classification::ExcludeWithWarning
    } else {
        Classification::Include
    }
}

fn is_system_excluded(path: &Path, exclusions: &ExclusionSet) -> bool {
    if exclusions.is_excluded_path(path) {
        return true;
    }
    path.components().any(|component| match component {
        Component::Normal(segment) => exclusions.is_excluded_name(&segment.to_string_lossy()),
        _ => false,
    })
}

/// Derive the entry kind from `symlink_metadata` output.
pub fn entry_kind(metadata: &Metadata) -> EntryKind {
    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn leaf_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}

fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}
