//! Threshold and mode filtering

use std::collections::HashSet;
use std::path::Path;

use super::config::ScanMode;
use super::types::EntryKind;

/// Mode-specific inclusion predicate.
#[derive(Debug, Clone)]
pub struct ModePredicate {
    mode: ScanMode,
    video_extensions: HashSet<String>,
}

impl ModePredicate {
    /// `video_extensions` must already be lowercase without dots
    /// (see [`normalize_extensions`](super::config::normalize_extensions)).
    pub fn new(mode: ScanMode, video_extensions: HashSet<String>) -> Self {
        Self {
            mode,
            video_extensions,
        }
    }

    pub fn matches(&self, path: &Path, kind: EntryKind) -> bool {
        match self.mode {
            ScanMode::Files => kind == EntryKind::File,
            ScanMode::Dirs => kind == EntryKind::Directory,
            ScanMode::Videos => kind == EntryKind::File && self.is_video(path),
        }
    }

    fn is_video(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.video_extensions.contains(&ext))
    }
}

/// Inclusive threshold check combined with the mode predicate.
pub fn include(
    size_bytes: u64,
    threshold_bytes: u64,
    path: &Path,
    kind: EntryKind,
    predicate: &ModePredicate,
) -> bool {
    size_bytes >= threshold_bytes && predicate.matches(path, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::config::normalize_extensions;

    fn videos() -> ModePredicate {
        ModePredicate::new(ScanMode::Videos, normalize_extensions(["mkv", "mp4"]))
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let files = ModePredicate::new(ScanMode::Files, HashSet::new());
        let path = Path::new("a.bin");
        assert!(include(1024, 1024, path, EntryKind::File, &files));
        assert!(!include(1023, 1024, path, EntryKind::File, &files));
    }

    #[test]
    fn test_mode_selects_kind() {
        let files = ModePredicate::new(ScanMode::Files, HashSet::new());
        let dirs = ModePredicate::new(ScanMode::Dirs, HashSet::new());
        let path = Path::new("thing");

        assert!(files.matches(path, EntryKind::File));
        assert!(!files.matches(path, EntryKind::Directory));
        assert!(!files.matches(path, EntryKind::Symlink));
        assert!(dirs.matches(path, EntryKind::Directory));
        assert!(!dirs.matches(path, EntryKind::File));
    }

    #[test]
    fn test_video_extension_is_case_insensitive() {
        let predicate = videos();
        assert!(predicate.matches(Path::new("/m/Movie.MKV"), EntryKind::File));
        assert!(predicate.matches(Path::new("/m/clip.mp4"), EntryKind::File));
        assert!(!predicate.matches(Path::new("/m/notes.txt"), EntryKind::File));
        assert!(!predicate.matches(Path::new("/m/noext"), EntryKind::File));
        assert!(!predicate.matches(Path::new("/m/dir.mkv"), EntryKind::Directory));
    }
}
