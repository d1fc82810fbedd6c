//! Immutable set of paths and names skipped during traversal

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::warn;

/// Paths and names skipped during a scan.
///
/// Built once per invocation and passed by reference to every component
/// that needs it. There is no way to mutate a set after `build()`.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    excluded_paths: Vec<PathBuf>,
    excluded_names: Vec<NamePattern>,
    hidden_allow_list: HashSet<String>,
    case_insensitive: bool,
}

#[derive(Debug, Clone)]
struct NamePattern {
    raw: String,
    glob: Option<Pattern>,
}

impl ExclusionSet {
    pub fn builder() -> ExclusionSetBuilder {
        ExclusionSetBuilder::default()
    }

    /// A set that excludes nothing but hidden entries.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn excluded_paths(&self) -> &[PathBuf] {
        &self.excluded_paths
    }

    /// Check whether `path` lies under one of the excluded path prefixes.
    /// Matching is component-wise, so `/System` does not exclude `/Systems`.
    pub fn is_excluded_path(&self, path: &Path) -> bool {
        self.excluded_paths
            .iter()
            .any(|prefix| starts_with_components(path, prefix, self.case_insensitive))
    }

    /// Check a single path segment against the excluded names.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        self.excluded_names
            .iter()
            .any(|pattern| pattern.matches(name, self.case_insensitive))
    }

    /// Check whether a dot-prefixed name is on the allow-list.
    pub fn is_allowed_hidden(&self, name: &str) -> bool {
        if self.case_insensitive {
            let lowered = name.to_lowercase();
            self.hidden_allow_list
                .iter()
                .any(|allowed| allowed.to_lowercase() == lowered)
        } else {
            self.hidden_allow_list.contains(name)
        }
    }
}

impl NamePattern {
    fn new(raw: &str) -> Self {
        let glob = if raw.contains(['*', '?', '[']) {
            match Pattern::new(raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Invalid exclude pattern '{}': {}", raw, e);
                    None
                }
            }
        } else {
            None
        };
        Self {
            raw: raw.to_string(),
            glob,
        }
    }

    fn matches(&self, name: &str, case_insensitive: bool) -> bool {
        let exact = if case_insensitive {
            self.raw.to_lowercase() == name.to_lowercase()
        } else {
            self.raw == name
        };
        if exact {
            return true;
        }
        self.glob.as_ref().is_some_and(|glob| {
            glob.matches_with(
                name,
                MatchOptions {
                    case_sensitive: !case_insensitive,
                    ..MatchOptions::new()
                },
            )
        })
    }
}

fn starts_with_components(path: &Path, prefix: &Path, case_insensitive: bool) -> bool {
    if !case_insensitive {
        return path.starts_with(prefix);
    }
    let mut path_components = path.components();
    for prefix_component in prefix.components() {
        match path_components.next() {
            Some(component) if component_eq_ignore_case(component, prefix_component) => {}
            _ => return false,
        }
    }
    true
}

fn component_eq_ignore_case(a: Component<'_>, b: Component<'_>) -> bool {
    let a = a.as_os_str().to_string_lossy();
    let b = b.as_os_str().to_string_lossy();
    a.to_lowercase() == b.to_lowercase()
}

/// Builder for [`ExclusionSet`].
#[derive(Debug, Clone, Default)]
pub struct ExclusionSetBuilder {
    excluded_paths: Vec<PathBuf>,
    excluded_names: Vec<String>,
    hidden_allow_list: HashSet<String>,
    case_insensitive: bool,
}

impl ExclusionSetBuilder {
    /// Exclude everything at or under an absolute path.
    pub fn exclude_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.excluded_paths.push(path);
        }
        self
    }

    pub fn exclude_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().fold(self, |b, p| b.exclude_path(p))
    }

    /// Exclude any entry whose name, or any ancestor's name, matches.
    /// Accepts exact names and glob patterns (`*.photoslibrary`).
    pub fn exclude_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.excluded_names.push(name);
        }
        self
    }

    pub fn exclude_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |b, n| b.exclude_name(n))
    }

    /// Keep a dot-prefixed name even though hidden entries are skipped.
    pub fn allow_hidden(mut self, name: impl Into<String>) -> Self {
        self.hidden_allow_list.insert(name.into());
        self
    }

    pub fn allow_hidden_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |b, n| b.allow_hidden(n))
    }

    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    pub fn build(self) -> ExclusionSet {
        ExclusionSet {
            excluded_paths: self.excluded_paths,
            excluded_names: self
                .excluded_names
                .iter()
                .map(|n| NamePattern::new(n))
                .collect(),
            hidden_allow_list: self.hidden_allow_list,
            case_insensitive: self.case_insensitive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefix_is_component_wise() {
        let set = ExclusionSet::builder().exclude_path("/System").build();
        assert!(set.is_excluded_path(Path::new("/System")));
        assert!(set.is_excluded_path(Path::new("/System/Library/Fonts")));
        assert!(!set.is_excluded_path(Path::new("/Systems")));
        assert!(!set.is_excluded_path(Path::new("/Users/me/System")));
    }

    #[test]
    fn test_name_exact_and_glob() {
        let set = ExclusionSet::builder()
            .exclude_name("node_modules")
            .exclude_name("*.photoslibrary")
            .build();
        assert!(set.is_excluded_name("node_modules"));
        assert!(!set.is_excluded_name("node_modules_backup"));
        assert!(set.is_excluded_name("Photos Library.photoslibrary"));
        assert!(!set.is_excluded_name("photoslibrary.txt"));
    }

    #[test]
    fn test_case_sensitivity_is_a_flag() {
        let sensitive = ExclusionSet::builder()
            .exclude_name("Caches")
            .exclude_path("/Library/Mail")
            .allow_hidden(".Trash")
            .build();
        assert!(!sensitive.is_excluded_name("caches"));
        assert!(!sensitive.is_excluded_path(Path::new("/library/mail/inbox")));
        assert!(!sensitive.is_allowed_hidden(".trash"));

        let insensitive = ExclusionSet::builder()
            .exclude_name("Caches")
            .exclude_name("*.PhotosLibrary")
            .exclude_path("/Library/Mail")
            .allow_hidden(".Trash")
            .case_insensitive(true)
            .build();
        assert!(insensitive.is_excluded_name("caches"));
        assert!(insensitive.is_excluded_name("x.photoslibrary"));
        assert!(insensitive.is_excluded_path(Path::new("/library/mail/inbox")));
        assert!(insensitive.is_allowed_hidden(".trash"));
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let set = ExclusionSet::builder()
            .exclude_name("  ")
            .exclude_path("")
            .build();
        assert!(set.excluded_paths().is_empty());
        assert!(!set.is_excluded_name("  "));
    }
}
