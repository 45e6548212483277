use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_DIRS: &[&str] = &[".git", ".hg", ".svn", "target", "node_modules"];

/// What a directory walk turned up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Candidate agent files, sorted
    pub files: Vec<PathBuf>,
    /// Paths the walk could not enter, with the reason
    pub unreadable: Vec<(PathBuf, String)>,
}

impl Discovery {
    pub fn single(path: PathBuf) -> Self {
        Self {
            files: vec![path],
            unreadable: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Find candidate agent definition files under `root`.
///
/// Only `.md` files are returned. A file is skipped when any component of
/// its path relative to `root` contains one of the `exclude` substrings.
/// Files are sorted so repeated runs see them in the same order.
pub fn discover_agent_files(root: &Path, exclude: &[String]) -> Discovery {
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_ignored_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                if is_excluded(&path, root, exclude) {
                    continue;
                }
                tracing::warn!(path = %path.display(), error = %e, "cannot read directory entry");
                discovery.unreadable.push((path, e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file()
            || !entry.path().extension().is_some_and(|ext| ext == "md")
        {
            continue;
        }
        if is_excluded(entry.path(), root, exclude) {
            tracing::debug!(path = %entry.path().display(), "excluded by pattern");
            continue;
        }
        discovery.files.push(entry.into_path());
    }

    discovery.files.sort();
    discovery.unreadable.sort();
    discovery
}

fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| IGNORED_DIRS.contains(&name))
}

fn is_excluded(path: &Path, root: &Path, exclude: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| {
        let component = component.as_os_str().to_string_lossy();
        exclude
            .iter()
            .filter(|pattern| !pattern.is_empty())
            .any(|pattern| component.contains(pattern.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn default_exclude() -> Vec<String> {
        vec!["template".to_string(), "docs".to_string()]
    }

    #[test]
    fn test_discovers_markdown_recursively_and_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("quality/nested")).unwrap();
        fs::write(root.join("zeta.md"), "").unwrap();
        fs::write(root.join("alpha.md"), "").unwrap();
        fs::write(root.join("quality/nested/reviewer.md"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        let files = discover_agent_files(root, &default_exclude()).files;
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("alpha.md"),
                PathBuf::from("quality/nested/reviewer.md"),
                PathBuf::from("zeta.md"),
            ]
        );
    }

    #[test]
    fn test_skips_templates_docs_and_tool_dirs() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("docs/guide.md"), "").unwrap();
        fs::write(root.join("agent-template.md"), "").unwrap();
        fs::write(root.join(".git/description.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/readme.md"), "").unwrap();
        fs::write(root.join("keeper.md"), "").unwrap();

        let discovery = discover_agent_files(root, &default_exclude());
        assert_eq!(discovery.files, vec![root.join("keeper.md")]);
        assert!(discovery.unreadable.is_empty());
    }

    #[test]
    fn test_exclusion_is_relative_to_root() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("docs-site");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("writer.md"), "").unwrap();

        let files = discover_agent_files(&root, &default_exclude()).files;
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_empty_directory() {
        let temp = tempfile::tempdir().unwrap();
        assert!(discover_agent_files(temp.path(), &default_exclude()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_reported_not_dropped() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("nested/helper.md"), "").unwrap();
        std::os::unix::fs::symlink(root, root.join("nested/back")).unwrap();

        let discovery = discover_agent_files(root, &default_exclude());
        assert_eq!(discovery.files, vec![root.join("nested/helper.md")]);
        assert_eq!(discovery.unreadable.len(), 1);
        assert_eq!(discovery.unreadable[0].0, root.join("nested/back"));
        assert_eq!(discovery.len(), 2);
    }
}
