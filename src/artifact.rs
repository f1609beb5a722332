use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PackagingError, Result};

/// One file that belongs on the program's runtime classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeArtifact {
    file_name: String,
    path: PathBuf,
}

impl RuntimeArtifact {
    /// Resolves `path` to an absolute location, failing when the file does not exist.
    /// The file name is taken from `path` itself, so a symlink keeps its own name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let resolved = fs::canonicalize(path).map_err(|e| PackagingError::io(path, e))?;
        if resolved.is_dir() {
            return Err(PackagingError::configuration(format!(
                "runtime artifact {} is a directory, only files are supported",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| {
                PackagingError::configuration(format!(
                    "runtime artifact {} has no UTF-8 file name",
                    path.display()
                ))
            })?
            .to_string();

        Ok(Self {
            file_name,
            path: resolved,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manifest classpath entry pointing into the sibling `lib/` directory.
    pub fn classpath_entry(&self) -> String {
        format!("../lib/{}", self.file_name)
    }
}

/// Resolves path-list strings (entries joined with the platform separator) in order.
pub fn resolve_classpath<S: AsRef<OsStr>>(path_lists: &[S]) -> Result<Vec<RuntimeArtifact>> {
    let mut artifacts = Vec::new();

    for list in path_lists {
        for entry in std::env::split_paths(list.as_ref()) {
            if entry.as_os_str().is_empty() {
                continue;
            }
            let artifact = RuntimeArtifact::from_path(&entry)?;
            debug!(artifact = %artifact.file_name(), path = %artifact.path().display(), "resolved runtime artifact");
            artifacts.push(artifact);
        }
    }

    Ok(artifacts)
}

/// File names that occur more than once. They would collide in `lib/`,
/// so the caller is warned but the sequence is left untouched.
pub fn duplicate_file_names<'a>(
    artifacts: impl IntoIterator<Item = &'a RuntimeArtifact>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for artifact in artifacts {
        let name = artifact.file_name();
        if !seen.insert(name) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }

    for name in &duplicates {
        warn!(artifact = %name, "several runtime artifacts share a file name; the last one copied wins");
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, name).unwrap();
        path
    }

    #[test]
    fn test_artifact_from_path() {
        let temp = TempDir::new().unwrap();
        let jar = touch(temp.path(), "app.jar");

        let artifact = RuntimeArtifact::from_path(&jar).unwrap();
        assert_eq!(artifact.file_name(), "app.jar");
        assert!(artifact.path().is_absolute());
        assert_eq!(artifact.classpath_entry(), "../lib/app.jar");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_artifact_keeps_link_name() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("store");
        fs::create_dir_all(&store).unwrap();
        let target = touch(&store, "abc123-gson-2.10.jar");

        let libs = temp.path().join("libs");
        fs::create_dir_all(&libs).unwrap();
        let link = libs.join("gson-2.10.jar");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let artifact = RuntimeArtifact::from_path(&link).unwrap();
        assert_eq!(artifact.file_name(), "gson-2.10.jar");
        assert_eq!(artifact.classpath_entry(), "../lib/gson-2.10.jar");
        assert_eq!(artifact.path(), fs::canonicalize(&target).unwrap());
    }

    #[test]
    fn test_missing_artifact_is_io_error() {
        let temp = TempDir::new().unwrap();
        let err = RuntimeArtifact::from_path(temp.path().join("missing.jar")).unwrap_err();
        assert!(matches!(err, PackagingError::Io { .. }));
    }

    #[test]
    fn test_directory_artifact_is_rejected() {
        let temp = TempDir::new().unwrap();
        let err = RuntimeArtifact::from_path(temp.path()).unwrap_err();
        assert!(matches!(err, PackagingError::Configuration { .. }));
    }

    #[test]
    fn test_resolve_classpath_preserves_order() {
        let temp = TempDir::new().unwrap();
        let b = touch(temp.path(), "b.jar");
        let a = touch(temp.path(), "a.jar");
        let c = touch(temp.path(), "c.jar");

        let joined = std::env::join_paths([&b, &a]).unwrap();
        let artifacts = resolve_classpath(&[joined, c.into_os_string()]).unwrap();

        let names: Vec<_> = artifacts.iter().map(|a| a.file_name()).collect();
        assert_eq!(names, vec!["b.jar", "a.jar", "c.jar"]);
    }

    #[test]
    fn test_resolve_classpath_skips_empty_entries() {
        let artifacts = resolve_classpath::<&str>(&[""]).unwrap();
        assert!(artifacts.is_empty());
    }

    #[test]
    fn test_duplicate_file_names() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let artifacts = vec![
            RuntimeArtifact::from_path(touch(first.path(), "dup.jar")).unwrap(),
            RuntimeArtifact::from_path(touch(first.path(), "unique.jar")).unwrap(),
            RuntimeArtifact::from_path(touch(second.path(), "dup.jar")).unwrap(),
        ];

        assert_eq!(duplicate_file_names(&artifacts), vec!["dup.jar"]);
    }
}
