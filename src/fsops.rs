use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{PackagingError, Result};

/// Removes `dir` (or a file squatting on its path) and recreates it empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    match fs::symlink_metadata(dir) {
        Ok(metadata) if metadata.is_dir() => {
            fs::remove_dir_all(dir).map_err(|e| PackagingError::io(dir, e))?
        }
        Ok(_) => fs::remove_file(dir).map_err(|e| PackagingError::io(dir, e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(PackagingError::io(dir, e)),
    }

    fs::create_dir_all(dir).map_err(|e| PackagingError::io(dir, e))
}

/// Byte-for-byte copy that keeps permission bits. Failures opening or reading
/// the source name `from`; failures creating or writing the destination name `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let mut source = File::open(from).map_err(|e| PackagingError::io(from, e))?;
    let metadata = source.metadata().map_err(|e| PackagingError::io(from, e))?;
    if !metadata.is_file() {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "source is not a regular file");
        return Err(PackagingError::io(from, err));
    }

    let mut destination = File::create(to).map_err(|e| PackagingError::io(to, e))?;
    io::copy(&mut source, &mut destination).map_err(|e| PackagingError::io(to, e))?;
    fs::set_permissions(to, metadata.permissions()).map_err(|e| PackagingError::io(to, e))?;

    debug!(from = %from.display(), to = %to.display(), "copied file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_dir_clears_contents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("lib");
        fs::create_dir_all(target.join("nested")).unwrap();
        fs::write(target.join("old.jar"), "old").unwrap();

        reset_dir(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_reset_dir_replaces_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("staging");
        fs::write(&target, "file in the way").unwrap();

        reset_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_copy_missing_source_names_source() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.jar");

        match copy_file(&missing, &temp.path().join("out.jar")).unwrap_err() {
            PackagingError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_copy_into_missing_directory_names_destination() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("app.jar");
        fs::write(&from, "app").unwrap();
        let to = temp.path().join("missing").join("app.jar");

        match copy_file(&from, &to).unwrap_err() {
            PackagingError::Io { path, .. } => assert_eq!(path, to),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_copy_directory_source_is_rejected() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("classes");
        fs::create_dir_all(&from).unwrap();

        match copy_file(&from, &temp.path().join("out.jar")).unwrap_err() {
            PackagingError::Io { path, .. } => assert_eq!(path, from),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_unreadable_source_names_source() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let from = temp.path().join("locked.jar");
        fs::write(&from, "locked").unwrap();
        fs::set_permissions(&from, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still read the file; nothing to check then.
        if File::open(&from).is_ok() {
            return;
        }

        let to = temp.path().join("out.jar");
        match copy_file(&from, &to).unwrap_err() {
            PackagingError::Io { path, .. } => assert_eq!(path, from),
            other => panic!("unexpected error: {}", other),
        }
        assert!(!to.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_keeps_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let from = temp.path().join("launcher");
        fs::write(&from, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&from, fs::Permissions::from_mode(0o755)).unwrap();

        let to = temp.path().join("myapp");
        copy_file(&from, &to).unwrap();

        let mode = fs::metadata(&to).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
