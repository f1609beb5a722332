use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::{BuildLayout, LAUNCHER_NAME};
use crate::error::{PackagingError, Result};
use crate::fsops::{copy_file, reset_dir};

/// Finds the launcher executable on the search path and copies it into the
/// build's staging directory.
pub struct LauncherLocator {
    launcher_name: String,
    search_path: Option<OsString>,
    layout: BuildLayout,
}

impl LauncherLocator {
    /// Searches the `PATH` of the current process.
    pub fn new(layout: BuildLayout) -> Self {
        Self {
            launcher_name: LAUNCHER_NAME.to_string(),
            search_path: std::env::var_os("PATH"),
            layout,
        }
    }

    pub fn search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    pub fn launcher_name(mut self, launcher_name: impl Into<String>) -> Self {
        self.launcher_name = launcher_name.into();
        self
    }

    /// Directories to visit, in search order. Empty entries are skipped.
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        match &self.search_path {
            Some(value) => split_search_path(value),
            None => Vec::new(),
        }
    }

    /// Returns the launcher in the first directory that contains one.
    pub fn find(&self) -> Result<PathBuf> {
        let search_dirs = self.search_dirs();

        for dir in &search_dirs {
            let candidate = dir.join(&self.launcher_name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "found launcher");
                return Ok(candidate);
            }
        }

        Err(PackagingError::LauncherNotFound {
            launcher: self.launcher_name.clone(),
            searched: search_dirs,
        })
    }

    /// Clears the staging directory, then copies the located launcher into it
    /// under its original name.
    pub fn stage(&self) -> Result<PathBuf> {
        let staging_dir = self.layout.staging_dir();
        reset_dir(&staging_dir)?;

        let launcher = self.find()?;
        let staged = staging_dir.join(&self.launcher_name);

        copy_file(&launcher, &staged)?;

        info!(
            from = %launcher.display(),
            to = %staged.display(),
            "staged launcher"
        );

        Ok(staged)
    }
}

fn split_search_path(value: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|dir| !dir.as_os_str().is_empty())
        .collect()
}
