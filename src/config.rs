use std::path::{Path, PathBuf};

use crate::error::{PackagingError, Result};

/// Name of the launcher executable searched for on the `PATH`.
pub const LAUNCHER_NAME: &str = "my-java-launcher";

/// Canonical file name of the manifest, read by the launcher from its own directory.
pub const MANIFEST_FILE_NAME: &str = "my-java-launcher.json";

/// Java release every generated manifest requires.
pub const JAVA_VERSION: u32 = 21;

/// The only recognized application setting: which class to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationConfig {
    main_class: String,
}

impl ApplicationConfig {
    pub fn new(main_class: impl Into<String>) -> Result<Self> {
        let main_class = main_class.into().trim().to_string();

        if main_class.is_empty() {
            return Err(PackagingError::configuration(
                "the main class must be set to a fully qualified class name",
            ));
        }

        Ok(Self { main_class })
    }

    pub fn main_class(&self) -> &str {
        &self.main_class
    }
}

/// Intermediate directories below the build directory.
///
/// Both the staged launcher and the generated manifest live under
/// `<build-dir>/my-java-launcher/`, in `launcher/` and `manifest/` respectively.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    build_dir: PathBuf,
}

impl BuildLayout {
    pub fn new(build_dir: impl AsRef<Path>) -> Self {
        Self {
            build_dir: build_dir.as_ref().to_path_buf(),
        }
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    fn launcher_root(&self) -> PathBuf {
        self.build_dir.join(LAUNCHER_NAME)
    }

    pub fn manifest_dir(&self) -> PathBuf {
        self.launcher_root().join("manifest")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest_dir().join(MANIFEST_FILE_NAME)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.launcher_root().join("launcher")
    }

    pub fn staged_launcher_path(&self) -> PathBuf {
        self.staging_dir().join(LAUNCHER_NAME)
    }

    /// Default distribution root: `<build-dir>/install/<program-name>`.
    pub fn default_dist_dir(&self, program_name: &str) -> PathBuf {
        self.build_dir.join("install").join(program_name)
    }
}

/// Checks the program name used for the launcher rename.
pub fn validate_program_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(PackagingError::configuration("the program name must not be empty"));
    }

    if name.trim() != name {
        return Err(PackagingError::configuration(format!(
            "the program name '{}' must not start or end with whitespace",
            name
        )));
    }

    let mut components = Path::new(name).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if !is_plain {
        return Err(PackagingError::configuration(format!(
            "the program name '{}' must be a plain file name",
            name
        )));
    }

    if name == MANIFEST_FILE_NAME {
        return Err(PackagingError::configuration(format!(
            "the program name '{}' collides with the manifest file name",
            name
        )));
    }

    Ok(())
}
