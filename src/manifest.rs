use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::artifact::RuntimeArtifact;
use crate::config::{ApplicationConfig, BuildLayout, JAVA_VERSION};
use crate::error::{PackagingError, Result};

/// Value of `program_type` for every generated manifest.
pub const PROGRAM_TYPE: &str = "java";

/// Java releases the launcher knows how to locate.
pub const SUPPORTED_JAVA_VERSIONS: [u32; 3] = [11, 17, 21];

/// The `my-java-launcher.json` document. Field order is the key order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchManifest {
    pub program_type: String,
    pub entrypoint: String,
    pub java_configuration: JavaConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaConfiguration {
    pub java_version: u32,
    pub classpath: Vec<String>,
}

pub struct ManifestGenerator {
    layout: BuildLayout,
}

impl ManifestGenerator {
    pub fn new(layout: BuildLayout) -> Self {
        Self { layout }
    }

    pub fn generate_manifest(
        &self,
        config: &ApplicationConfig,
        artifacts: &[RuntimeArtifact],
    ) -> LaunchManifest {
        LaunchManifest {
            program_type: PROGRAM_TYPE.to_string(),
            entrypoint: config.main_class().to_string(),
            java_configuration: JavaConfiguration {
                java_version: JAVA_VERSION,
                classpath: artifacts.iter().map(RuntimeArtifact::classpath_entry).collect(),
            },
        }
    }

    /// Writes `manifest` to `<build-dir>/my-java-launcher/manifest/my-java-launcher.json`,
    /// replacing any previous manifest.
    pub fn write_manifest(&self, manifest: &LaunchManifest) -> Result<PathBuf> {
        let manifest_path = self.layout.manifest_path();

        if let Some(manifest_parent) = manifest_path.parent() {
            fs::create_dir_all(manifest_parent)
                .map_err(|e| PackagingError::io(manifest_parent, e))?;
        }

        let manifest_json = to_json(manifest)?;

        fs::write(&manifest_path, manifest_json)
            .map_err(|e| PackagingError::io(&manifest_path, e))?;

        info!(
            path = %manifest_path.display(),
            entries = manifest.java_configuration.classpath.len(),
            "generated manifest"
        );

        Ok(manifest_path)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.layout.manifest_path()
    }
}

/// Pretty-printed JSON with two-space indentation and one array element per line.
pub fn to_json(manifest: &LaunchManifest) -> Result<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}

pub fn read_manifest(manifest_path: &Path) -> Result<LaunchManifest> {
    let manifest_content = fs::read_to_string(manifest_path)
        .map_err(|e| PackagingError::io(manifest_path, e))?;

    let manifest: LaunchManifest =
        serde_json::from_str(&manifest_content).map_err(|source| PackagingError::ManifestParse {
            path: manifest_path.to_path_buf(),
            source,
        })?;

    debug!(path = %manifest_path.display(), "read manifest");

    Ok(manifest)
}

/// Applies the checks the launcher performs before it starts the JVM.
pub fn validate_manifest(manifest: &LaunchManifest) -> Result<()> {
    if manifest.program_type != PROGRAM_TYPE {
        return Err(PackagingError::invalid_manifest(format!(
            "only Java programs are supported but 'program_type' was set to '{}'",
            manifest.program_type
        )));
    }

    if manifest.entrypoint.trim().is_empty() {
        return Err(PackagingError::invalid_manifest("'entrypoint' is required"));
    }

    let java_version = manifest.java_configuration.java_version;
    if !SUPPORTED_JAVA_VERSIONS.contains(&java_version) {
        return Err(PackagingError::invalid_manifest(format!(
            "'java_version' must be one of {:?} but was {}",
            SUPPORTED_JAVA_VERSIONS, java_version
        )));
    }

    let classpath = &manifest.java_configuration.classpath;
    if classpath.is_empty() {
        return Err(PackagingError::invalid_manifest(
            "'classpath' must contain at least one entry",
        ));
    }

    for entry in classpath {
        let file_name = entry.strip_prefix("../lib/").unwrap_or_default();
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(PackagingError::invalid_manifest(format!(
                "classpath entry '{}' must name a file directly inside '../lib/'",
                entry
            )));
        }
    }

    Ok(())
}
