use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::artifact::{RuntimeArtifact, duplicate_file_names};
use crate::config::{MANIFEST_FILE_NAME, validate_program_name};
use crate::error::{PackagingError, Result};
use crate::fsops::{copy_file, reset_dir};
use crate::manifest::{read_manifest, validate_manifest};

/// Everything the assembler merges into a distribution.
#[derive(Debug, Clone)]
pub struct DistributionInputs<'a> {
    pub program_name: &'a str,
    pub staged_launcher: &'a Path,
    pub manifest: &'a Path,
    /// The program artifact followed by its dependencies, in classpath order.
    pub artifacts: &'a [RuntimeArtifact],
}

/// A fully assembled distribution tree.
#[derive(Debug, Clone)]
pub struct Distribution {
    pub root: PathBuf,
    pub launcher: PathBuf,
    pub manifest: PathBuf,
    pub libraries: Vec<PathBuf>,
}

impl Distribution {
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }
}

pub struct DistributionAssembler {
    root: PathBuf,
}

impl DistributionAssembler {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Rebuilds `bin/` and `lib/` from scratch. A failure part way leaves
    /// an unusable tree that the next successful run replaces.
    ///
    /// The manifest's classpath must list exactly `inputs.artifacts`, in order;
    /// otherwise nothing is written.
    pub fn assemble(&self, inputs: &DistributionInputs<'_>) -> Result<Distribution> {
        validate_program_name(inputs.program_name)?;
        ensure_classpath_matches(inputs.manifest, inputs.artifacts)?;

        let bin_dir = self.root.join("bin");
        let lib_dir = self.root.join("lib");
        reset_dir(&lib_dir)?;
        reset_dir(&bin_dir)?;

        duplicate_file_names(inputs.artifacts);

        let mut libraries = Vec::with_capacity(inputs.artifacts.len());
        for artifact in inputs.artifacts {
            let destination = lib_dir.join(artifact.file_name());
            copy_file(artifact.path(), &destination)?;
            libraries.push(destination);
        }

        let launcher = bin_dir.join(inputs.program_name);
        copy_file(inputs.staged_launcher, &launcher)?;

        let manifest = bin_dir.join(MANIFEST_FILE_NAME);
        copy_file(inputs.manifest, &manifest)?;

        info!(
            root = %self.root.display(),
            program = inputs.program_name,
            libraries = libraries.len(),
            "assembled distribution"
        );

        Ok(Distribution {
            root: self.root.clone(),
            launcher,
            manifest,
            libraries,
        })
    }
}

fn ensure_classpath_matches(manifest_path: &Path, artifacts: &[RuntimeArtifact]) -> Result<()> {
    let manifest = read_manifest(manifest_path)?;
    let expected: Vec<String> = artifacts.iter().map(RuntimeArtifact::classpath_entry).collect();

    if manifest.java_configuration.classpath != expected {
        return Err(PackagingError::invalid_manifest(format!(
            "classpath in {} is [{}] but the artifacts to assemble are [{}]",
            manifest_path.display(),
            manifest.java_configuration.classpath.join(", "),
            expected.join(", ")
        )));
    }

    Ok(())
}

/// Summary of a distribution that passed `check_distribution`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionReport {
    pub launcher_name: String,
    pub entrypoint: String,
    pub java_version: u32,
    pub classpath: Vec<String>,
}

/// Verifies an existing distribution tree the way the launcher would see it.
pub fn check_distribution(root: &Path) -> Result<DistributionReport> {
    let bin_dir = root.join("bin");
    let lib_dir = root.join("lib");

    for dir in [&bin_dir, &lib_dir] {
        if !dir.is_dir() {
            return Err(PackagingError::invalid_distribution(
                root,
                format!("missing directory {}", dir.display()),
            ));
        }
    }

    let manifest_path = bin_dir.join(MANIFEST_FILE_NAME);
    let manifest = read_manifest(&manifest_path)?;
    validate_manifest(&manifest)?;

    for entry in &manifest.java_configuration.classpath {
        if !bin_dir.join(entry).is_file() {
            return Err(PackagingError::invalid_distribution(
                root,
                format!("classpath entry '{}' has no file in lib/", entry),
            ));
        }
    }

    let mut others = Vec::new();
    for entry in fs::read_dir(&bin_dir).map_err(|e| PackagingError::io(&bin_dir, e))? {
        let entry = entry.map_err(|e| PackagingError::io(&bin_dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name != MANIFEST_FILE_NAME {
            others.push(name);
        }
    }

    others.sort();
    let launcher_name = match others.as_slice() {
        [only] => only.clone(),
        [] => {
            return Err(PackagingError::invalid_distribution(
                root,
                "bin/ has no launcher next to the manifest",
            ));
        }
        _ => {
            return Err(PackagingError::invalid_distribution(
                root,
                format!(
                    "bin/ must hold only the launcher and the manifest, found: {}",
                    others.join(", ")
                ),
            ));
        }
    };

    Ok(DistributionReport {
        launcher_name,
        entrypoint: manifest.entrypoint,
        java_version: manifest.java_configuration.java_version,
        classpath: manifest.java_configuration.classpath,
    })
}
