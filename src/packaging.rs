use std::ffi::OsString;
use std::path::PathBuf;

use tracing::info;

use crate::artifact::RuntimeArtifact;
use crate::config::{ApplicationConfig, BuildLayout, validate_program_name};
use crate::distribution::{Distribution, DistributionAssembler, DistributionInputs};
use crate::error::Result;
use crate::launcher::LauncherLocator;
use crate::manifest::ManifestGenerator;

/// One packaging run: what to package and where the output goes.
#[derive(Debug, Clone)]
pub struct PackagingRequest {
    pub program_name: String,
    pub config: ApplicationConfig,
    pub program_artifact: RuntimeArtifact,
    pub dependencies: Vec<RuntimeArtifact>,
    pub build_dir: PathBuf,
    pub dist_dir: PathBuf,
    /// Overrides the `PATH` used to find the launcher.
    pub search_path: Option<OsString>,
}

impl PackagingRequest {
    /// The program artifact followed by its dependencies, in classpath order.
    pub fn classpath(&self) -> Vec<RuntimeArtifact> {
        std::iter::once(self.program_artifact.clone())
            .chain(self.dependencies.iter().cloned())
            .collect()
    }

    pub fn layout(&self) -> BuildLayout {
        BuildLayout::new(&self.build_dir)
    }

    pub fn locator(&self) -> LauncherLocator {
        let locator = LauncherLocator::new(self.layout());
        match &self.search_path {
            Some(search_path) => locator.search_path(search_path.clone()),
            None => locator,
        }
    }
}

/// Generates the manifest, stages the launcher and assembles the distribution.
pub fn package(request: &PackagingRequest) -> Result<Distribution> {
    validate_program_name(&request.program_name)?;

    info!(
        program = %request.program_name,
        entrypoint = request.config.main_class(),
        dependencies = request.dependencies.len(),
        "packaging application"
    );

    let classpath = request.classpath();

    let generator = ManifestGenerator::new(request.layout());
    let manifest = generator.generate_manifest(&request.config, &classpath);
    let manifest_path = generator.write_manifest(&manifest)?;

    let staged_launcher = request.locator().stage()?;

    DistributionAssembler::new(&request.dist_dir).assemble(&DistributionInputs {
        program_name: &request.program_name,
        staged_launcher: &staged_launcher,
        manifest: &manifest_path,
        artifacts: &classpath,
    })
}
