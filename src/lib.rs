pub mod error;
pub mod config;
pub mod fsops;
pub mod artifact;
pub mod manifest;
pub mod launcher;
pub mod distribution;
pub mod packaging;
pub mod cli;

pub use artifact::RuntimeArtifact;
pub use config::ApplicationConfig;
pub use distribution::{Distribution, DistributionAssembler, check_distribution};
pub use error::{PackagingError, Result};
pub use launcher::LauncherLocator;
pub use manifest::{LaunchManifest, ManifestGenerator};
pub use packaging::{PackagingRequest, package};
