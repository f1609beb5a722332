use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::artifact::{RuntimeArtifact, resolve_classpath};
use crate::config::{ApplicationConfig, BuildLayout, JAVA_VERSION, LAUNCHER_NAME};
use crate::distribution::check_distribution;
use crate::launcher::LauncherLocator;
use crate::manifest::ManifestGenerator;
use crate::packaging::{PackagingRequest, package};

#[derive(Parser)]
#[command(name = "distpack")]
#[command(about = "Packages a JVM application into a launcher-driven distribution")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the manifest, stage the launcher and assemble the distribution
    Package {
        /// Program name; the launcher is renamed to it
        #[arg(long)]
        name: String,

        /// Fully qualified name of the main class
        #[arg(long)]
        main_class: String,

        /// The program's own jar
        #[arg(long)]
        jar: PathBuf,

        /// Runtime dependencies as a path list, in classpath order (repeatable)
        #[arg(long)]
        classpath: Vec<OsString>,

        /// Build directory holding intermediate outputs
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,

        /// Distribution root (defaults to <build-dir>/install/<name>)
        #[arg(long)]
        dist_dir: Option<PathBuf>,
    },

    /// Generate the launcher manifest only
    Manifest {
        /// Fully qualified name of the main class
        #[arg(long)]
        main_class: String,

        /// The program's own jar
        #[arg(long)]
        jar: PathBuf,

        /// Runtime dependencies as a path list, in classpath order (repeatable)
        #[arg(long)]
        classpath: Vec<OsString>,

        /// Build directory holding intermediate outputs
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,
    },

    /// Find the launcher on the PATH and copy it into the build directory
    StageLauncher {
        /// Build directory holding intermediate outputs
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,
    },

    /// Verify an assembled distribution
    Check {
        /// Distribution root containing bin/ and lib/
        dist_dir: PathBuf,
    },

    /// Check system requirements
    Doctor,
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Package {
            name,
            main_class,
            jar,
            classpath,
            build_dir,
            dist_dir,
        } => package_command(name, main_class, jar, classpath, build_dir, dist_dir),
        Commands::Manifest {
            main_class,
            jar,
            classpath,
            build_dir,
        } => manifest_command(main_class, jar, classpath, build_dir),
        Commands::StageLauncher { build_dir } => stage_launcher_command(build_dir),
        Commands::Check { dist_dir } => check_command(dist_dir),
        Commands::Doctor => doctor_command(),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn resolve_artifacts(
    jar: &Path,
    classpath: &[OsString],
) -> Result<(RuntimeArtifact, Vec<RuntimeArtifact>)> {
    let program_artifact = RuntimeArtifact::from_path(jar)
        .with_context(|| format!("Failed to resolve program jar {}", jar.display()))?;
    let dependencies = resolve_classpath(classpath).context("Failed to resolve runtime classpath")?;

    Ok((program_artifact, dependencies))
}

fn package_command(
    name: String,
    main_class: String,
    jar: PathBuf,
    classpath: Vec<OsString>,
    build_dir: PathBuf,
    dist_dir: Option<PathBuf>,
) -> Result<()> {
    let config = ApplicationConfig::new(main_class)?;
    let (program_artifact, dependencies) = resolve_artifacts(&jar, &classpath)?;

    let dist_dir = dist_dir.unwrap_or_else(|| BuildLayout::new(&build_dir).default_dist_dir(&name));

    let request = PackagingRequest {
        program_name: name,
        config,
        program_artifact,
        dependencies,
        build_dir,
        dist_dir,
        search_path: None,
    };

    let distribution = package(&request).context("Failed to package application")?;

    println!("Distribution: {}", distribution.root.display());
    println!("  {}", distribution.launcher.display());
    println!("  {}", distribution.manifest.display());
    for library in &distribution.libraries {
        println!("  {}", library.display());
    }

    Ok(())
}

fn manifest_command(
    main_class: String,
    jar: PathBuf,
    classpath: Vec<OsString>,
    build_dir: PathBuf,
) -> Result<()> {
    let config = ApplicationConfig::new(main_class)?;
    let (program_artifact, dependencies) = resolve_artifacts(&jar, &classpath)?;

    let artifacts: Vec<_> = std::iter::once(program_artifact).chain(dependencies).collect();

    let generator = ManifestGenerator::new(BuildLayout::new(&build_dir));
    let manifest = generator.generate_manifest(&config, &artifacts);
    let manifest_path = generator
        .write_manifest(&manifest)
        .context("Failed to write manifest")?;

    // Output the manifest path for tooling
    println!("{}", manifest_path.display());

    Ok(())
}

fn stage_launcher_command(build_dir: PathBuf) -> Result<()> {
    let staged = LauncherLocator::new(BuildLayout::new(&build_dir))
        .stage()
        .context("Failed to stage launcher")?;

    println!("{}", staged.display());

    Ok(())
}

fn check_command(dist_dir: PathBuf) -> Result<()> {
    let report = check_distribution(&dist_dir)
        .with_context(|| format!("Distribution check failed for {}", dist_dir.display()))?;

    println!("✓ Distribution is consistent: {}", dist_dir.display());
    println!("  launcher:   bin/{}", report.launcher_name);
    println!("  entrypoint: {}", report.entrypoint);
    println!("  java:       {}", report.java_version);
    println!("  classpath:  {} entries", report.classpath.len());

    Ok(())
}

fn doctor_command() -> Result<()> {
    println!("distpack doctor - Checking system requirements...\n");

    let locator = LauncherLocator::new(BuildLayout::new("build"));
    let launcher_found = match locator.find() {
        Ok(path) => {
            println!("✓ {} found at: {}", LAUNCHER_NAME, path.display());
            true
        }
        Err(e) => {
            println!("✗ {}", e);
            false
        }
    };

    // Only the launcher is needed at packaging time; java matters when the
    // distribution runs.
    match which::which("java") {
        Ok(path) => println!("✓ java found at: {}", path.display()),
        Err(_) => println!("- java not found on PATH (optional)"),
    }

    let java_home_var = format!("JAVA_{}_HOME", JAVA_VERSION);
    match std::env::var_os(&java_home_var) {
        Some(home) => {
            let java = PathBuf::from(&home).join("bin").join("java");
            if java.is_file() {
                println!("✓ {} points to {}", java_home_var, PathBuf::from(&home).display());
            } else {
                println!(
                    "✗ {} is set but {} does not exist",
                    java_home_var,
                    java.display()
                );
            }
        }
        None => println!(
            "- {} is not set; the launcher needs it to start Java {} programs",
            java_home_var, JAVA_VERSION
        ),
    }

    if !launcher_found {
        return Err(anyhow::anyhow!(
            "{} is required but not found in PATH",
            LAUNCHER_NAME
        ));
    }

    println!("\n✓ distpack doctor check complete");

    Ok(())
}
