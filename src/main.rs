//! PCB Preview - Gerber archive renderer
//!
//! Command-line front end for the preview pipeline: takes a ZIP of
//! fabrication files and writes the rendered faces plus the dimension
//! record to an output directory.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pcbpreview::constants::{APP_BINARY_NAME, APP_NAME};
use pcbpreview::outline::OutlinePolicy;
use pcbpreview::package;
use pcbpreview::pipeline;
use pcbpreview::render::backend::MinimalBackend;
use pcbpreview::theme::Theme;
use pcbpreview::{archive, config::Config};

/// PCB Preview - render Gerber archives to board images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the fabrication archive (ZIP)
    #[arg(value_name = "ARCHIVE")]
    archive_path: PathBuf,

    /// Output directory for the rendered files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Theme name (green, purple, red, blue, black, flex, aluminum)
    #[arg(short, long)]
    theme: Option<String>,

    /// Estimate board bounds from copper when no outline layer exists
    #[arg(long)]
    fallback_outline: bool,

    /// Write a single ZIP package instead of separate files
    #[arg(long)]
    package: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .init();

    if !cli.archive_path.exists() {
        eprintln!("Error: archive not found: {}", cli.archive_path.display());
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {APP_BINARY_NAME} gerbers.zip");
        eprintln!("  {APP_BINARY_NAME} gerbers.zip --theme purple -o renders/");
        std::process::exit(1);
    }

    let config = Config::load().unwrap_or_default();
    let theme_name = cli.theme.as_deref().unwrap_or(&config.render.default_theme);
    let theme = Theme::resolve(Some(theme_name));
    let policy = if cli.fallback_outline || config.render.fallback_outline {
        OutlinePolicy::CopperFallback
    } else {
        OutlinePolicy::Require
    };

    let blob = fs::read(&cli.archive_path)
        .with_context(|| format!("Failed to read {}", cli.archive_path.display()))?;
    let filename = cli
        .archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let files = archive::extract(&blob, &filename)?;
    let output = pipeline::process(files, &theme, policy, &MinimalBackend)?;

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;

    if cli.package {
        let blob = package::assemble(
            &output.top_image,
            &output.bottom_image,
            &output.dimensions,
        )?;
        let path = cli.output.join("pcb_preview.zip");
        fs::write(&path, blob).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    } else {
        for (name, bytes) in [
            (package::TOP_IMAGE_NAME, output.top_image.as_slice()),
            (package::BOTTOM_IMAGE_NAME, output.bottom_image.as_slice()),
        ] {
            let path = cli.output.join(name);
            fs::write(&path, bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        let dims_path = cli.output.join(package::DIMENSIONS_NAME);
        fs::write(&dims_path, serde_json::to_string_pretty(&output.dimensions)?)
            .with_context(|| format!("Failed to write {}", dims_path.display()))?;
        println!("Wrote {}", dims_path.display());
    }

    println!(
        "{}: board {:.2} x {:.2} mm ({:.2} cm²)",
        APP_NAME,
        output.dimensions.width_mm,
        output.dimensions.height_mm,
        output.dimensions.area_cm2
    );

    Ok(())
}
