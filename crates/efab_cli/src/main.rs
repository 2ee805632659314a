//! efab CLI
//!
//! Check widget descriptions and simulate them headlessly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use efab_animation::DriverClock;
use efab_core::{HeadlessHost, Orientation};
use efab_widgets::ExpandableFabLayout;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use config::{WidgetDescription, DESCRIPTION_FILE};
use simulate::SimulationOptions;

#[derive(Parser)]
#[command(name = "efab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Expandable FAB widget tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample widget description
    Init {
        /// Output path
        #[arg(default_value = DESCRIPTION_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a widget description
    Check {
        /// Description file
        #[arg(default_value = DESCRIPTION_FILE)]
        path: PathBuf,
    },

    /// Open and close a described widget on a headless host
    Simulate {
        /// Description file
        #[arg(default_value = DESCRIPTION_FILE)]
        path: PathBuf,

        /// Device orientation
        #[arg(short, long, value_enum, default_value = "portrait")]
        orientation: OrientationArg,

        /// Frame interval in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: f32,

        /// Close by clicking this option instead of the main button
        #[arg(long)]
        option: Option<usize>,

        /// Number of open/close cycles
        #[arg(short, long, default_value = "1")]
        cycles: u32,

        /// Rotate the icon on a background timer thread instead of the frame clock
        #[arg(long)]
        background: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Init { path, force } => cmd_init(&path, force),

        Commands::Check { path } => cmd_check(&path),

        Commands::Simulate {
            path,
            orientation,
            frame_ms,
            option,
            cycles,
            background,
        } => {
            let options = SimulationOptions {
                orientation: orientation.into(),
                frame_ms,
                clock: if background {
                    DriverClock::Background
                } else {
                    DriverClock::Frame
                },
                close_with_option: option,
                cycles,
            };
            cmd_simulate(&path, &options)
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let content = WidgetDescription::sample().to_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote sample widget description to {}", path.display());
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let description = WidgetDescription::load(path)?;

    // Building on a throwaway host runs every component's validation
    let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
    description.build(&mut layout)?;

    for orientation in [Orientation::Portrait, Orientation::Landscape] {
        let configuration = layout.configuration(orientation);
        if configuration.is_empty() {
            continue;
        }
        info!(
            "{}: overlay {}, main button {}, {} option(s)",
            orientation,
            if configuration.overlay().is_some() { "yes" } else { "no" },
            if configuration.expandable_fab().is_some() { "yes" } else { "no" },
            description.option_count(orientation)
        );
        if configuration.expandable_fab().is_none() {
            warn!(
                "{} has no main button; the other orientation is used instead",
                orientation
            );
        }
    }

    info!("{} is valid", path.display());
    Ok(())
}

fn cmd_simulate(path: &Path, options: &SimulationOptions) -> Result<()> {
    let description = WidgetDescription::load(path)?;
    info!(
        "Simulating {} ({}, {} ms frames, {:?} clock)",
        path.display(),
        options.orientation,
        options.frame_ms,
        options.clock
    );

    let reports = simulate::run(&description, options)?;
    for (index, report) in reports.iter().enumerate() {
        info!(
            "Cycle {}: opened in {:.0} ms, closed in {:.0} ms ({:?})",
            index + 1,
            report.opening_ms,
            report.closing_ms,
            report.phases
        );
    }
    Ok(())
}
