//! ductkit CLI - reference hotend mount generator
//!
//! Builds the mount assembly and writes it as binary STL, dumps its
//! construction graph as JSON, or prints a bounds report.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ductkit::export::stl::export_stl;
use ductkit::{document, Config, Geometry, Shape};
use tracing::info;

mod assembly;

use assembly::{Options, Print};

#[derive(Parser)]
#[command(name = "ductkit")]
#[command(about = "Parametric hotend mount generator", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Record operation ancestry and emit debug overlays
    #[arg(long, global = true)]
    debug: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the selected parts as binary STL
    Render {
        /// Which parts to emit
        #[arg(value_enum, default_value_t = Print::Preview)]
        print: Print,
        /// Output STL file
        #[arg(short, long, default_value = "mount.stl")]
        output: PathBuf,
        /// Leave out the bought-in parts
        #[arg(long)]
        no_vitamins: bool,
        /// Leave out the blowers
        #[arg(long)]
        no_blowers: bool,
    },
    /// Write the construction graph as JSON
    Graph {
        /// Which parts to record
        #[arg(value_enum, default_value_t = Print::All)]
        print: Print,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print bounds and mesh statistics
    Bounds {
        /// Which parts to measure
        #[arg(value_enum, default_value_t = Print::All)]
        print: Print,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };
    config.debug |= cli.debug;

    match cli.command {
        Commands::Render {
            print,
            output,
            no_vitamins,
            no_blowers,
        } => {
            let options = Options {
                print,
                show_vitamins: !no_vitamins,
                has_blowers: !no_blowers,
            };
            render(&config, &options, &output)?;
        }
        Commands::Graph { print, output } => {
            graph(&config, print, output.as_deref())?;
        }
        Commands::Bounds { print } => {
            report(&config, print)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .init();
}

fn render(config: &Config, options: &Options, output: &Path) -> Result<()> {
    let mut shapes = assembly::build(config, options)?;
    if config.debug {
        let overlays = debug_overlays(&shapes);
        info!(count = overlays.len(), "appending debug overlays");
        shapes.extend(overlays);
    }
    export_stl(&shapes, output)?;
    println!("Exported STL to {}", output.display());
    Ok(())
}

/// Recolored flagged ancestors of every result node.
fn debug_overlays(shapes: &[Shape]) -> Vec<Shape> {
    shapes
        .iter()
        .filter_map(Shape::as_geometry)
        .flat_map(Geometry::debug_overlays)
        .map(Shape::from)
        .collect()
}

fn graph(config: &Config, print: Print, output: Option<&Path>) -> Result<()> {
    let options = Options {
        print,
        ..Options::default()
    };
    let shapes = assembly::build(config, &options)?;
    let roots: Vec<Geometry> = shapes
        .iter()
        .filter_map(Shape::as_geometry)
        .cloned()
        .collect();
    let json = document(&roots).to_json()?;
    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote graph to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn report(config: &Config, print: Print) -> Result<()> {
    let options = Options {
        print,
        ..Options::default()
    };
    let shapes = assembly::build(config, &options)?;

    println!("ductkit parts ({print:?})");
    for shape in &shapes {
        let name = shape
            .as_geometry()
            .map(Geometry::name)
            .filter(|n| !n.is_empty())
            .unwrap_or("unnamed");
        let solids = shape.solids()?;
        let triangles: usize = solids.iter().map(|s| s.num_triangles()).sum();
        let volume: f64 = solids.iter().map(|s| s.volume()).sum();
        match shape.bounds()? {
            Some(b) => println!(
                "  {name}: {:.2} x {:.2} x {:.2} mm, center ({:.2}, {:.2}, {:.2}), {triangles} triangles, {volume:.1} mm^3",
                b.width(),
                b.height(),
                b.depth(),
                b.center().x,
                b.center().y,
                b.center().z,
            ),
            None => println!("  {name}: empty"),
        }
    }
    Ok(())
}
