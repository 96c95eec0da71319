//! txt2png CLI - Command-line interface
//!
//! Mounts the read-only PNG overlay and offers one-shot helpers for
//! rendering and classifying individual files.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use txt2png::config::parse_size;

use commands::config::ConfigCommands;

#[derive(Parser)]
#[command(name = "txt2png")]
#[command(version = txt2png::VERSION)]
#[command(about = "Present text and ANSI art files as PNG images through a read-only FUSE overlay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the overlay of SOURCE at MOUNTPOINT (blocks until unmounted or Ctrl+C)
    Mount {
        /// Backing directory whose contents are exposed
        source: String,

        /// Empty directory to mount the overlay on
        mountpoint: String,

        /// Size reported for virtual .png entries (e.g. 100000, 128KB, 1MB)
        #[arg(long, value_parser = parse_size)]
        placeholder_size: Option<u64>,

        /// Enable debug logging (also echoed to stdout)
        #[arg(long)]
        debug: bool,
    },

    /// Render a single file to PNG
    Render {
        /// Text or ANSI file to render
        input: PathBuf,

        /// Output path (default: the virtual .png name next to the input)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print each file's content category and whether it gets a .png twin
    Classify {
        /// Files to classify
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Mount {
            source,
            mountpoint,
            placeholder_size,
            debug,
        } => commands::mount::run(commands::mount::MountArgs {
            source,
            mountpoint,
            placeholder_size,
            debug,
        }),
        Commands::Render { input, output } => commands::render::run(&input, output.as_deref()),
        Commands::Classify { paths } => commands::classify::run(&paths),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
