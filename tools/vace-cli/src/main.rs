//! VACE CLI: frame-sequence editing from the command line.
//!
//! Usage:
//!   vace mask-range <MASKS>              Paint mask frames white or black
//!   vace clip-doctor <IMAGES> <MASKS>    Grey out image frames and paint masks
//!   vace keyframe-insert <IMAGES>        Replace frames with keyframes
//!   vace splice <IMAGES1> <IMAGES2>      Overlay one sequence onto another
//!   vace nodes                           Print the node registry
//!   vace config [--init]                 Show or write the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vace_common::AppConfig;

mod commands;
mod frames_io;

#[derive(Parser)]
#[command(
    name = "vace",
    about = "Frame-range editing for VACE video inpainting",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set mask frames to solid white or black
    MaskRange {
        /// Mask sequence (directory or single image)
        masks: PathBuf,

        /// Frames to paint white, e.g. "3,5,10-15"
        #[arg(long, default_value = "")]
        white: String,

        /// Frames to paint black, e.g. "25,30-40"
        #[arg(long, default_value = "")]
        black: String,

        /// Output directory (defaults to the configured output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Grey out image frames and paint mask frames
    ClipDoctor {
        /// Image sequence
        images: PathBuf,

        /// Mask sequence
        masks: PathBuf,

        /// Image frames to set to neutral grey
        #[arg(long, default_value = "")]
        grey: String,

        /// Mask frames to paint white
        #[arg(long, default_value = "")]
        white: String,

        /// Mask frames to paint black
        #[arg(long, default_value = "")]
        black: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace frames with keyframe images
    KeyframeInsert {
        /// Image sequence
        images: PathBuf,

        /// Frames to replace, e.g. "0,12,24"
        #[arg(short, long, default_value = "0")]
        positions: String,

        /// Keyframe image; repeat once per position (at most 5)
        #[arg(short, long = "keyframe", required = true)]
        keyframes: Vec<PathBuf>,

        /// Existing mask sequence (a white mask is used when omitted)
        #[arg(long)]
        masks: Option<PathBuf>,

        /// Mask value at replaced frames [0.0, 1.0]
        #[arg(long)]
        mask_value: Option<f32>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Overlay a second sequence onto the first at a frame offset
    Splice {
        /// Primary image sequence
        primary: PathBuf,

        /// Overlay image sequence
        overlay: PathBuf,

        /// First output frame covered by the overlay
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        offset: i64,

        /// Mask for the primary sequence
        #[arg(long)]
        mask1: Option<PathBuf>,

        /// Mask for the overlay sequence
        #[arg(long)]
        mask2: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the node registry
    Nodes {
        /// Print only node ids and display names
        #[arg(long)]
        names: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    vace_common::logging::init_logging(&logging);

    let out = |output: Option<PathBuf>| output.unwrap_or_else(|| config.output_dir.clone());

    match cli.command {
        Commands::MaskRange {
            masks,
            white,
            black,
            output,
        } => commands::mask_range::run(masks, white, black, out(output)),
        Commands::ClipDoctor {
            images,
            masks,
            grey,
            white,
            black,
            output,
        } => commands::clip_doctor::run(
            images,
            masks,
            grey,
            white,
            black,
            &config.editing,
            out(output),
        ),
        Commands::KeyframeInsert {
            images,
            positions,
            keyframes,
            masks,
            mask_value,
            output,
        } => commands::keyframe::run(
            images,
            positions,
            keyframes,
            masks,
            mask_value.unwrap_or(config.editing.keyframe_mask_value),
            out(output),
        ),
        Commands::Splice {
            primary,
            overlay,
            offset,
            mask1,
            mask2,
            output,
        } => commands::splice::run(
            primary,
            overlay,
            offset,
            mask1,
            mask2,
            &config.editing,
            out(output),
        ),
        Commands::Nodes { names } => commands::nodes::run(names),
        Commands::Config { init } => commands::config::run(&config, init),
    }
}
