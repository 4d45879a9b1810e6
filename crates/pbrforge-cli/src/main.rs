//! PBRForge CLI - procedural PBR terrain material generation
//!
//! This binary generates material texture sets, lists the built-in
//! materials and imports generated sets into engine naming conventions.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use pbrforge_cli::commands;
use pbrforge_cli::commands::generate::GenerateArgs;
use pbrforge_cli::commands::import::ImportOptions;
use pbrforge_cli::logger;
use pbrforge_texture::{NormalConvention, Quality};

/// PBRForge - Procedural PBR Material Synthesis
#[derive(Parser)]
#[command(name = "pbrforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v for debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate texture sets for one or more materials
    Generate {
        /// Material to generate (repeatable; default: every material)
        #[arg(short, long = "material")]
        materials: Vec<String>,

        /// Output root directory
        #[arg(short, long, default_value = "./pbr-output")]
        out_root: PathBuf,

        /// JSON file with generation settings; flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Square output resolution (power of two)
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Square resolution shaping runs at (power of two)
        #[arg(long)]
        working_resolution: Option<u32>,

        /// Quality tier (low, medium, high)
        #[arg(short, long)]
        quality: Option<Quality>,

        /// Normal map convention (default, mirrored)
        #[arg(long)]
        convention: Option<NormalConvention>,

        /// Base seed
        #[arg(short, long)]
        seed: Option<u32>,

        /// Skip the packed ORM image
        #[arg(long)]
        no_orm: bool,

        /// Resolve materials and settings without generating
        #[arg(long)]
        dry_run: bool,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in materials
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a generated set into engine material-slot naming
    Import {
        /// Directory of one generated material set
        #[arg(long)]
        src: PathBuf,

        /// Destination directory
        #[arg(long)]
        dest: PathBuf,

        /// Material slot name used for the output files
        #[arg(long)]
        name: String,

        /// Resample to this square resolution
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Target normal convention (flips green only if it differs from the source)
        #[arg(long)]
        convention: Option<NormalConvention>,

        /// Report what would be written without writing
        #[arg(long)]
        dry_run: bool,

        /// Print the import summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.verbose) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }

    let result = match cli.command {
        Commands::Generate {
            materials,
            out_root,
            config,
            resolution,
            working_resolution,
            quality,
            convention,
            seed,
            no_orm,
            dry_run,
            json,
        } => commands::generate::run(&GenerateArgs {
            materials,
            out_root,
            config,
            resolution,
            working_resolution,
            quality,
            convention,
            seed,
            no_orm,
            dry_run,
            json,
        }),
        Commands::List { json } => commands::list::run(json),
        Commands::Import {
            src,
            dest,
            name,
            resolution,
            convention,
            dry_run,
            json,
        } => commands::import::run(
            &ImportOptions {
                src,
                dest,
                name,
                resolution,
                convention,
                dry_run,
            },
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(1)
        }
    }
}
