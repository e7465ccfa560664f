mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    clean, format, init, insert, outline, palette, CleanArgs, FormatArgs, InitArgs, InsertArgs,
    OutlineArgs, PaletteArgs,
};
use tracing_subscriber::EnvFilter;

/// Mosaic CLI - tools for email-style markup documents
#[derive(Parser, Debug)]
#[command(name = "mosaic")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default mosaic.config.json
    Init(InitArgs),

    /// Clean and pretty-print markup
    Format(FormatArgs),

    /// Print the element outline of a document
    Outline(OutlineArgs),

    /// Strip editor markers from markup
    Clean(CleanArgs),

    /// Insert a palette element or template
    Insert(InsertArgs),

    /// List the built-in element palette
    Palette(PaletteArgs),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Init(args) => init(args, &cwd),
                Command::Format(args) => format(args, &cwd),
                Command::Outline(args) => outline(args, &cwd),
                Command::Clean(args) => clean(args, &cwd),
                Command::Insert(args) => insert(args, &cwd),
                Command::Palette(args) => palette(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
