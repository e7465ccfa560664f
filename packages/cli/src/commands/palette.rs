use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mosaic_editor::palette::PALETTE;

#[derive(Debug, Args)]
pub struct PaletteArgs {
    /// Print the palette as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn palette(args: PaletteArgs, _cwd: &str) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(PALETTE)?);
        return Ok(());
    }

    println!("{}", "Elements".bright_blue().bold());
    for entry in PALETTE {
        println!(
            "  {} {:<10} {}",
            entry.icon,
            entry.label.bold(),
            entry.kind.dimmed()
        );
    }
    Ok(())
}
