use super::{read_input, write_output};
use anyhow::Result;
use clap::Args;
use mosaic_editor::canonicalize_markup;

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Markup file to clean (`-` for stdin)
    pub input: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Strip editor markers (selection/drop classes, contenteditable, draggable)
pub fn clean(args: CleanArgs, cwd: &str) -> Result<()> {
    let markup = read_input(cwd, &args.input)?;
    let cleaned = canonicalize_markup(&markup);
    write_output(cwd, args.output.as_deref(), &cleaned)
}
