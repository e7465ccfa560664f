use super::read_input;
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use mosaic_editor::{Document, MirrorTree};

#[derive(Debug, Args)]
pub struct OutlineArgs {
    /// Markup file to outline (`-` for stdin)
    pub input: String,

    /// Print the mirror tree as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn outline(args: OutlineArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let markup = read_input(cwd, &args.input)?;

    let doc = Document::from_markup(&markup);
    let tree = MirrorTree::build(&doc, &config.editor);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    for (depth, node) in tree.walk() {
        println!(
            "{}{}  {}",
            "  ".repeat(depth),
            node.label(config.editor.outline_preview_length),
            node.path.dimmed()
        );
    }
    Ok(())
}
