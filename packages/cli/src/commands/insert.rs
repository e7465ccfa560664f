use super::{read_input, write_output};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use mosaic_editor::palette;
use mosaic_editor::{canonicalize, place, Document, DragSource, DropMode, MirrorTree, TransientState};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Mode {
    Before,
    After,
    Inside,
}

impl From<Mode> for DropMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Before => DropMode::Before,
            Mode::After => DropMode::After,
            Mode::Inside => DropMode::Inside,
        }
    }
}

#[derive(Debug, Args)]
pub struct InsertArgs {
    /// Markup file to edit (`-` for stdin)
    pub input: String,

    /// Palette element (kind or label, e.g. `hr` or `Divider`)
    #[arg(short, long, conflicts_with = "markup")]
    pub element: Option<String>,

    /// Template markup to insert instead of a palette element
    #[arg(short, long)]
    pub markup: Option<String>,

    /// Outline path of the target (defaults to the root, `0`)
    #[arg(short, long, default_value = "0")]
    pub path: String,

    /// Placement relative to the target
    #[arg(long, value_enum, default_value = "inside")]
    pub mode: Mode,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

pub fn insert(args: InsertArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let template = match (&args.element, &args.markup) {
        (Some(name), _) => palette::find(name)
            .map(|entry| entry.markup.to_string())
            .ok_or_else(|| anyhow!("Unknown palette element: {}", name))?,
        (None, Some(markup)) => markup.clone(),
        (None, None) => return Err(anyhow!("Pass --element or --markup")),
    };

    let mut doc = Document::from_markup(&read_input(cwd, &args.input)?);
    let tree = MirrorTree::build(&doc, &config.editor);
    let target = tree
        .resolve_path(&args.path)
        .ok_or_else(|| anyhow!("No element at path {}", args.path))?;

    let mut transient = TransientState::new();
    let placed = place(
        &mut doc,
        &mut transient,
        &config.editor,
        &DragSource::Template(template),
        target,
        args.mode.into(),
    )?;

    if let Some(node) = placed {
        let tree = MirrorTree::build(&doc, &config.editor);
        if let (Some(path), Some(label)) = (tree.path_of(node), tree.label(node)) {
            eprintln!("{} Inserted {} at {}", "✓".green(), label, path);
        }
    }

    write_output(cwd, args.output.as_deref(), &canonicalize(&doc))
}
