use super::{read_input, write_output};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use mosaic_editor::canonicalize_markup;
use mosaic_parser::highlight::to_html;
use mosaic_parser::prettify_with_indent;

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Markup file to format (`-` for stdin)
    pub input: String,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Spaces per indent level (overrides config)
    #[arg(long)]
    pub indent: Option<usize>,

    /// Emit the highlighted code view as HTML
    #[arg(long)]
    pub html: bool,
}

pub fn format(args: FormatArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let indent = args
        .indent
        .map(|n| " ".repeat(n))
        .unwrap_or_else(|| config.indent_str());

    let markup = read_input(cwd, &args.input)?;
    let pretty = prettify_with_indent(&canonicalize_markup(&markup), &indent);

    let rendered = if args.html { to_html(&pretty) } else { pretty };
    write_output(cwd, args.output.as_deref(), &rendered)
}
