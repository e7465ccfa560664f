pub mod clean;
pub mod format;
pub mod init;
pub mod insert;
pub mod outline;
pub mod palette;

pub use clean::{clean, CleanArgs};
pub use format::{format, FormatArgs};
pub use init::{init, InitArgs};
pub use insert::{insert, InsertArgs};
pub use outline::{outline, OutlineArgs};
pub use palette::{palette, PaletteArgs};

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Read markup from a file, or from stdin when the path is `-`
pub fn read_input(cwd: &str, input: &str) -> Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }

    let path = resolve(cwd, input);
    std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write to a file when given one, stdout otherwise
pub fn write_output(cwd: &str, output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(output) => {
            let path = resolve(cwd, output);
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

fn resolve(cwd: &str, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        Path::new(cwd).join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_and_absolute() {
        assert_eq!(resolve("/work", "mail.html"), PathBuf::from("/work/mail.html"));
        assert_eq!(resolve("/work", "/tmp/x.html"), PathBuf::from("/tmp/x.html"));
    }

    #[test]
    fn test_read_write_roundtrip() {
        let dir = std::env::temp_dir().join("mosaic_cli_io");
        std::fs::create_dir_all(&dir).unwrap();
        let cwd = dir.display().to_string();

        write_output(&cwd, Some("out.html"), "<p>x</p>").unwrap();
        assert_eq!(read_input(&cwd, "out.html").unwrap(), "<p>x</p>");
        assert!(read_input(&cwd, "missing.html").is_err());
    }
}
