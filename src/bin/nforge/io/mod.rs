use std::fs::File;
use std::io::{self, BufReader, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// `-` and no path both mean stdin.
fn is_stdin(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p.as_os_str() == "-")
}

/// Reads the NEF input once.
///
/// Returns `None` when the entry would come from an interactive stdin, in
/// which case the caller starts a fresh entry.
pub fn read_entry_text(path: Option<&Path>) -> Result<Option<String>> {
    if is_stdin(path) {
        if stdin_is_tty() {
            return Ok(None);
        }
        let mut text = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut text)
            .context("Failed to read NEF entry from stdin")?;
        return Ok(Some(text));
    }

    let path = path.unwrap_or(Path::new("-"));
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read NEF entry: {}", path.display()))?;
    Ok(Some(text))
}

pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Writes the finished output in one go, so a failed run leaves no file.
pub fn write_output(path: Option<&Path>, content: &[u8]) -> Result<()> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output file: {}", p.display()))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content)?;
            stdout.flush().context("Failed to write to stdout")
        }
    }
}

/// File name without directories or extension, used to name frames.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imported".to_string())
}
