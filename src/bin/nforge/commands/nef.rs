use anyhow::{Context, Result};

use crate::cli::IoOptions;
use crate::display::{Context as DisplayContext, print_frame_table, write_frame_list};
use crate::io::write_output;

pub fn run_frames(io: IoOptions, ctx: DisplayContext) -> Result<()> {
    let entry = super::require_entry(io.input.as_deref())?;

    let mut buffer = Vec::new();
    write_frame_list(&mut buffer, &entry).context("Failed to list frames")?;
    write_output(io.output.as_deref(), &buffer)?;

    if ctx.interactive && io.output.is_some() {
        print_frame_table(&entry);
    }
    Ok(())
}
