mod nef;
mod peaks;
mod restraints;

use std::path::Path;

use anyhow::{Context, Result, bail};

use nef_forge::nef::config::ConvertConfig;
use nef_forge::nef::lookup::{SequenceLookup, build_lookup};
use nef_forge::nef::meta::new_entry;
use nef_forge::nef::sequence::entry_sequence;
use nef_forge::star::{self, Entry, Saveframe};

use crate::cli::{
    Cli, Command, ImportArgs, NefAction, NmrviewAction, PalesAction, SparkyAction, TalosAction,
    XplorAction,
};
use crate::config::build_convert_config;
use crate::display::{Context as DisplayContext, Progress, frame_rows, print_frame_table};
use crate::io::{file_stem, read_entry_text, write_output};
use crate::util::text::count;

const PROGRAM: &str = "nforge";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_ENTRY_NAME: &str = "nef_forge";

pub fn dispatch(cli: Cli, ctx: DisplayContext) -> Result<()> {
    let config = build_convert_config(cli.config.as_deref())?;

    match cli.command {
        Command::Nmrview {
            action: NmrviewAction::ImportPeaks(args),
        } => peaks::run_import(peaks::PeakFormat::NmrView, args, &config, ctx),
        Command::Sparky { action } => match action {
            SparkyAction::ImportPeaks(args) => {
                peaks::run_import(peaks::PeakFormat::Sparky, args, &config, ctx)
            }
            SparkyAction::ExportPeaks(args) => peaks::run_export(args, ctx),
        },
        Command::Xplor {
            action: XplorAction::ImportViolations(args),
        } => restraints::run_violations(args, &config, ctx),
        Command::Pales {
            action: PalesAction::ImportRdcs(args),
        } => restraints::run_rdcs(args, &config, ctx),
        Command::Talos {
            action: TalosAction::ImportDihedrals(args),
        } => restraints::run_dihedrals(args, &config, ctx),
        Command::Nef {
            action: NefAction::Frames(io),
        } => nef::run_frames(io, ctx),
    }
}

/// The entry named by `--in`, or a fresh one when stdin is a terminal.
fn load_entry(input: Option<&Path>) -> Result<Entry> {
    match read_entry_text(input)? {
        Some(text) => star::parse(&text).context("Failed to parse NEF entry"),
        None => Ok(new_entry(DEFAULT_ENTRY_NAME, PROGRAM, VERSION)),
    }
}

/// Like [`load_entry`], for commands that have nothing to do without one.
fn require_entry(input: Option<&Path>) -> Result<Entry> {
    match read_entry_text(input)? {
        Some(text) => star::parse(&text).context("Failed to parse NEF entry"),
        None => bail!(
            "No NEF entry given and stdin is a terminal. Pass one with --in <FILE> or pipe it on stdin."
        ),
    }
}

fn write_entry(entry: &Entry, output: Option<&Path>) -> Result<()> {
    let mut buffer = Vec::new();
    star::write_entry(entry, &mut buffer).context("Failed to format NEF entry")?;
    write_output(output, &buffer)
}

/// Residue names of the entry's molecular system, for resolving bare
/// residue numbers.
fn entry_lookup(entry: &Entry) -> Result<SequenceLookup> {
    let sequence = entry_sequence(entry).context("Failed to read the molecular system")?;
    Ok(build_lookup(&sequence))
}

fn chain_code(args: &ImportArgs, config: &ConvertConfig) -> String {
    args.chain
        .clone()
        .unwrap_or_else(|| config.default_chain_code.clone())
}

/// Frame name for the `index`-th of the imported files.
fn frame_name(args: &ImportArgs, index: usize, recorded: Option<&str>) -> String {
    match &args.name {
        Some(name) if args.files.len() > 1 => format!("{name}_{}", index + 1),
        Some(name) => name.clone(),
        None => recorded
            .map(str::to_string)
            .unwrap_or_else(|| file_stem(&args.files[index])),
    }
}

/// Shared driver of the import commands: read the entry, turn each file
/// into a frame with `build`, then write the extended entry.
fn run_import<F>(args: &ImportArgs, ctx: DisplayContext, what: &str, mut build: F) -> Result<()>
where
    F: FnMut(&Path, usize, &SequenceLookup) -> Result<Saveframe>,
{
    let mut progress = Progress::new(ctx.interactive, 3);

    progress.step("Reading NEF entry");
    let mut entry = load_entry(args.io.input.as_deref())?;
    let lookup = entry_lookup(&entry)?;
    progress.complete_step(
        "Reading NEF entry",
        &[
            format!("Entry '{}' with {}", entry.name(), count(entry.len(), "frame")),
            format!("{} in the molecular system", count(lookup.len(), "residue")),
        ],
    );

    let description = format!("Importing {what}");
    progress.step(&description);
    let mut details = Vec::with_capacity(args.files.len());
    for (index, path) in args.files.iter().enumerate() {
        let frame = build(path, index, &lookup)?;
        details.push(format!(
            "{} -> {} ({})",
            path.display(),
            frame.name(),
            count(frame_rows(&frame), "row")
        ));
        entry.add_frame(frame);
    }
    progress.complete_step(&description, &details);

    progress.step("Writing NEF entry");
    write_entry(&entry, args.io.output.as_deref())?;
    progress.complete_step("Writing NEF entry", &[]);

    if ctx.interactive {
        print_frame_table(&entry);
    }
    progress.finish();
    Ok(())
}
