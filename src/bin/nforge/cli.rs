use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "nforge",
    about = "Convert NMR peak lists, shifts and restraints to and from NEF",
    version,
    author,
    propagate_version = true
)]
pub struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Conversion defaults (TOML file)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// NMRView peak lists (.xpk)
    Nmrview {
        #[command(subcommand)]
        action: NmrviewAction,
    },

    /// Sparky peak lists
    Sparky {
        #[command(subcommand)]
        action: SparkyAction,
    },

    /// XPLOR-NIH violation reports
    Xplor {
        #[command(subcommand)]
        action: XplorAction,
    },

    /// PALES residual dipolar coupling tables
    Pales {
        #[command(subcommand)]
        action: PalesAction,
    },

    /// TALOS torsion angle predictions
    Talos {
        #[command(subcommand)]
        action: TalosAction,
    },

    /// Inspect NEF entries
    Nef {
        #[command(subcommand)]
        action: NefAction,
    },
}

#[derive(Subcommand)]
pub enum NmrviewAction {
    /// Add NMRView peak lists to an entry as spectra
    ImportPeaks(ImportArgs),
}

#[derive(Subcommand)]
pub enum SparkyAction {
    /// Add Sparky peak lists to an entry as spectra
    ImportPeaks(ImportArgs),
    /// Write a spectrum of an entry as a Sparky peak list
    ExportPeaks(ExportArgs),
}

#[derive(Subcommand)]
pub enum XplorAction {
    /// Add XPLOR-NIH NOE violations to an entry
    ImportViolations(ViolationArgs),
}

#[derive(Subcommand)]
pub enum PalesAction {
    /// Add PALES RDC tables to an entry as restraint lists
    ImportRdcs(ImportArgs),
}

#[derive(Subcommand)]
pub enum TalosAction {
    /// Add TALOS predictions to an entry as dihedral restraint lists
    ImportDihedrals(ImportArgs),
}

#[derive(Subcommand)]
pub enum NefAction {
    /// List the frames of an entry
    Frames(IoOptions),
}

/// Where the NEF entry comes from and goes to.
#[derive(Args)]
pub struct IoOptions {
    /// NEF entry to extend ('-' or omitted reads stdin)
    #[arg(long = "in", value_name = "NEF")]
    pub input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Native files to import
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub io: IoOptions,

    /// Chain code for residues without one
    #[arg(long, value_name = "CHAIN")]
    pub chain: Option<String>,

    /// Frame name suffix (defaults to the file name)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct ViolationArgs {
    #[command(flatten)]
    pub import: ImportArgs,

    /// Structure model the report belongs to
    #[arg(long, value_name = "N", default_value = "1")]
    pub model: usize,

    /// Keep one row per atom pair instead of collapsing alternatives
    #[arg(long)]
    pub no_collapse: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub io: IoOptions,

    /// Spectrum to export: frame name, suffix or substring
    #[arg(long, value_name = "SELECTOR")]
    pub frame: Option<String>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
