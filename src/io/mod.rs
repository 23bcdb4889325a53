//! Readers and writers for the native formats of NMR programs.
//!
//! Each format lives in its own module with `read` (and, where supported,
//! `write`) functions over [`BufRead`](std::io::BufRead) /
//! [`Write`](std::io::Write). Readers produce domain records; turning them
//! into NEF frames is left to [`crate::nef`].

use std::fmt;

use crate::model::peak::{DimensionInfo, NewPeak};

pub mod error;
mod util;

pub mod nmrpipe;
pub mod nmrview;
pub mod pales;
pub mod sparky;
pub mod talos;
pub mod xplor;

pub use error::Error;

/// Native formats understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    NmrView,
    Sparky,
    Xplor,
    NmrPipe,
    Pales,
    Talos,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::NmrView => write!(f, "NMRView"),
            Format::Sparky => write!(f, "Sparky"),
            Format::Xplor => write!(f, "XPLOR"),
            Format::NmrPipe => write!(f, "NMRPipe"),
            Format::Pales => write!(f, "PALES"),
            Format::Talos => write!(f, "TALOS"),
        }
    }
}

/// Peaks read from a native peak list together with their axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeakList {
    /// Spectrum name recorded in the file, if any.
    pub name: Option<String>,
    pub dimensions: Vec<DimensionInfo>,
    pub peaks: Vec<NewPeak>,
}
