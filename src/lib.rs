//! Conversion of NMR data between the NMR Exchange Format (NEF) and the
//! native files of NMR programs.
//!
//! The crate is layered:
//!
//! - [`star`]: the STAR document model behind NEF (entries, saveframes,
//!   loops) with a parser and a writer.
//! - [`model`]: plain values for residues, atoms, shifts, peaks,
//!   restraints and restraint violations.
//! - [`nef`]: NEF semantics: atom-name collapsing, residue lookup, chain
//!   codes, and building or reading the frame kinds of an entry.
//! - [`io`]: readers and writers for NMRView, Sparky, XPLOR-NIH, NMRPipe,
//!   PALES and TALOS files.
//!
//! # Quick Start
//!
//! Read a Sparky peak list and add it to a fresh entry as a spectrum:
//!
//! ```
//! use std::io::Cursor;
//!
//! use nef_forge::io::sparky;
//! use nef_forge::nef::config::SpectrumConfig;
//! use nef_forge::nef::lookup::SequenceLookup;
//! use nef_forge::nef::meta::new_entry;
//! use nef_forge::nef::peaks::peaks_to_frame;
//!
//! let text = "\
//!  Assignment         w1         w2
//!
//!      G16H-N      8.123    110.456
//!      K17H-N      7.950    121.300
//! ";
//! let list = sparky::read(Cursor::new(text), "A", &SequenceLookup::new())?;
//! assert_eq!(list.peaks.len(), 2);
//!
//! let frame = peaks_to_frame(
//!     "hsqc",
//!     &list.peaks,
//!     &list.dimensions,
//!     600.0,
//!     &SpectrumConfig::default(),
//! )?;
//! let mut entry = new_entry("demo", "example", "1.0");
//! entry.add_frame(frame);
//!
//! let nef = entry.to_string();
//! assert!(nef.contains("save_nef_nmr_spectrum_hsqc"));
//!
//! let reread = nef_forge::star::parse(&nef)?;
//! assert_eq!(
//!     reread.frame_names(),
//!     vec!["nef_nmr_meta_data", "nef_nmr_spectrum_hsqc"]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod io;
pub mod model;
pub mod nef;
pub mod star;

pub use model::peak::{DimensionInfo, NewPeak};
pub use model::residue::{AtomLabel, Residue, SequenceCode, SequenceResidue};
pub use model::restraint::{
    DihedralRestraint, DistanceRestraint, RdcRestraint, RestraintValues, RestraintViolation,
};
pub use model::shift::ShiftData;
pub use model::types::{Isotope, StandardResidue};
pub use star::{Entry, Loop, Saveframe};
