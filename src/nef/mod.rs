//! NEF semantics on top of the STAR document model.
//!
//! This module turns domain records into NEF saveframes and back:
//!
//! - [`collapse`] folds degenerate atom names into `%` wildcards.
//! - [`lookup`] resolves residue and atom references against a sequence.
//! - [`chains`] hands out chain codes for chain-less input.
//! - [`sequence`], [`shifts`], [`peaks`] and [`restraints`] build and read
//!   the frame kinds of an entry; [`meta`] writes the header and selects
//!   frames.
//!
//! Conversion defaults live in [`config`].

pub mod chains;
pub mod collapse;
pub mod config;
mod error;
pub mod lookup;
pub mod meta;
pub mod peaks;
pub mod restraints;
pub mod sequence;
pub mod shifts;
mod values;

pub use error::Error;
