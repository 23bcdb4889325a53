//! Core data structures representing NMR observations and restraints.
//!
//! This module provides the foundational value types that flow through `nef-forge`:
//!
//! - [`types`] – Isotopes, gyromagnetic ratios and standard residue codes.
//! - [`residue`] – Residues, sequence codes, sequence linking and atom labels.
//! - [`shift`] – Single chemical-shift observations.
//! - [`peak`] – Peaks and spectral dimension metadata.
//! - [`restraint`] – Distance, dihedral and RDC restraints plus restraint violations.
//!
//! Every record here is an immutable value: transformations build new records
//! through the `with_*` methods instead of mutating in place. The only mutable
//! objects in the crate are the STAR builders in [`crate::star`].

pub mod peak;
pub mod residue;
pub mod restraint;
pub mod shift;
pub mod types;
