//! NMRPipe database ("gdb") tables.
//!
//! ```text
//! REMARK ...
//! DATA  SEQUENCE MQIFVKTLTG
//! VARS   RESID RESNAME PHI PSI
//! FORMAT %4d %s %8.3f %8.3f
//!
//!    1 M 9999.000 9999.000
//! ```
//!
//! PALES and TALOS write their results in this layout; their readers build
//! on [`GdbFile`].

mod gdb;

pub use gdb::{GdbFile, GdbRecord, read};
