//! NMRView `.xpk` peak lists.
//!
//! The file opens with a line of header keys, one TCL list per key, a column
//! header and then one row per peak. Only reading is supported.

mod reader;

pub use reader::read;
