//! STAR tagged-tabular documents as used by NEF.
//!
//! [`Entry`], [`Saveframe`] and [`Loop`] are plain builders; [`parse`]
//! reads NEF text and the `Display` impls (or [`write_entry`]) write it.

mod dom;
mod error;
mod parse;
mod write;

pub use dom::{Entry, Loop, Record, SF_CATEGORY, SF_FRAMECODE, Saveframe};
pub use error::Error;
pub use parse::parse;
pub use write::{format_value, write_entry};
