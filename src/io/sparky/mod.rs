//! Sparky peak lists.
//!
//! ```text
//!       Assignment         w1         w2   Data Height
//!
//!         G16H-N      8.123    110.456      123456
//! ```

mod reader;
mod writer;

pub use reader::read;
pub use writer::write;
