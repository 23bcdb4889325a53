//! XPLOR-NIH reports.
//!
//! Only the NOE violation tables are understood: each
//! `restraints in potential term:` block lists numbered restraints, their
//! `-- OR --` alternatives and the atom pairs behind them.

mod violations;

pub use violations::read as read_violations;
