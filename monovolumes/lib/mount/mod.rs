//! Mount option handling.
//!
//! Volumes carry their mount options as an ordered list of fstab-style strings. This module
//! turns that list into the `(flags, data)` pair expected by `mount(2)` and provides the
//! configuration steps used to build the list when a volume is constructed.

mod options;
mod opts;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use options::*;
pub use opts::*;
