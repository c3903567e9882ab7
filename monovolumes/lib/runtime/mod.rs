//! Integration points with the host container runtime.
//!
//! The host runtime is configured through hooks it applies while unpacking images, creating
//! containers and tasks, and deleting processes. The adapters here feed volumes, the volume
//! provider and iSCSI targets into those hooks.

mod adapters;
mod hooks;
mod types;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use adapters::*;
pub use hooks::*;
pub use types::*;
