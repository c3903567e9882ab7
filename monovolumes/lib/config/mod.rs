//! Configuration types and defaults for the iSCSI initiator and the volume provider.

mod defaults;
mod volumes;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use volumes::*;
