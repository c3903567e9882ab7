//! iSCSI initiator support.
//!
//! Everything here drives the kernel's iSCSI initiator through the `iscsiadm` administration
//! tool. No session state is kept in process: whether a target is logged in is inferred from the
//! tool's exit status and from the presence of the target's by-path device node.
//!
//! The usual flow is:
//!
//! 1. Create an [`Initiator`] from an [`IscsiConfig`](crate::config::IscsiConfig).
//! 2. Create a [`Portal`] for the iSCSI server and discover its [`Target`]s.
//! 3. [`Target::login`] waits until the device node exists, after which the device can be
//!    wrapped in an [`IscsiVolume`](crate::volume::IscsiVolume) and mounted.
//! 4. [`Target::logout`] once every mount of the device has been torn down.

mod adm;
mod discovery;
mod initiator;
mod portal;
mod target;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use adm::*;
pub use discovery::*;
pub use initiator::*;
pub use portal::*;
pub use target::*;
