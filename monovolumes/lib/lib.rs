//! `monovolumes` supplies pluggable storage volumes to a container runtime.
//!
//! # Overview
//!
//! Three kinds of volume are supported:
//! - **Bind**: a host directory bind mounted into place
//! - **CIFS**: an SMB network share
//! - **iSCSI**: a filesystem on a LUN of a remote iSCSI target
//!
//! Every volume can describe itself as an OCI runtime mount, as rootfs mounts for the host
//! runtime, or mount itself directly with `mount(2)`.
//!
//! The iSCSI side drives the kernel initiator through `iscsiadm`: targets are discovered on a
//! portal, logged in to (waiting for the by-path device node to appear) and logged out of.
//! Login and logout are idempotent.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use monovolumes::{
//!     config::IscsiConfig,
//!     iscsi::Initiator,
//!     mount::MountOpt,
//!     provider::VolumeProvider,
//!     runtime::{MountProvider, WithVolumeRootfs},
//!     volume::Volume,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let token = CancellationToken::new();
//!     let initiator = Arc::new(Initiator::new(IscsiConfig::default()));
//!
//!     // Find the target and log in to it
//!     let portal = initiator.portal("10.0.10.10", Some(3260));
//!     let target = portal.target("iqn.2019.com.example:redis", &token).await?;
//!     let volume = Volume::iscsi(target.clone(), 0, "ext4", [], &token).await?;
//!
//!     // Serve it to the host runtime
//!     let provider = VolumeProvider::default();
//!     provider.add("redis", volume).await;
//!     let _rootfs = WithVolumeRootfs::new(&provider, "redis", "docker.io/library/redis:alpine");
//!     let _mounts = provider.mounts("redis", &token).await?;
//!
//!     // Tear down once nothing references the device
//!     target.logout(&token).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration types and defaults
//! - [`iscsi`] - Portal discovery and target login/logout
//! - [`mount`] - Mount option parsing and configuration steps
//! - [`volume`] - Bind, CIFS and iSCSI volumes
//! - [`provider`] - The volume registry served to the host runtime
//! - [`runtime`] - Host runtime hooks
//! - [`cli`] - Command-line argument types
//!
//! # Platform Support
//!
//! Linux only. Mounting requires `CAP_SYS_ADMIN` and iSCSI requires open-iscsi.

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod cli;
pub mod config;
pub mod iscsi;
pub mod mount;
pub mod provider;
pub mod runtime;
pub mod volume;

pub use error::*;
