//! Volumes that can be handed to a container.
//!
//! A [`Volume`] is one of three kinds: a bind mounted host directory, a CIFS share or a
//! filesystem on an iSCSI LUN. Every kind can describe itself as an OCI mount for a container
//! spec, as rootfs mounts for the host runtime, or mount itself directly.

mod bind;
mod cifs;
mod iscsi;

use std::path::{Path, PathBuf};

use nix::mount::{self as syscall, MntFlags};
use oci_spec::runtime::{Mount, MountBuilder};
use tokio_util::sync::CancellationToken;

use crate::{
    iscsi::Target,
    mount::{parse_mount_options, MountOpt},
    runtime::RootfsMount,
    VolumeError, VolumeResult,
};

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use bind::*;
pub use cifs::*;
pub use iscsi::*;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A bind, CIFS or iSCSI volume.
///
/// ## Examples
///
/// ```
/// use monovolumes::{mount::MountOpt, volume::Volume};
///
/// let volume = Volume::cifs(
///     "//fileserver/media",
///     [MountOpt::username_and_password("guest", ""), MountOpt::uid_gid(1000, 1000)],
/// );
///
/// let mount = volume.oci_mount("/media").unwrap();
/// assert_eq!(mount.typ().as_deref(), Some("cifs"));
/// assert_eq!(
///     mount.options().as_deref(),
///     Some(&["username=guest".to_string(), "uid=1000".to_string(), "gid=1000".to_string()][..])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Volume {
    /// A bind mounted host directory.
    Bind(BindVolume),

    /// A CIFS network share.
    Cifs(CifsVolume),

    /// A filesystem on an iSCSI LUN.
    Iscsi(IscsiVolume),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Volume {
    /// Creates a bind volume. See [`BindVolume::new`].
    pub fn bind(source: impl Into<PathBuf>, opts: impl IntoIterator<Item = MountOpt>) -> Self {
        Self::Bind(BindVolume::new(source, opts))
    }

    /// Creates a CIFS volume. See [`CifsVolume::new`].
    pub fn cifs(source: impl Into<String>, opts: impl IntoIterator<Item = MountOpt>) -> Self {
        Self::Cifs(CifsVolume::new(source, opts))
    }

    /// Logs in to `target` and creates an iSCSI volume. See [`IscsiVolume::new`].
    pub async fn iscsi(
        target: Target,
        lun: u32,
        fstype: impl Into<String>,
        opts: impl IntoIterator<Item = MountOpt>,
        token: &CancellationToken,
    ) -> VolumeResult<Self> {
        Ok(Self::Iscsi(
            IscsiVolume::new(target, lun, fstype, opts, token).await?,
        ))
    }

    /// Returns the mount type reported in OCI and rootfs mounts.
    pub fn kind(&self) -> &str {
        match self {
            Self::Bind(_) => BIND_TYPE,
            Self::Cifs(_) => CIFS_TYPE,
            Self::Iscsi(volume) => volume.fstype(),
        }
    }

    /// Returns the filesystem type handed to `mount(2)`.
    pub fn fstype(&self) -> &str {
        match self {
            Self::Bind(_) => BIND_FSTYPE,
            Self::Cifs(_) => CIFS_TYPE,
            Self::Iscsi(volume) => volume.fstype(),
        }
    }

    /// Returns what is mounted: a directory, a share or a device node.
    pub fn source(&self) -> String {
        match self {
            Self::Bind(volume) => volume.source().display().to_string(),
            Self::Cifs(volume) => volume.source().to_string(),
            Self::Iscsi(volume) => volume.source().display().to_string(),
        }
    }

    /// Returns the mount options, type-mandated ones first.
    pub fn options(&self) -> &[String] {
        match self {
            Self::Bind(volume) => volume.options(),
            Self::Cifs(volume) => volume.options(),
            Self::Iscsi(volume) => volume.options(),
        }
    }

    /// Describes the volume mounted at `destination` as an OCI runtime mount.
    pub fn oci_mount(&self, destination: impl Into<PathBuf>) -> VolumeResult<Mount> {
        let mount = MountBuilder::default()
            .destination(destination.into())
            .typ(self.kind())
            .source(self.source())
            .options(self.options().to_vec())
            .build()?;

        Ok(mount)
    }

    /// Describes the volume as rootfs mounts for the host runtime.
    ///
    /// For iSCSI volumes the target login is repeated first. The login is idempotent, so this
    /// only has an effect when the session was lost since the volume was created.
    pub async fn mounts(&self, token: &CancellationToken) -> VolumeResult<Vec<RootfsMount>> {
        if let Self::Iscsi(volume) = self {
            volume.target().login(token).await?;
        }

        Ok(vec![RootfsMount {
            typ: self.kind().to_string(),
            source: self.source(),
            options: self.options().to_vec(),
        }])
    }

    /// Mounts the volume at `destination`.
    pub fn mount(&self, destination: impl AsRef<Path>) -> VolumeResult<()> {
        let destination = destination.as_ref();
        let source = self.source();
        let fstype = self.fstype();
        let (flags, data) = parse_mount_options(self.options());

        tracing::info!(
            "mounting {} volume {} at {}",
            self.kind(),
            source,
            destination.display()
        );
        syscall::mount(
            Some(source.as_str()),
            destination,
            Some(fstype),
            flags,
            (!data.is_empty()).then_some(data.as_str()),
        )
        .map_err(|errno| VolumeError::Mount {
            mount_source: source.clone(),
            destination: destination.to_path_buf(),
            fstype: fstype.to_string(),
            errno,
        })
    }

    /// Unmounts whatever is mounted at `destination`.
    pub fn unmount(&self, destination: impl AsRef<Path>) -> VolumeResult<()> {
        unmount(destination)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<BindVolume> for Volume {
    fn from(volume: BindVolume) -> Self {
        Self::Bind(volume)
    }
}

impl From<CifsVolume> for Volume {
    fn from(volume: CifsVolume) -> Self {
        Self::Cifs(volume)
    }
}

impl From<IscsiVolume> for Volume {
    fn from(volume: IscsiVolume) -> Self {
        Self::Iscsi(volume)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Unmounts whatever is mounted at `destination`.
pub fn unmount(destination: impl AsRef<Path>) -> VolumeResult<()> {
    let destination = destination.as_ref();
    tracing::info!("unmounting {}", destination.display());
    syscall::umount2(destination, MntFlags::empty()).map_err(|errno| VolumeError::Unmount {
        destination: destination.to_path_buf(),
        errno,
    })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
