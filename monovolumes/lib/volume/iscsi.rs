use std::path::PathBuf;

use tokio_util::sync::CancellationToken;

use crate::{
    iscsi::Target,
    mount::{apply_mount_opts, MountOpt},
    VolumeResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A filesystem on one LUN of a logged-in iSCSI target.
///
/// The source is never stored. It is always the target's by-path device node for the LUN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IscsiVolume {
    target: Target,
    lun: u32,
    fstype: String,
    options: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl IscsiVolume {
    /// Logs in to `target` and returns a volume for the `fstype` filesystem on `lun`.
    ///
    /// The login waits until the target's device node exists, so the returned volume is ready
    /// to be mounted.
    pub async fn new(
        target: Target,
        lun: u32,
        fstype: impl Into<String>,
        opts: impl IntoIterator<Item = MountOpt>,
        token: &CancellationToken,
    ) -> VolumeResult<Self> {
        let volume = Self {
            options: apply_mount_opts(Vec::new(), opts),
            target,
            lun,
            fstype: fstype.into(),
        };

        volume.target.login(token).await?;
        Ok(volume)
    }

    /// Returns the target the volume lives on.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Returns the LUN.
    pub fn lun(&self) -> u32 {
        self.lun
    }

    /// Returns the filesystem type.
    pub fn fstype(&self) -> &str {
        &self.fstype
    }

    /// Returns the device node the volume is mounted from.
    pub fn source(&self) -> PathBuf {
        self.target.device_path(self.lun)
    }

    /// Returns the mount options.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}
