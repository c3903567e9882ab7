use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, time};
use tokio_util::sync::CancellationToken;

use crate::{VolumeError, VolumeResult};

use super::{is_no_session, is_session_present, login_args, logout_args, Initiator, Portal};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An iSCSI target reachable through a portal.
///
/// A target only records its name and the address of the portal it was found on. Session state
/// lives in the kernel initiator, so [`login`](Self::login) and [`logout`](Self::logout) are both
/// safe to repeat.
#[derive(Debug, Clone)]
pub struct Target {
    iqn: String,
    portal_address: String,
    initiator: Arc<Initiator>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Target {
    /// Creates the target `iqn` on `portal`.
    pub fn new(portal: &Portal, iqn: impl Into<String>) -> Self {
        Self {
            iqn: iqn.into(),
            portal_address: portal.address().to_string(),
            initiator: Arc::clone(portal.initiator()),
        }
    }

    /// Returns the target's iSCSI qualified name.
    pub fn iqn(&self) -> &str {
        &self.iqn
    }

    /// Returns the address of the portal the target is reached through.
    pub fn portal_address(&self) -> &str {
        &self.portal_address
    }

    /// Returns the by-path device node the kernel creates for `lun` once logged in.
    pub fn device_path(&self, lun: u32) -> PathBuf {
        device_path(
            self.initiator.get_config().get_device_dir(),
            &self.portal_address,
            &self.iqn,
            lun,
        )
    }

    /// Logs in to the target and waits for its device node to appear.
    ///
    /// A login rejected because the session is already present counts as success. In both cases
    /// the call returns only once [`ready`](Self::ready) does.
    pub async fn login(&self, token: &CancellationToken) -> VolumeResult<()> {
        match self
            .initiator
            .adm(&login_args(&self.iqn, &self.portal_address), token)
            .await
        {
            Ok(_) => tracing::info!("logged in to {} on {}", self.iqn, self.portal_address),
            Err(e) if is_session_present(&e) => {
                tracing::warn!("session to {} already present", self.iqn)
            }
            Err(e) => {
                return Err(VolumeError::Login {
                    iqn: self.iqn.clone(),
                    source: Box::new(e),
                })
            }
        }

        self.ready(token).await.map_err(|e| VolumeError::Login {
            iqn: self.iqn.clone(),
            source: Box::new(e),
        })
    }

    /// Logs out of the target. Logging out without a session counts as success.
    pub async fn logout(&self, token: &CancellationToken) -> VolumeResult<()> {
        match self
            .initiator
            .adm(&logout_args(&self.iqn, &self.portal_address), token)
            .await
        {
            Ok(_) => {
                tracing::info!("logged out of {} on {}", self.iqn, self.portal_address);
                Ok(())
            }
            Err(e) if is_no_session(&e) => {
                tracing::warn!("no session to {} to log out of", self.iqn);
                Ok(())
            }
            Err(e) => Err(VolumeError::Logout {
                iqn: self.iqn.clone(),
                source: Box::new(e),
            }),
        }
    }

    /// Polls until the device node for the default LUN exists or `token` is cancelled.
    ///
    /// Cancellation is checked before the filesystem on every round, so a cancelled token always
    /// yields [`VolumeError::Cancelled`].
    pub async fn ready(&self, token: &CancellationToken) -> VolumeResult<()> {
        let config = self.initiator.get_config();
        let path = self.device_path(*config.get_default_lun());
        let interval = config.poll_interval();

        tracing::debug!("waiting for device {}", path.display());
        loop {
            if token.is_cancelled() {
                return Err(VolumeError::cancelled(format!(
                    "waiting for {}",
                    path.display()
                )));
            }

            if fs::symlink_metadata(&path).await.is_ok() {
                tracing::debug!("device {} is ready", path.display());
                return Ok(());
            }

            tokio::select! {
                _ = token.cancelled() => {}
                _ = time::sleep(interval) => {}
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for Target {
    fn eq(&self, other: &Self) -> bool {
        self.iqn == other.iqn && self.portal_address == other.portal_address
    }
}

impl Eq for Target {}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Derives the by-path device node for `lun` of `iqn` behind `portal_address`.
///
/// This matches the kernel initiator's udev naming:
/// `<device_dir>/ip-<portal>-iscsi-<iqn>-lun-<lun>`.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
///
/// use monovolumes::iscsi::device_path;
///
/// let path = device_path(
///     Path::new("/dev/disk/by-path"),
///     "10.0.10.10:3260",
///     "iqn.2019.com.example:redis",
///     0,
/// );
/// assert_eq!(
///     path.to_str(),
///     Some("/dev/disk/by-path/ip-10.0.10.10:3260-iscsi-iqn.2019.com.example:redis-lun-0")
/// );
/// ```
pub fn device_path(device_dir: &Path, portal_address: &str, iqn: &str, lun: u32) -> PathBuf {
    device_dir.join(format!("ip-{}-iscsi-{}-lun-{}", portal_address, iqn, lun))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
