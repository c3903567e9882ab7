use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{iscsi::Target, volume::Volume, VolumeResult};

use super::{
    ContainerConfig, MountProvider, NewContainerOpt, NewTaskOpt, ProcessDeleteOpt, TaskConfig,
    UnpackConfig, UnpackOpt,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Unpacks an image straight into a volume.
#[derive(Debug, Clone)]
pub struct WithVolumeUnpack {
    volume: Arc<Volume>,
}

/// Makes a container's rootfs resolve through a mount provider.
///
/// The container's snapshotter is set to the provider's id and its snapshot key to the key the
/// volume is registered under, so the runtime asks the provider for the rootfs mounts.
#[derive(Debug, Clone)]
pub struct WithVolumeRootfs {
    provider_id: String,
    key: String,
    image: String,
}

/// Uses a volume as a task's rootfs.
#[derive(Debug, Clone)]
pub struct WithVolume {
    volume: Arc<Volume>,
}

/// Logs out of an iSCSI target when the task's process is deleted.
#[derive(Debug, Clone)]
pub struct WithTargetLogout {
    target: Target,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl WithVolumeUnpack {
    /// Creates the hook for `volume`.
    pub fn new(volume: impl Into<Arc<Volume>>) -> Self {
        Self {
            volume: volume.into(),
        }
    }
}

impl WithVolumeRootfs {
    /// Creates the hook resolving `key` through `provider` for a container running `image`.
    pub fn new(
        provider: &impl MountProvider,
        key: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider.id().to_string(),
            key: key.into(),
            image: image.into(),
        }
    }
}

impl WithVolume {
    /// Creates the hook for `volume`.
    pub fn new(volume: impl Into<Arc<Volume>>) -> Self {
        Self {
            volume: volume.into(),
        }
    }
}

impl WithTargetLogout {
    /// Creates the hook for `target`.
    pub fn new(target: Target) -> Self {
        Self { target }
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl UnpackOpt for WithVolumeUnpack {
    async fn apply(
        &self,
        config: &mut UnpackConfig,
        token: &CancellationToken,
    ) -> VolumeResult<()> {
        config.mounts = self.volume.mounts(token).await?;
        Ok(())
    }
}

#[async_trait]
impl NewContainerOpt for WithVolumeRootfs {
    async fn apply(
        &self,
        container: &mut ContainerConfig,
        _token: &CancellationToken,
    ) -> VolumeResult<()> {
        container.snapshotter = Some(self.provider_id.clone());
        container.snapshot_key = Some(self.key.clone());
        container.image = Some(self.image.clone());
        Ok(())
    }
}

#[async_trait]
impl NewTaskOpt for WithVolume {
    async fn apply(&self, task: &mut TaskConfig, token: &CancellationToken) -> VolumeResult<()> {
        task.rootfs = self.volume.mounts(token).await?;
        Ok(())
    }
}

#[async_trait]
impl ProcessDeleteOpt for WithTargetLogout {
    async fn on_delete(&self, token: &CancellationToken) -> VolumeResult<()> {
        self.target.logout(token).await
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
