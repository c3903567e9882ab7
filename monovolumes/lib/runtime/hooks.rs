use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::VolumeResult;

use super::{ContainerConfig, RootfsMount, TaskConfig, UnpackConfig};

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// A named plugin the host runtime asks to resolve a key into rootfs mounts.
#[async_trait]
pub trait MountProvider: Send + Sync {
    /// The identifier the provider is registered under.
    fn id(&self) -> &str;

    /// Resolves `key` into the mounts of the volume registered under it.
    async fn mounts(&self, key: &str, token: &CancellationToken)
        -> VolumeResult<Vec<RootfsMount>>;
}

/// A hook applied while unpacking an image.
#[async_trait]
pub trait UnpackOpt: Send + Sync {
    /// Updates `config` before layers are unpacked.
    async fn apply(&self, config: &mut UnpackConfig, token: &CancellationToken)
        -> VolumeResult<()>;
}

/// A hook applied while creating a container.
#[async_trait]
pub trait NewContainerOpt: Send + Sync {
    /// Updates `container` before it is stored.
    async fn apply(
        &self,
        container: &mut ContainerConfig,
        token: &CancellationToken,
    ) -> VolumeResult<()>;
}

/// A hook applied while creating a task.
#[async_trait]
pub trait NewTaskOpt: Send + Sync {
    /// Updates `task` before it is started.
    async fn apply(&self, task: &mut TaskConfig, token: &CancellationToken) -> VolumeResult<()>;
}

/// A hook run when a task's process is deleted.
#[async_trait]
pub trait ProcessDeleteOpt: Send + Sync {
    /// Runs after the process has exited and been deleted.
    async fn on_delete(&self, token: &CancellationToken) -> VolumeResult<()>;
}
