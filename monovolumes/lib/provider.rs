//! The volume provider: a registry of volumes the host runtime resolves by key.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    config::ProviderConfig,
    runtime::{MountProvider, RootfsMount},
    volume::Volume,
    VolumeError, VolumeResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A mapping from keys to volumes, served to the host runtime as a [`MountProvider`].
///
/// Registering a key that is already present replaces the previous volume. The map is guarded
/// by a single lock which is never held while a volume's mounts are resolved.
///
/// ## Examples
///
/// ```
/// use monovolumes::{mount::MountOpt, provider::VolumeProvider, runtime::MountProvider, volume::Volume};
/// use tokio_util::sync::CancellationToken;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let provider = VolumeProvider::new("dev.example.volumes");
/// provider
///     .add("redis", Volume::bind("/tmp/redis", [MountOpt::options(["rw"])]))
///     .await;
///
/// let mounts = provider.mounts("redis", &CancellationToken::new()).await?;
/// assert_eq!(mounts[0].source, "/tmp/redis");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VolumeProvider {
    id: String,
    volumes: Mutex<HashMap<String, Arc<Volume>>>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VolumeProvider {
    /// Creates an empty provider answering to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            volumes: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an empty provider from its configuration.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.get_id())
    }

    /// Registers `volume` under `key`, replacing any volume already registered there.
    pub async fn add(&self, key: impl Into<String>, volume: impl Into<Arc<Volume>>) {
        let key = key.into();
        tracing::debug!("registering volume under {}", key);
        if self.volumes.lock().await.insert(key, volume.into()).is_some() {
            tracing::debug!("replaced previously registered volume");
        }
    }

    /// Returns the volume registered under `key`.
    pub async fn get(&self, key: &str) -> VolumeResult<Arc<Volume>> {
        self.volumes
            .lock()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| VolumeError::VolumeNotFound(key.to_string()))
    }

    /// Returns the number of registered volumes.
    pub async fn len(&self) -> usize {
        self.volumes.lock().await.len()
    }

    /// Returns `true` if no volume is registered.
    pub async fn is_empty(&self) -> bool {
        self.volumes.lock().await.is_empty()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for VolumeProvider {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

#[async_trait]
impl MountProvider for VolumeProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn mounts(
        &self,
        key: &str,
        token: &CancellationToken,
    ) -> VolumeResult<Vec<RootfsMount>> {
        let volume = self.get(key).await?;
        volume.mounts(token).await
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
