use std::{path::PathBuf, time::Duration};

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::VolumeResult;

use super::{
    DEFAULT_DEVICE_DIR, DEFAULT_ISCSIADM_PATH, DEFAULT_ISCSI_PORT, DEFAULT_LUN,
    DEFAULT_POLL_INTERVAL, DEFAULT_PROVIDER_ID,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The complete monovolumes configuration.
///
/// ## Examples
///
/// ```
/// use monovolumes::config::VolumesConfig;
///
/// let config = VolumesConfig::from_toml_str(
///     r#"
///     [iscsi]
///     default_port = 3261
///
///     [provider]
///     id = "dev.example.volumes"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(*config.get_iscsi().get_default_port(), 3261);
/// assert_eq!(config.get_iscsi().get_adm_path().to_str(), Some("iscsiadm"));
/// assert_eq!(config.get_provider().get_id(), "dev.example.volumes");
/// ```
#[derive(Debug, Default, Clone, Serialize, Deserialize, TypedBuilder, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct VolumesConfig {
    /// Settings for the iSCSI initiator.
    #[serde(default)]
    #[builder(default)]
    iscsi: IscsiConfig,

    /// Settings for the volume provider.
    #[serde(default)]
    #[builder(default)]
    provider: ProviderConfig,
}

/// Settings for talking to the kernel's iSCSI initiator.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct IscsiConfig {
    /// Path to the `iscsiadm` binary.
    #[serde(default = "default_adm_path")]
    #[builder(default = default_adm_path(), setter(into))]
    adm_path: PathBuf,

    /// Port used for portals created without an explicit port.
    #[serde(default = "default_port")]
    #[builder(default = DEFAULT_ISCSI_PORT)]
    default_port: u16,

    /// LUN polled for after a login.
    #[serde(default = "default_lun")]
    #[builder(default = DEFAULT_LUN)]
    default_lun: u32,

    /// Readiness polling interval in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    #[builder(default = default_poll_interval_ms())]
    poll_interval_ms: u64,

    /// Directory holding the by-path device links.
    #[serde(default = "default_device_dir")]
    #[builder(default = default_device_dir(), setter(into))]
    device_dir: PathBuf,
}

/// Settings for the volume provider.
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ProviderConfig {
    /// The identifier the provider answers to.
    #[serde(default = "default_provider_id")]
    #[builder(default = default_provider_id(), setter(into))]
    id: String,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VolumesConfig {
    /// Parses a configuration from TOML. Missing tables and fields take their defaults.
    pub fn from_toml_str(contents: &str) -> VolumeResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a TOML configuration file.
    pub async fn load(path: impl Into<PathBuf>) -> VolumeResult<Self> {
        let path = path.into();
        let contents = tokio::fs::read_to_string(&path).await?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("loaded volumes config from {}", path.display());
        Ok(config)
    }
}

impl IscsiConfig {
    /// Returns the readiness polling interval.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for IscsiConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Serde Defaults
//--------------------------------------------------------------------------------------------------

fn default_adm_path() -> PathBuf {
    PathBuf::from(DEFAULT_ISCSIADM_PATH)
}

fn default_port() -> u16 {
    DEFAULT_ISCSI_PORT
}

fn default_lun() -> u32 {
    DEFAULT_LUN
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_device_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE_DIR)
}

fn default_provider_id() -> String {
    DEFAULT_PROVIDER_ID.to_string()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
