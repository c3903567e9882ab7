use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{VolumeError, VolumeResult};

use super::{discovery_args, parse_targets, Initiator, Target};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// An iSCSI portal: the `host:port` endpoint through which targets are discovered and sessions
/// are established.
#[derive(Debug, Clone)]
pub struct Portal {
    address: String,
    initiator: Arc<Initiator>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Portal {
    /// Creates a portal for `host`.
    ///
    /// When `port` is `None` the initiator's configured default port (3260 unless overridden)
    /// is used. IPv6 hosts are bracketed, as in `[fe80::1]:3260`.
    pub fn new(initiator: Arc<Initiator>, host: &str, port: Option<u16>) -> Self {
        let port = port.unwrap_or(*initiator.get_config().get_default_port());
        Self {
            address: join_host_port(host, port),
            initiator,
        }
    }

    /// Returns the portal address as passed to `iscsiadm`.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the initiator this portal was created from.
    pub fn initiator(&self) -> &Arc<Initiator> {
        &self.initiator
    }

    /// Returns a target on this portal without running discovery.
    pub fn target_unchecked(&self, iqn: impl Into<String>) -> Target {
        Target::new(self, iqn)
    }

    /// Discovers every target served by this portal.
    pub async fn targets(&self, token: &CancellationToken) -> VolumeResult<Vec<Target>> {
        let output = self
            .initiator
            .adm(&discovery_args(&self.address), token)
            .await
            .map_err(|source| VolumeError::Discovery {
                portal: self.address.clone(),
                source: Box::new(source),
            })?;

        let targets = parse_targets(self, &output)?;
        tracing::info!(
            "discovered {} target(s) on portal {}",
            targets.len(),
            self.address
        );
        Ok(targets)
    }

    /// Discovers the target named `iqn`, failing with [`VolumeError::TargetNotFound`] when the
    /// portal does not serve it.
    pub async fn target(&self, iqn: &str, token: &CancellationToken) -> VolumeResult<Target> {
        self.targets(token)
            .await?
            .into_iter()
            .find(|target| target.iqn() == iqn)
            .ok_or_else(|| VolumeError::TargetNotFound {
                iqn: iqn.to_string(),
                portal: self.address.clone(),
            })
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for Portal {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Portal {}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Joins a host and port into `host:port`, bracketing hosts that contain a colon.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{}]:{}", host, port)
    } else {
        format!("{}:{}", host, port)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
