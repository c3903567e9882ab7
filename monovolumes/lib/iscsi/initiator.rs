use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{config::IscsiConfig, VolumeResult};

use super::{IscsiAdm, IscsiAdmCommand, Portal};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The local iSCSI initiator: its configuration and the means of running `iscsiadm`.
///
/// An initiator is shared by every [`Portal`] and [`Target`](super::Target) created from it.
///
/// ## Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use monovolumes::{config::IscsiConfig, iscsi::Initiator};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> anyhow::Result<()> {
/// let initiator = Arc::new(Initiator::new(IscsiConfig::default()));
/// let portal = initiator.portal("10.0.10.10", None);
///
/// for target in portal.targets(&CancellationToken::new()).await? {
///     println!("{}", target.iqn());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Initiator {
    config: IscsiConfig,
    adm: Arc<dyn IscsiAdm>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Initiator {
    /// Creates an initiator that runs the `iscsiadm` binary named in `config`.
    pub fn new(config: IscsiConfig) -> Self {
        let adm = IscsiAdmCommand::new(config.get_adm_path());
        Self::with_adm(config, adm)
    }

    /// Creates an initiator that runs administration commands through `adm`.
    pub fn with_adm(config: IscsiConfig, adm: impl IscsiAdm + 'static) -> Self {
        Self {
            config,
            adm: Arc::new(adm),
        }
    }

    /// Returns the initiator configuration.
    pub fn get_config(&self) -> &IscsiConfig {
        &self.config
    }

    /// Creates a portal for `host`, using the configured default port when `port` is `None`.
    pub fn portal(self: &Arc<Self>, host: &str, port: Option<u16>) -> Portal {
        Portal::new(Arc::clone(self), host, port)
    }

    pub(crate) async fn adm(
        &self,
        args: &[String],
        token: &CancellationToken,
    ) -> VolumeResult<String> {
        self.adm.run(args, token).await
    }
}
