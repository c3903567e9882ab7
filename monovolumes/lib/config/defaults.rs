use std::time::Duration;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The iSCSI administration tool invoked for discovery, login and logout.
pub const DEFAULT_ISCSIADM_PATH: &str = "iscsiadm";

/// The well-known iSCSI port used when a portal is created without one.
pub const DEFAULT_ISCSI_PORT: u16 = 3260;

/// The LUN whose device node signals that a login has completed.
pub const DEFAULT_LUN: u32 = 0;

/// How often the device directory is checked while waiting for a login to settle.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where the kernel initiator publishes by-path device links.
pub const DEFAULT_DEVICE_DIR: &str = "/dev/disk/by-path";

/// The identifier the volume provider registers under with the host runtime.
pub const DEFAULT_PROVIDER_ID: &str = "dev.monocore.volumes.provider.v1";

/// Environment variable naming the config file read by the `monovol` binary.
pub const MONOVOLUMES_CONFIG_ENV_VAR: &str = "MONOVOLUMES_CONFIG";
