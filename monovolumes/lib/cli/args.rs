use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

//-------------------------------------------------------------------------------------------------
// Types
//-------------------------------------------------------------------------------------------------

/// monovol - discover iSCSI targets and mount bind, CIFS and iSCSI volumes
#[derive(Debug, Parser)]
#[command(name = "monovol", author, about, version)]
pub struct MonovolArgs {
    /// The subcommand to run
    #[command(subcommand)]
    pub subcommand: Option<MonovolSubcommand>,

    /// Path to a TOML config file. Falls back to $MONOVOLUMES_CONFIG
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum MonovolSubcommand {
    /// List the targets served by a portal
    #[command(name = "discover")]
    Discover {
        /// The portal to query
        #[command(flatten)]
        portal: PortalArgs,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Log in to a target and wait for its device node
    #[command(name = "login")]
    Login {
        /// The target to log in to
        #[command(flatten)]
        target: TargetArgs,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Log out of a target
    #[command(name = "logout")]
    Logout {
        /// The target to log out of
        #[command(flatten)]
        target: TargetArgs,

        /// Give up after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Print the device node of a target's LUN
    #[command(name = "device-path")]
    DevicePath {
        /// The target
        #[command(flatten)]
        target: TargetArgs,

        /// The LUN. Defaults to the configured default LUN
        #[arg(long)]
        lun: Option<u32>,
    },

    /// Mount a volume
    #[command(name = "mount")]
    Mount {
        /// The kind of volume to mount
        #[command(subcommand)]
        volume: MountSubcommand,
    },

    /// Unmount a mount point
    #[command(name = "unmount")]
    Unmount {
        /// The mount point
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,
    },
}

/// Volume kinds accepted by `monovol mount`
#[derive(Debug, Subcommand)]
pub enum MountSubcommand {
    /// Bind mount a host directory
    #[command(name = "bind")]
    Bind {
        /// The directory to bind
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// The mount point
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// Extra mount options
        #[arg(short, long = "option", value_name = "OPTION")]
        options: Vec<String>,
    },

    /// Mount a CIFS share
    #[command(name = "cifs")]
    Cifs {
        /// The share, e.g. //fileserver/media
        #[arg(value_name = "SOURCE")]
        source: String,

        /// The mount point
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// The user to authenticate as
        #[arg(long)]
        username: Option<String>,

        /// The password. Omit for none
        #[arg(long, requires = "username")]
        password: Option<String>,

        /// Owner uid of the mounted files
        #[arg(long, requires = "gid")]
        uid: Option<u32>,

        /// Owner gid of the mounted files
        #[arg(long, requires = "uid")]
        gid: Option<u32>,

        /// Extra mount options
        #[arg(short, long = "option", value_name = "OPTION")]
        options: Vec<String>,
    },

    /// Log in to an iSCSI target and mount a filesystem from one of its LUNs
    #[command(name = "iscsi")]
    Iscsi {
        /// The target
        #[command(flatten)]
        target: TargetArgs,

        /// The mount point
        #[arg(value_name = "DESTINATION")]
        destination: PathBuf,

        /// The LUN. Defaults to the configured default LUN
        #[arg(long)]
        lun: Option<u32>,

        /// The filesystem on the LUN
        #[arg(long, default_value = "ext4")]
        fstype: String,

        /// Extra mount options
        #[arg(short, long = "option", value_name = "OPTION")]
        options: Vec<String>,

        /// Give up on the login after this many seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },
}

/// Identifies an iSCSI portal
#[derive(Debug, Args)]
pub struct PortalArgs {
    /// The portal host or IP address
    #[arg(long, value_name = "HOST")]
    pub host: String,

    /// The portal port. Defaults to the configured default port
    #[arg(long)]
    pub port: Option<u16>,
}

/// Identifies an iSCSI target on a portal
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// The portal the target is served by
    #[command(flatten)]
    pub portal: PortalArgs,

    /// The target's IQN
    #[arg(long)]
    pub iqn: String,
}

//-------------------------------------------------------------------------------------------------
// Tests
//-------------------------------------------------------------------------------------------------
