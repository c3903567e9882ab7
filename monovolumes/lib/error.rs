//! `monovolumes::error` is a module containing the error types for the monovolumes crate.

use std::{
    error::Error,
    fmt::{self, Display},
    path::PathBuf,
};

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The result of a monovolumes-related operation.
pub type VolumeResult<T> = Result<T, VolumeError>;

/// An error that occurred while discovering, attaching or mounting a volume.
#[derive(pretty_error_debug::Debug, Error)]
pub enum VolumeError {
    /// An I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The administration command could not be started.
    #[error("failed to spawn {program}: {source}")]
    CommandSpawn {
        /// The program that failed to start.
        program: String,

        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The administration command exited with a non-zero status.
    #[error("{program} {} exited with status {status}: {output}", .args.join(" "))]
    CommandFailed {
        /// The program that was run.
        program: String,

        /// The arguments passed to the program.
        args: Vec<String>,

        /// A human readable exit status.
        status: String,

        /// Combined stdout and stderr captured from the program.
        output: String,
    },

    /// The caller's cancellation token fired before the operation completed.
    #[error("{operation} cancelled")]
    Cancelled {
        /// The operation that was interrupted.
        operation: String,
    },

    /// Discovery of the targets served by a portal failed.
    #[error("discover targets on {portal}: {source}")]
    Discovery {
        /// The portal address.
        portal: String,

        /// The underlying failure.
        #[source]
        source: Box<VolumeError>,
    },

    /// Logging in to a target failed.
    #[error("login to {iqn}: {source}")]
    Login {
        /// The target IQN.
        iqn: String,

        /// The underlying failure.
        #[source]
        source: Box<VolumeError>,
    },

    /// Logging out of a target failed.
    #[error("logout from {iqn}: {source}")]
    Logout {
        /// The target IQN.
        iqn: String,

        /// The underlying failure.
        #[source]
        source: Box<VolumeError>,
    },

    /// A discovery output line could not be split into portal info and IQN.
    #[error("malformed discovery output at line {line_number}: {line:?}")]
    MalformedDiscoveryLine {
        /// The 1-based line number within the command output.
        line_number: usize,

        /// The offending line.
        line: String,
    },

    /// The requested target is not served by the portal.
    #[error("{iqn} does not exist in portal {portal}")]
    TargetNotFound {
        /// The IQN that was looked up.
        iqn: String,

        /// The portal address that was queried.
        portal: String,
    },

    /// No volume is registered under the key.
    #[error("volume does not exist: {0}")]
    VolumeNotFound(String),

    /// The mount syscall failed.
    #[error("mount {mount_source:?} on {destination:?} ({fstype}): {errno}")]
    Mount {
        /// The mount source.
        mount_source: String,

        /// The mount destination.
        destination: PathBuf,

        /// The filesystem type handed to the kernel.
        fstype: String,

        /// The error reported by the kernel.
        errno: nix::Error,
    },

    /// The umount syscall failed.
    #[error("unmount {destination:?}: {errno}")]
    Unmount {
        /// The mount point.
        destination: PathBuf,

        /// The error reported by the kernel.
        errno: nix::Error,
    },

    /// An OCI mount descriptor could not be built.
    #[error("oci spec error: {0}")]
    OciSpec(#[from] oci_spec::OciSpecError),

    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Custom error.
    #[error("Custom error: {0}")]
    Custom(#[from] AnyError),
}

/// An error that can represent any error.
#[derive(Debug)]
pub struct AnyError {
    error: anyhow::Error,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl VolumeError {
    /// Creates a new `Err` result.
    pub fn custom(error: impl Into<anyhow::Error>) -> VolumeError {
        VolumeError::Custom(AnyError {
            error: error.into(),
        })
    }

    /// Creates a cancellation error for the named operation.
    pub fn cancelled(operation: impl Into<String>) -> VolumeError {
        VolumeError::Cancelled {
            operation: operation.into(),
        }
    }

    /// Returns `true` if the error, or the error it wraps, is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            VolumeError::Cancelled { .. } => true,
            VolumeError::Discovery { source, .. }
            | VolumeError::Login { source, .. }
            | VolumeError::Logout { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Returns `true` if the error is a lookup miss for a volume or a target.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VolumeError::VolumeNotFound(_) | VolumeError::TargetNotFound { .. }
        )
    }

    /// Returns the combined output of a failed administration command, if any.
    pub fn command_output(&self) -> Option<&str> {
        match self {
            VolumeError::CommandFailed { output, .. } => Some(output),
            VolumeError::Discovery { source, .. }
            | VolumeError::Login { source, .. }
            | VolumeError::Logout { source, .. } => source.command_output(),
            _ => None,
        }
    }
}

impl AnyError {
    /// Downcasts the error to a `T`.
    pub fn downcast<T>(&self) -> Option<&T>
    where
        T: Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<T>()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl PartialEq for AnyError {
    fn eq(&self, other: &Self) -> bool {
        self.error.to_string() == other.error.to_string()
    }
}

impl Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl Error for AnyError {}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
