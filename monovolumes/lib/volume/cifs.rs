use crate::mount::{apply_mount_opts, MountOpt};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The mount and filesystem type of CIFS volumes.
pub const CIFS_TYPE: &str = "cifs";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A CIFS/SMB network share such as `//fileserver/media`.
///
/// Credentials and ownership are passed as options, typically through
/// [`MountOpt::username_and_password`] and [`MountOpt::uid_gid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CifsVolume {
    source: String,
    options: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl CifsVolume {
    /// Creates a CIFS volume for the share at `source`.
    pub fn new(source: impl Into<String>, opts: impl IntoIterator<Item = MountOpt>) -> Self {
        Self {
            source: source.into(),
            options: apply_mount_opts(Vec::new(), opts),
        }
    }

    /// Returns the share.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the mount options.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
