use std::path::{Path, PathBuf};

use crate::mount::{apply_mount_opts, MountOpt};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The mount type reported for bind volumes.
pub const BIND_TYPE: &str = "bind";

/// The filesystem type handed to `mount(2)` for bind mounts.
pub const BIND_FSTYPE: &str = "none";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A host directory bind mounted into place. Its options always start with `bind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindVolume {
    source: PathBuf,
    options: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl BindVolume {
    /// Creates a bind volume for the directory at `source`.
    pub fn new(source: impl Into<PathBuf>, opts: impl IntoIterator<Item = MountOpt>) -> Self {
        Self {
            source: source.into(),
            options: apply_mount_opts(vec![BIND_TYPE.to_string()], opts),
        }
    }

    /// Returns the directory being bound.
    pub fn source(&self) -> &Path {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_volume_options_start_with_bind() {
        let volume = BindVolume::new("/tmp/redis", []);
        assert_eq!(volume.options(), ["bind"]);

        let volume = BindVolume::new(
            "/tmp/redis",
            [MountOpt::options(["rw"]), MountOpt::options(["nosuid"])],
        );
        assert_eq!(volume.options(), ["bind", "rw", "nosuid"]);
        assert_eq!(volume.source(), Path::new("/tmp/redis"));
    }
}
