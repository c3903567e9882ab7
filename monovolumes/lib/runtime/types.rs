use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A rootfs mount as understood by the host runtime's snapshot and unpack machinery.
///
/// Unlike an OCI mount this has no destination. The runtime decides where it is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootfsMount {
    /// The filesystem type.
    #[serde(rename = "type")]
    pub typ: String,

    /// The device, share or directory to mount.
    pub source: String,

    /// Mount options in fstab form.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Settings the host runtime uses when unpacking an image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackConfig {
    /// Mounts the image layers are unpacked into. Empty means the runtime's own snapshotter.
    pub mounts: Vec<RootfsMount>,
}

/// The parts of a container record a volume can influence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerConfig {
    /// The container identifier.
    pub id: String,

    /// The snapshotter or mount provider that resolves the container's rootfs.
    pub snapshotter: Option<String>,

    /// The key the snapshotter resolves.
    pub snapshot_key: Option<String>,

    /// The name of the image the container runs.
    pub image: Option<String>,
}

/// Settings the host runtime uses when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskConfig {
    /// Mounts forming the task's rootfs. Empty means the container's snapshot.
    pub rootfs: Vec<RootfsMount>,
}
