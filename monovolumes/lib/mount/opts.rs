//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A configuration step that appends mount options while a volume is being constructed.
///
/// Steps are applied in the order they are passed to a volume constructor, after any options
/// the volume type itself requires.
///
/// ## Examples
///
/// ```
/// use monovolumes::mount::{MountOpt, apply_mount_opts};
///
/// let options = apply_mount_opts(
///     vec!["bind".to_string()],
///     [
///         MountOpt::username_and_password("guest", ""),
///         MountOpt::uid_gid(1000, 1000),
///         MountOpt::options(["ro"]),
///     ],
/// );
///
/// assert_eq!(options, ["bind", "username=guest", "uid=1000", "gid=1000", "ro"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOpt {
    /// Appends the options verbatim.
    Options(Vec<String>),

    /// Appends `username=<user>` and, when the password is not empty, `password=<pass>`.
    UsernameAndPassword {
        /// The user name.
        username: String,

        /// The password. Empty means no password.
        password: String,
    },

    /// Appends `uid=<uid>` and `gid=<gid>`.
    UidGid {
        /// The owning user id.
        uid: u32,

        /// The owning group id.
        gid: u32,
    },
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl MountOpt {
    /// Creates a step that appends each of `options` verbatim.
    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Options(options.into_iter().map(Into::into).collect())
    }

    /// Creates a step that appends CIFS credentials.
    pub fn username_and_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::UsernameAndPassword {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates a step that appends the owning uid and gid.
    pub fn uid_gid(uid: u32, gid: u32) -> Self {
        Self::UidGid { uid, gid }
    }

    /// Appends this step's options to `options`.
    pub fn apply(&self, options: &mut Vec<String>) {
        match self {
            Self::Options(extra) => options.extend(extra.iter().cloned()),
            Self::UsernameAndPassword { username, password } => {
                options.push(format!("username={}", username));
                if !password.is_empty() {
                    options.push(format!("password={}", password));
                }
            }
            Self::UidGid { uid, gid } => {
                options.push(format!("uid={}", uid));
                options.push(format!("gid={}", gid));
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Applies `opts` in order on top of `base` and returns the resulting option list.
pub fn apply_mount_opts(
    mut base: Vec<String>,
    opts: impl IntoIterator<Item = MountOpt>,
) -> Vec<String> {
    for opt in opts {
        opt.apply(&mut base);
    }
    base
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_opt_username_without_password() {
        let mut options = Vec::new();
        MountOpt::username_and_password("alice", "").apply(&mut options);
        assert_eq!(options, ["username=alice"]);
    }

    #[test]
    fn test_mount_opt_username_with_password() {
        let mut options = Vec::new();
        MountOpt::username_and_password("alice", "s3cret").apply(&mut options);
        assert_eq!(options, ["username=alice", "password=s3cret"]);
    }

    #[test]
    fn test_mount_opt_uid_gid() {
        let mut options = Vec::new();
        MountOpt::uid_gid(0, 100).apply(&mut options);
        assert_eq!(options, ["uid=0", "gid=100"]);
    }

    #[test]
    fn test_apply_mount_opts_keeps_call_order() {
        let options = apply_mount_opts(
            Vec::new(),
            [
                MountOpt::options(["vers=3.0"]),
                MountOpt::uid_gid(1, 2),
                MountOpt::options(["ro", "noexec"]),
            ],
        );
        assert_eq!(options, ["vers=3.0", "uid=1", "gid=2", "ro", "noexec"]);
    }
}
