use nix::mount::MsFlags;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Splits fstab-style mount options into kernel mount flags and filesystem data.
///
/// Options naming a known mount flag are folded into the returned [`MsFlags`]. Everything else,
/// including `key=value` pairs and unrecognised bare words, is passed through untouched as the
/// comma-joined data string, in the order it was given. CIFS in particular is sensitive to that
/// order.
///
/// This never fails.
///
/// ## Examples
///
/// ```
/// use monovolumes::mount::parse_mount_options;
/// use nix::mount::MsFlags;
///
/// let (flags, data) = parse_mount_options(&["ro", "username=guest", "nosuid", "vers=3.0"]);
/// assert_eq!(flags, MsFlags::MS_RDONLY | MsFlags::MS_NOSUID);
/// assert_eq!(data, "username=guest,vers=3.0");
/// ```
pub fn parse_mount_options<T: AsRef<str>>(options: &[T]) -> (MsFlags, String) {
    let mut flags = MsFlags::empty();
    let mut data: Vec<&str> = Vec::new();

    for option in options.iter().map(AsRef::as_ref) {
        match apply_mount_flag(flags, option) {
            Some(updated) => flags = updated,
            None => data.push(option),
        }
    }

    (flags, data.join(","))
}

/// Applies a single flag option to `flags`, returning `None` when `option` is not a flag.
fn apply_mount_flag(mut flags: MsFlags, option: &str) -> Option<MsFlags> {
    match option {
        // Clear flags
        "defaults" => {}
        "async" => flags &= !MsFlags::MS_SYNCHRONOUS,
        "atime" => flags &= !MsFlags::MS_NOATIME,
        "dev" => flags &= !MsFlags::MS_NODEV,
        "diratime" => flags &= !MsFlags::MS_NODIRATIME,
        "exec" => flags &= !MsFlags::MS_NOEXEC,
        "loud" => flags &= !MsFlags::MS_SILENT,
        "nomand" => flags &= !MsFlags::MS_MANDLOCK,
        "norelatime" => flags &= !MsFlags::MS_RELATIME,
        "nostrictatime" => flags &= !MsFlags::MS_STRICTATIME,
        "rw" => flags &= !MsFlags::MS_RDONLY,
        "suid" => flags &= !MsFlags::MS_NOSUID,
        // Set flags
        "bind" => flags |= MsFlags::MS_BIND,
        "dirsync" => flags |= MsFlags::MS_DIRSYNC,
        "mand" => flags |= MsFlags::MS_MANDLOCK,
        "noatime" => flags |= MsFlags::MS_NOATIME,
        "nodev" => flags |= MsFlags::MS_NODEV,
        "nodiratime" => flags |= MsFlags::MS_NODIRATIME,
        "noexec" => flags |= MsFlags::MS_NOEXEC,
        "nosuid" => flags |= MsFlags::MS_NOSUID,
        "rbind" => flags |= MsFlags::MS_BIND | MsFlags::MS_REC,
        "unbindable" => flags |= MsFlags::MS_UNBINDABLE,
        "runbindable" => flags |= MsFlags::MS_UNBINDABLE | MsFlags::MS_REC,
        "private" => flags |= MsFlags::MS_PRIVATE,
        "rprivate" => flags |= MsFlags::MS_PRIVATE | MsFlags::MS_REC,
        "shared" => flags |= MsFlags::MS_SHARED,
        "rshared" => flags |= MsFlags::MS_SHARED | MsFlags::MS_REC,
        "slave" => flags |= MsFlags::MS_SLAVE,
        "rslave" => flags |= MsFlags::MS_SLAVE | MsFlags::MS_REC,
        "relatime" => flags |= MsFlags::MS_RELATIME,
        "remount" => flags |= MsFlags::MS_REMOUNT,
        "ro" => flags |= MsFlags::MS_RDONLY,
        "silent" => flags |= MsFlags::MS_SILENT,
        "strictatime" => flags |= MsFlags::MS_STRICTATIME,
        "sync" => flags |= MsFlags::MS_SYNCHRONOUS,
        _ => return None,
    }
    Some(flags)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mount_options_empty() {
        let (flags, data) = parse_mount_options::<&str>(&[]);
        assert_eq!(flags, MsFlags::empty());
        assert_eq!(data, "");
    }

    #[test]
    fn test_parse_mount_options_bind_rw() {
        let (flags, data) = parse_mount_options(&["bind", "rw"]);
        assert_eq!(flags, MsFlags::MS_BIND);
        assert_eq!(data, "");
    }

    #[test]
    fn test_parse_mount_options_later_flag_wins() {
        let (flags, _) = parse_mount_options(&["ro", "rw"]);
        assert!(!flags.contains(MsFlags::MS_RDONLY));

        let (flags, _) = parse_mount_options(&["rw", "ro"]);
        assert!(flags.contains(MsFlags::MS_RDONLY));
    }

    #[test]
    fn test_parse_mount_options_unknown_words_become_data() {
        let (flags, data) = parse_mount_options(&["_netdev", "nosuid", "nofail", "seal"]);
        assert_eq!(flags, MsFlags::MS_NOSUID);
        assert_eq!(data, "_netdev,nofail,seal");
    }

    #[test]
    fn test_parse_mount_options_preserves_data_order() {
        let options = vec![
            "username=alice".to_string(),
            "ro".to_string(),
            "password=secret".to_string(),
            "uid=1000".to_string(),
            "nodev".to_string(),
            "gid=1000".to_string(),
        ];

        let (flags, data) = parse_mount_options(&options);
        assert_eq!(flags, MsFlags::MS_RDONLY | MsFlags::MS_NODEV);
        assert_eq!(data, "username=alice,password=secret,uid=1000,gid=1000");
    }

    #[test]
    fn test_parse_mount_options_recursive_variants() {
        let (flags, _) = parse_mount_options(&["rbind", "rprivate"]);
        assert_eq!(
            flags,
            MsFlags::MS_BIND | MsFlags::MS_REC | MsFlags::MS_PRIVATE
        );
    }
}
