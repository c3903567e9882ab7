use std::{
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::{VolumeError, VolumeResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Output fragment reported by `iscsiadm` when logging in to a target with an existing session.
pub const SESSION_PRESENT_MESSAGE: &str = "already present";

/// Output fragment reported by `iscsiadm` when logging out of a target without a session.
pub const NO_SESSION_MESSAGE: &str = "No matching sessions found";

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Runs the iSCSI administration tool.
///
/// Implementations must return the combined stdout and stderr of a successful run, fail with
/// [`VolumeError::CommandFailed`] carrying that same output when the tool exits non-zero, and
/// fail with [`VolumeError::Cancelled`] when `token` fires first.
#[async_trait]
pub trait IscsiAdm: fmt::Debug + Send + Sync {
    /// Runs the tool with `args`.
    async fn run(&self, args: &[String], token: &CancellationToken) -> VolumeResult<String>;
}

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Runs `iscsiadm` as a child process.
#[derive(Debug, Clone)]
pub struct IscsiAdmCommand {
    program: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl IscsiAdmCommand {
    /// Creates a runner for the binary at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Returns the path of the binary that is run.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl IscsiAdm for IscsiAdmCommand {
    async fn run(&self, args: &[String], token: &CancellationToken) -> VolumeResult<String> {
        let program = self.program.display().to_string();
        if token.is_cancelled() {
            return Err(VolumeError::cancelled(program));
        }

        tracing::debug!("running {} {}", program, args.join(" "));
        let child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VolumeError::CommandSpawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the child on cancellation kills it.
        let output = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(VolumeError::cancelled(program)),
            output = child.wait_with_output() => output?,
        };

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(VolumeError::CommandFailed {
                program,
                args: args.to_vec(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        Ok(combined)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Arguments for discovering the targets served by the portal at `address`.
pub fn discovery_args(address: &str) -> Vec<String> {
    ["--mode", "discovery", "-t", "sendtargets", "--portal", address]
        .map(String::from)
        .to_vec()
}

/// Arguments for logging in to `iqn` through the portal at `address`.
pub fn login_args(iqn: &str, address: &str) -> Vec<String> {
    node_args(iqn, address, "--login")
}

/// Arguments for logging out of `iqn` through the portal at `address`.
pub fn logout_args(iqn: &str, address: &str) -> Vec<String> {
    node_args(iqn, address, "--logout")
}

/// Returns `true` if `err` is a failed login because a session already exists.
pub fn is_session_present(err: &VolumeError) -> bool {
    err.command_output()
        .is_some_and(|output| output.contains(SESSION_PRESENT_MESSAGE))
}

/// Returns `true` if `err` is a failed logout because there was no session.
pub fn is_no_session(err: &VolumeError) -> bool {
    err.command_output()
        .is_some_and(|output| output.contains(NO_SESSION_MESSAGE))
}

fn node_args(iqn: &str, address: &str, action: &str) -> Vec<String> {
    [
        "--mode",
        "node",
        "--targetname",
        iqn,
        "--portal",
        address,
        action,
    ]
    .map(String::from)
    .to_vec()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
