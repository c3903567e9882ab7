use std::{
    fmt,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use monovolumes::{
    config::IscsiConfig,
    iscsi::{Initiator, IscsiAdm, Portal},
    mount::MountOpt,
    runtime::{ProcessDeleteOpt, WithTargetLogout},
    volume::Volume,
    VolumeError, VolumeResult,
};
use tempfile::{tempdir, TempDir};
use tokio_util::sync::CancellationToken;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const IQN: &str = "iqn.2019.com.example:redis";

const DEVICE_NAME: &str = "ip-10.0.10.10:3260-iscsi-iqn.2019.com.example:redis-lun-0";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

type Handler = Box<dyn Fn(&[String]) -> VolumeResult<String> + Send + Sync>;

/// Stands in for `iscsiadm`, answering each call through `handler` and recording its arguments.
struct ScriptedAdm {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    handler: Handler,
}

struct Fixture {
    device_dir: TempDir,
    portal: Portal,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test(tokio::test)]
async fn test_iscsi_discovery_lists_targets() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| {
        Ok("10.0.10.10:3260,1 iqn.2019.com.example:redis\n\
            \n\
            10.0.10.10:3260,1 iqn.2019.com.example:backup\n"
            .to_string())
    })?;

    let targets = fixture.portal.targets(&CancellationToken::new()).await?;

    let iqns: Vec<_> = targets.iter().map(|target| target.iqn()).collect();
    assert_eq!(iqns, [IQN, "iqn.2019.com.example:backup"]);
    assert!(targets
        .iter()
        .all(|target| target.portal_address() == "10.0.10.10:3260"));
    assert_eq!(
        fixture.calls(),
        [["--mode", "discovery", "-t", "sendtargets", "--portal", "10.0.10.10:3260"]]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_portal_target_lookup() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok(format!("10.0.10.10:3260,1 {}\n", IQN)))?;
    let token = CancellationToken::new();

    let target = fixture.portal.target(IQN, &token).await?;
    assert_eq!(target.iqn(), IQN);

    let err = fixture
        .portal
        .target("iqn.2019.com.example:missing", &token)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, VolumeError::TargetNotFound { .. }));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_discovery_failure_keeps_output() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| {
        Err(failed(
            args,
            "iscsiadm: cannot make connection to 10.0.10.10: Connection refused\n",
        ))
    })?;

    let err = fixture
        .portal
        .targets(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VolumeError::Discovery { .. }));
    assert!(err.command_output().unwrap().contains("Connection refused"));
    assert!(!err.is_cancelled());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_discovery_rejects_malformed_output() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok("10.0.10.10:3260,1\n".to_string()))?;

    let err = fixture
        .portal
        .targets(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VolumeError::MalformedDiscoveryLine { line_number: 1, .. }
    ));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_login_waits_for_device() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, device_dir| {
        if args.contains(&"--login".to_string()) {
            create_device(device_dir);
        }
        Ok(String::new())
    })?;

    let target = fixture.portal.target_unchecked(IQN);
    target.login(&CancellationToken::new()).await?;

    assert!(fixture.device_dir.path().join(DEVICE_NAME).exists());
    assert_eq!(
        fixture.calls(),
        [[
            "--mode",
            "node",
            "--targetname",
            IQN,
            "--portal",
            "10.0.10.10:3260",
            "--login"
        ]]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_login_tolerates_existing_session() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| {
        Err(failed(
            args,
            "iscsiadm: default: 1 session requested, but 1 already present.\n",
        ))
    })?;
    create_device(fixture.device_dir.path());

    let target = fixture.portal.target_unchecked(IQN);
    target.login(&CancellationToken::new()).await?;
    target.login(&CancellationToken::new()).await?;

    assert_eq!(fixture.calls().len(), 2);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_login_surfaces_other_failures() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| {
        Err(failed(
            args,
            "iscsiadm: Could not login to [iface: default, target: x]: authorization failure\n",
        ))
    })?;

    let err = fixture
        .portal
        .target_unchecked(IQN)
        .login(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VolumeError::Login { .. }));
    assert!(err.command_output().unwrap().contains("authorization failure"));
    assert!(!err.is_cancelled());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_login_cancelled_while_device_missing() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok(String::new()))?;
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        fixture.portal.target_unchecked(IQN).login(&token),
    )
    .await?;

    let err = result.unwrap_err();
    assert!(err.is_cancelled());
    assert!(!fixture.device_dir.path().join(DEVICE_NAME).exists());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_ready_reports_cancellation_first() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok(String::new()))?;
    let target = fixture.portal.target_unchecked(IQN);
    let token = CancellationToken::new();
    token.cancel();

    assert!(target.ready(&token).await.unwrap_err().is_cancelled());

    create_device(fixture.device_dir.path());
    assert!(target.ready(&token).await.unwrap_err().is_cancelled());
    assert!(target.ready(&CancellationToken::new()).await.is_ok());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_ready_notices_late_device() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok(String::new()))?;
    let target = fixture.portal.target_unchecked(IQN);

    let device_dir = fixture.device_dir.path().to_path_buf();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        create_device(&device_dir);
    });

    tokio::time::timeout(
        Duration::from_secs(5),
        target.ready(&CancellationToken::new()),
    )
    .await??;
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_logout_is_idempotent() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| {
        Err(failed(args, "iscsiadm: No matching sessions found\n"))
    })?;

    let target = fixture.portal.target_unchecked(IQN);
    target.logout(&CancellationToken::new()).await?;
    target.logout(&CancellationToken::new()).await?;

    assert_eq!(fixture.calls().len(), 2);
    assert_eq!(fixture.calls()[0].last().map(String::as_str), Some("--logout"));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_logout_surfaces_other_failures() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| {
        Err(failed(args, "iscsiadm: initiator reported error (8 - connection timed out)\n"))
    })?;

    let err = fixture
        .portal
        .target_unchecked(IQN)
        .logout(&CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, VolumeError::Logout { .. }));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_logout_honours_cancellation() -> anyhow::Result<()> {
    let fixture = Fixture::new(|_, _| Ok(String::new()))?;
    let token = CancellationToken::new();
    token.cancel();

    let err = fixture
        .portal
        .target_unchecked(IQN)
        .logout(&token)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(fixture.calls().is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_volume_uses_device_path() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, device_dir| {
        if args.contains(&"--login".to_string()) {
            create_device(device_dir);
        }
        Ok(String::new())
    })?;
    let token = CancellationToken::new();
    let target = fixture.portal.target_unchecked(IQN);

    let volume = Volume::iscsi(
        target.clone(),
        0,
        "ext4",
        [MountOpt::options(["noatime"])],
        &token,
    )
    .await?;

    let device = fixture.device_dir.path().join(DEVICE_NAME);
    assert_eq!(volume.kind(), "ext4");
    assert_eq!(volume.fstype(), "ext4");
    assert_eq!(volume.source(), device.display().to_string());

    let oci = volume.oci_mount("/var/lib/redis")?;
    assert_eq!(oci.typ().as_deref(), Some("ext4"));
    assert_eq!(oci.source().as_deref(), Some(device.as_path()));
    assert_eq!(oci.options().as_deref(), Some(&["noatime".to_string()][..]));

    // Resolving rootfs mounts repeats the idempotent login.
    let mounts = volume.mounts(&token).await?;
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].typ, "ext4");
    assert_eq!(mounts[0].source, device.display().to_string());
    assert_eq!(fixture.calls().len(), 2);

    WithTargetLogout::new(target).on_delete(&token).await?;
    assert_eq!(
        fixture.calls().last().and_then(|args| args.last()).map(String::as_str),
        Some("--logout")
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_iscsi_volume_not_created_when_login_fails() -> anyhow::Result<()> {
    let fixture = Fixture::new(|args, _| Err(failed(args, "iscsiadm: No records found\n")))?;

    let result = Volume::iscsi(
        fixture.portal.target_unchecked(IQN),
        0,
        "xfs",
        [],
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(VolumeError::Login { .. })));
    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Fixture {
    fn new(
        handler: impl Fn(&[String], &Path) -> VolumeResult<String> + Send + Sync + 'static,
    ) -> anyhow::Result<Self> {
        let device_dir = tempdir()?;
        let config = IscsiConfig::builder()
            .device_dir(device_dir.path())
            .poll_interval_ms(1)
            .build();

        let calls = Arc::new(Mutex::new(Vec::new()));
        let dir = device_dir.path().to_path_buf();
        let adm = ScriptedAdm {
            calls: Arc::clone(&calls),
            handler: Box::new(move |args| handler(args, &dir)),
        };

        let initiator = Arc::new(Initiator::with_adm(config, adm));
        let portal = initiator.portal("10.0.10.10", None);

        Ok(Self {
            device_dir,
            portal,
            calls,
        })
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

#[async_trait]
impl IscsiAdm for ScriptedAdm {
    async fn run(&self, args: &[String], token: &CancellationToken) -> VolumeResult<String> {
        if token.is_cancelled() {
            return Err(VolumeError::cancelled("iscsiadm"));
        }

        self.calls.lock().unwrap().push(args.to_vec());
        (self.handler)(args)
    }
}

impl fmt::Debug for ScriptedAdm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedAdm").finish_non_exhaustive()
    }
}

//--------------------------------------------------------------------------------------------------
// Functions: Helpers
//--------------------------------------------------------------------------------------------------

fn failed(args: &[String], output: &str) -> VolumeError {
    VolumeError::CommandFailed {
        program: "iscsiadm".to_string(),
        args: args.to_vec(),
        status: "exit status: 15".to_string(),
        output: output.to_string(),
    }
}

fn create_device(device_dir: &Path) {
    std::fs::write(device_dir.join(DEVICE_NAME), b"").unwrap();
}
