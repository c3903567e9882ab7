//! `monovol` discovers iSCSI targets, manages sessions and mounts volumes.
//!
//! ## Usage
//!
//! ```bash
//! monovol discover --host 10.0.10.10
//! monovol login --host 10.0.10.10 --iqn iqn.2019.com.example:redis --timeout 30
//! monovol mount iscsi --host 10.0.10.10 --iqn iqn.2019.com.example:redis /mnt/redis
//! monovol mount cifs //fileserver/media /mnt/media --username guest --uid 1000 --gid 1000
//! monovol mount bind /srv/data /mnt/data -o ro
//! monovol unmount /mnt/data
//! monovol logout --host 10.0.10.10 --iqn iqn.2019.com.example:redis
//! ```

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use clap::{CommandFactory, Parser};
use monovolumes::{
    cli::{MonovolArgs, MonovolSubcommand, MountSubcommand, PortalArgs, TargetArgs},
    config::{VolumesConfig, MONOVOLUMES_CONFIG_ENV_VAR},
    iscsi::{Initiator, Portal, Target},
    mount::MountOpt,
    volume::{self, Volume},
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = MonovolArgs::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = load_config(args.config).await?;
    let initiator = Arc::new(Initiator::new(config.get_iscsi().clone()));

    match args.subcommand {
        Some(MonovolSubcommand::Discover { portal, timeout }) => {
            let portal = portal_from(&initiator, &portal);
            let token = cancellation_token(timeout);
            for target in portal.targets(&token).await? {
                println!("{}", target.iqn());
            }
        }
        Some(MonovolSubcommand::Login { target, timeout }) => {
            let target = target_from(&initiator, &target);
            target.login(&cancellation_token(timeout)).await?;
            let lun = *initiator.get_config().get_default_lun();
            println!("{}", target.device_path(lun).display());
        }
        Some(MonovolSubcommand::Logout { target, timeout }) => {
            let target = target_from(&initiator, &target);
            target.logout(&cancellation_token(timeout)).await?;
        }
        Some(MonovolSubcommand::DevicePath { target, lun }) => {
            let target = target_from(&initiator, &target);
            let lun = lun.unwrap_or(*initiator.get_config().get_default_lun());
            println!("{}", target.device_path(lun).display());
        }
        Some(MonovolSubcommand::Mount { volume }) => {
            let (volume, destination) = volume_from(&initiator, volume).await?;
            volume.mount(&destination)?;
            tracing::info!("mounted {} at {}", volume.source(), destination.display());
        }
        Some(MonovolSubcommand::Unmount { destination }) => {
            volume::unmount(&destination)?;
        }
        None => {
            MonovolArgs::command().print_help()?;
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

async fn load_config(path: Option<PathBuf>) -> anyhow::Result<VolumesConfig> {
    let path = path.or_else(|| env::var_os(MONOVOLUMES_CONFIG_ENV_VAR).map(PathBuf::from));
    match path {
        Some(path) => Ok(VolumesConfig::load(path).await?),
        None => Ok(VolumesConfig::default()),
    }
}

/// Returns a token cancelled on Ctrl-C or, when given, after `timeout` seconds.
fn cancellation_token(timeout: Option<u64>) -> CancellationToken {
    let token = CancellationToken::new();

    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if let Some(secs) = timeout {
        let on_timeout = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            on_timeout.cancel();
        });
    }

    token
}

fn portal_from(initiator: &Arc<Initiator>, args: &PortalArgs) -> Portal {
    initiator.portal(&args.host, args.port)
}

fn target_from(initiator: &Arc<Initiator>, args: &TargetArgs) -> Target {
    portal_from(initiator, &args.portal).target_unchecked(&args.iqn)
}

async fn volume_from(
    initiator: &Arc<Initiator>,
    subcommand: MountSubcommand,
) -> anyhow::Result<(Volume, PathBuf)> {
    match subcommand {
        MountSubcommand::Bind {
            source,
            destination,
            options,
        } => Ok((Volume::bind(source, [MountOpt::options(options)]), destination)),
        MountSubcommand::Cifs {
            source,
            destination,
            username,
            password,
            uid,
            gid,
            options,
        } => {
            let mut opts = Vec::new();
            if let Some(username) = username {
                opts.push(MountOpt::username_and_password(
                    username,
                    password.unwrap_or_default(),
                ));
            }
            if let (Some(uid), Some(gid)) = (uid, gid) {
                opts.push(MountOpt::uid_gid(uid, gid));
            }
            opts.push(MountOpt::options(options));
            Ok((Volume::cifs(source, opts), destination))
        }
        MountSubcommand::Iscsi {
            target,
            destination,
            lun,
            fstype,
            options,
            timeout,
        } => {
            let target = target_from(initiator, &target);
            let lun = lun.unwrap_or(*initiator.get_config().get_default_lun());
            let volume = Volume::iscsi(
                target,
                lun,
                fstype,
                [MountOpt::options(options)],
                &cancellation_token(timeout),
            )
            .await?;
            Ok((volume, destination))
        }
    }
}
