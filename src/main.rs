// SPDX-License-Identifier: MIT
use std::process::ExitCode;

use anyhow::Context;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::watch;

use crate::config::Config;
use crate::handler::HandlerNotifier;
use crate::hotplug::HotplugMonitor;
use crate::protocols::xinput::XInputSession;

#[macro_use]
extern crate tracing;

mod config;
mod devices;
mod error;
mod handler;
mod hotplug;
mod protocols;

/// Name of the per-user config directory and file
pub const APPID: &str = "HelloDevice";

fn setup_logs() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = fmt::layer().with_target(false);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new(format!(
        "warn,{}=info",
        env!("CARGO_CRATE_NAME")
    )));

    #[cfg(feature = "journald")]
    {
        if let Ok(journal_layer) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .with(journal_layer)
                .init();
            return;
        }
    }

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Flip the shutdown channel on SIGINT or SIGTERM
fn watch_signals() -> std::io::Result<watch::Receiver<bool>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => debug!("Received SIGINT"),
            _ = terminate.recv() => debug!("Received SIGTERM"),
        }
        let _ = tx.send(true);
    });

    Ok(rx)
}

async fn run() -> anyhow::Result<()> {
    let config = Config::load().context("No handler command configured")?;
    let script_dir = config::app_config_dir()?;

    let mut session = XInputSession::open().context("XInput setup failed")?;
    let shutdown = watch_signals().context("Failed to install signal handlers")?;

    let notifier = HandlerNotifier::new(config.command.clone(), script_dir);
    let mut monitor = HotplugMonitor::new(notifier, config.max_devices, config.settle_delay());

    let present = monitor
        .report_present(&mut session)
        .context("Failed to list current devices")?;
    info!("{} device(s) present at startup", present);

    hotplug::run(session, &mut monitor, shutdown)
        .await
        .context("Device monitoring stopped")?;
    debug!("{} device(s) known at shutdown", monitor.cache().len());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logs();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
