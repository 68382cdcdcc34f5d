//! dockwatch: watches the local container engine's inventory (containers,
//! images, networks, volumes) and notifies external messaging endpoints
//! about changes.
//!
//! Each poll cycle fetches a fresh snapshot per entity class, diffs it
//! against the last stored one, renders the classified changes into
//! notification lines and fans them out to every enabled transport. The new
//! snapshot replaces the stored one only after a diff was computed and
//! dispatched, so state survives restarts without replaying old changes.

use std::path::PathBuf;

use crate::config::Settings;
use crate::docker::{DockerClient, SnapshotProvider};
use crate::entity::EntityClass;
use crate::error::ResultOkLogExt;
use crate::notify::{Dispatcher, Message};
use crate::scheduler::Scheduler;

pub mod config;
pub mod diff;
pub mod docker;
pub mod entity;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod store;

/// Runs the dockwatch application.
///
/// Loads the settings document (`DOCKWATCH_CONFIG`, default `config.yml`),
/// opens the snapshot store (`DOCKWATCH_STATE_DIR`, default
/// `<tmp>/dockwatch`), connects to the engine, announces startup on every
/// enabled transport and enters the poll loop.
///
/// # Errors
///
/// Startup errors are fatal: a missing or malformed settings document, an
/// unusable state directory, or no constructible engine endpoint. A stopped
/// engine or an unreachable transport is not fatal; those are retried or
/// skipped per tick.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var_os("DOCKWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.yml"));
    let settings = Settings::load(&config_path)?;
    log::debug!("loaded settings from {}", config_path.display());

    let state_dir = std::env::var_os("DOCKWATCH_STATE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("dockwatch"));
    let store = store::FileStore::new(state_dir)?;

    let host = hostname();
    log::debug!("host label: {host}");

    let provider = DockerClient::connect()?;
    let dispatcher = Dispatcher::from_settings(&settings)?;
    if dispatcher.is_empty() {
        log::warn!("no transports enabled, changes will only be logged");
    }

    startup_notification(&provider, &dispatcher, &host, &settings).await;

    let scheduler = Scheduler::new(provider, store, dispatcher, host, settings.interval());
    scheduler.run().await;
    Ok(())
}

/// Announces host identity, poll interval, enabled transports and the
/// current inventory counts. Count fetches are best-effort; a stopped engine
/// reports zeroes rather than failing startup.
async fn startup_notification(
    provider: &DockerClient,
    dispatcher: &Dispatcher,
    host: &str,
    settings: &Settings,
) {
    let mut counts = Vec::with_capacity(EntityClass::ALL.len());
    for class in EntityClass::ALL {
        let count = provider
            .fetch(class)
            .await
            .ok_log()
            .map(|snapshot| snapshot.len())
            .unwrap_or(0);
        counts.push(format!("{count} {class}"));
    }

    let transports = settings.enabled_transports();
    let body = format!(
        "inventory monitor started: check period {} sec.\ntransports: {}\n{}",
        settings.interval_secs,
        if transports.is_empty() {
            "none".to_owned()
        } else {
            transports.join(", ")
        },
        counts.join(", "),
    );
    log::info!("{}", body.replace('\n', "; "));
    dispatcher
        .send(&Message::new(format!("*{host}* (docker)"), body))
        .await;
}

/// The host label embedded in every notification header.
fn hostname() -> String {
    let name = std::fs::read_to_string("/etc/hostname")
        .or_else(|_| std::fs::read_to_string("/proc/sys/kernel/hostname"))
        .map(|raw| raw.trim().to_owned())
        .unwrap_or_default();
    if name.is_empty() {
        "unknown-host".to_owned()
    } else {
        name
    }
}
