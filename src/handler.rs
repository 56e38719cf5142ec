// SPDX-License-Identifier: MIT
//! Handler invocation
//!
//! Each transition runs the configured command as
//! `command "-t <type>" "-i <id>" "<name>"` from the home directory, with the
//! per-user config dir prepended to `PATH` so handler scripts can live next
//! to the config file. The child is never waited on.

use std::ffi::OsString;
use std::path::PathBuf;

use tokio::process::Command;

use crate::devices::Notification;
use crate::error::{AppError, Result};

/// Receives every device transition the monitor reports
pub trait Notifier {
    fn notify(&mut self, notification: &Notification);
}

/// Runs the user's handler program for each transition
#[derive(Debug, Clone)]
pub struct HandlerNotifier {
    command: String,
    /// Directory prepended to the handler's `PATH`
    script_dir: PathBuf,
    working_dir: Option<PathBuf>,
}

impl HandlerNotifier {
    pub fn new(command: String, script_dir: PathBuf) -> Self {
        Self {
            command,
            script_dir,
            working_dir: dirs::home_dir(),
        }
    }

    fn args(notification: &Notification) -> [String; 3] {
        [
            format!("-t {}", notification.transition),
            format!("-i {}", notification.id),
            notification.name.clone(),
        ]
    }

    fn search_path(&self) -> OsString {
        let mut path = OsString::from(&self.script_dir);
        path.push("/:");
        if let Some(current) = std::env::var_os("PATH") {
            path.push(current);
        }
        path
    }

    fn spawn(&self, notification: &Notification) -> Result<()> {
        let mut command = Command::new(&self.command);
        command.args(Self::args(notification)).env("PATH", self.search_path());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| AppError::HandlerSpawnFailed {
            command: self.command.clone(),
            source,
        })?;
        debug!("Spawned {} (pid {:?})", self.command, child.id());
        Ok(())
    }
}

impl Notifier for HandlerNotifier {
    fn notify(&mut self, notification: &Notification) {
        info!(
            "{} ({}) {}",
            notification.name, notification.id, notification.transition
        );

        if let Err(e) = self.spawn(notification) {
            error!("{}", e);
        }
    }
}

/// Forwards notifications over a channel instead of running anything
#[cfg(test)]
pub struct ChannelNotifier(tokio::sync::mpsc::UnboundedSender<Notification>);

#[cfg(test)]
impl ChannelNotifier {
    pub fn new() -> (Self, tokio::sync::mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

#[cfg(test)]
impl Notifier for ChannelNotifier {
    fn notify(&mut self, notification: &Notification) {
        let _ = self.0.send(notification.clone());
    }
}
