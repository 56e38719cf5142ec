// SPDX-License-Identifier: MIT
//! Input device hotplug detection
//!
//! Devices present at startup are reported once, then XI2 hierarchy changes
//! are turned into added/removed notifications until shutdown is requested.

mod classifier;
mod enumeration;
mod event_loop;

use std::time::Duration;

pub use classifier::classify;
pub use enumeration::process_current_devices;
pub use event_loop::run;

use crate::devices::DeviceNameCache;
use crate::error::Result;
use crate::handler::Notifier;
use crate::protocols::{DisplaySession, HierarchyEvent};

/// State carried across events: the device name cache and where to report
pub struct HotplugMonitor<N> {
    cache: DeviceNameCache,
    notifier: N,
    /// Wait before each added/removed report so the desktop can configure the
    /// device first and the handler sees its final state
    settle_delay: Duration,
}

impl<N: Notifier> HotplugMonitor<N> {
    pub fn new(notifier: N, max_devices: usize, settle_delay: Duration) -> Self {
        Self {
            cache: DeviceNameCache::new(max_devices),
            notifier,
            settle_delay,
        }
    }

    pub fn cache(&self) -> &DeviceNameCache {
        &self.cache
    }

    /// Report the devices the server currently has; returns how many
    pub fn report_present<S: DisplaySession + ?Sized>(&mut self, session: &mut S) -> Result<usize> {
        let present = process_current_devices(session, &mut self.cache)?;
        for notification in &present {
            self.notifier.notify(notification);
        }
        Ok(present.len())
    }

    /// Classify one hierarchy event and report its transitions
    ///
    /// The settle delay is awaited inline, so nothing else is processed
    /// until every transition of this event has been reported.
    pub async fn handle_hierarchy<S: DisplaySession + ?Sized>(
        &mut self,
        event: &HierarchyEvent,
        session: &mut S,
    ) {
        for notification in classify(event, &mut self.cache, session) {
            if !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }
            self.notifier.notify(&notification);
        }
    }
}
