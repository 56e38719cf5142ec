// SPDX-License-Identifier: MIT
//! Display server sessions
//!
//! A session owns the connection to the display server and its subscription
//! to device hierarchy changes. The hotplug logic only talks to the
//! [`DisplaySession`] trait so it can be driven without a running X server.

pub mod xinput;

#[cfg(test)]
pub mod fake;

use std::os::fd::AsRawFd;

use crate::devices::{DeviceId, DeviceInfo, DeviceRole};
use crate::error::Result;

/// Hierarchy flag bits, as defined by the XInput 2 protocol
pub mod flags {
    pub const MASTER_ADDED: u32 = 1 << 0;
    pub const MASTER_REMOVED: u32 = 1 << 1;
    pub const SLAVE_ADDED: u32 = 1 << 2;
    pub const SLAVE_REMOVED: u32 = 1 << 3;
    pub const SLAVE_ATTACHED: u32 = 1 << 4;
    pub const SLAVE_DETACHED: u32 = 1 << 5;
    pub const DEVICE_ENABLED: u32 = 1 << 6;
    pub const DEVICE_DISABLED: u32 = 1 << 7;

    const NAMES: [(u32, &str); 8] = [
        (MASTER_ADDED, "MasterAdded"),
        (MASTER_REMOVED, "MasterRemoved"),
        (SLAVE_ADDED, "SlaveAdded"),
        (SLAVE_REMOVED, "SlaveRemoved"),
        (SLAVE_ATTACHED, "SlaveAttached"),
        (SLAVE_DETACHED, "SlaveDetached"),
        (DEVICE_ENABLED, "DeviceEnabled"),
        (DEVICE_DISABLED, "DeviceDisabled"),
    ];

    /// Human-readable list of the bits set in `mask`, for logs
    pub fn describe(mask: u32) -> String {
        let names: Vec<_> = NAMES
            .iter()
            .filter(|(bit, _)| mask & bit != 0)
            .map(|(_, name)| *name)
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join("|")
        }
    }
}

/// Per-device record of a hierarchy change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyRecord {
    pub id: DeviceId,
    pub role: DeviceRole,
    pub enabled: bool,
    pub flags: u32,
}

impl HierarchyRecord {
    pub fn has(&self, mask: u32) -> bool {
        self.flags & mask != 0
    }
}

/// A hierarchy-changed notification from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyEvent {
    /// Union of all record flags
    pub flags: u32,
    pub records: Vec<HierarchyRecord>,
}

impl HierarchyEvent {
    pub fn has(&self, mask: u32) -> bool {
        self.flags & mask != 0
    }
}

/// Something read off the display connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Hierarchy(HierarchyEvent),
    /// Any other event; the monitor has no use for it
    Other,
}

/// Connection to a display server that reports input hierarchy changes
///
/// The raw fd becomes readable whenever new events may be pending.
pub trait DisplaySession: AsRawFd {
    /// Fetch the next buffered event without blocking
    fn poll_event(&mut self) -> Result<Option<SessionEvent>>;

    /// Ask the server for a device's current name
    fn device_name(&mut self, id: DeviceId) -> Option<String>;

    /// List every device the server currently knows
    fn list_devices(&mut self) -> Result<Vec<DeviceInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_flags() {
        assert_eq!(flags::describe(0), "none");
        assert_eq!(
            flags::describe(flags::DEVICE_DISABLED | flags::SLAVE_REMOVED),
            "SlaveRemoved|DeviceDisabled"
        );
        assert_eq!(flags::describe(flags::MASTER_ADDED), "MasterAdded");
    }

    #[test]
    fn test_record_flags() {
        let record = HierarchyRecord {
            id: 11,
            role: DeviceRole::SlavePointer,
            enabled: true,
            flags: flags::SLAVE_ADDED | flags::SLAVE_ATTACHED,
        };
        assert!(record.has(flags::SLAVE_ADDED));
        assert!(!record.has(flags::DEVICE_ENABLED | flags::DEVICE_DISABLED));
    }
}
