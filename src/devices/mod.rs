// SPDX-License-Identifier: MIT
//! Input device model shared by the session, classifier and handler

mod cache;

pub use cache::DeviceNameCache;

/// XInput device identifier
pub type DeviceId = u16;

/// Role a device plays in the XInput device hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRole {
    /// Virtual pointer aggregating attached physical pointers
    MasterPointer,
    /// Virtual keyboard aggregating attached physical keyboards
    MasterKeyboard,
    SlavePointer,
    SlaveKeyboard,
    /// Physical device not attached to any master
    FloatingSlave,
}

impl DeviceRole {
    /// Master devices are virtual and never reported
    pub fn is_master(self) -> bool {
        matches!(self, DeviceRole::MasterPointer | DeviceRole::MasterKeyboard)
    }
}

/// A device as listed by the display server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub id: DeviceId,
    pub name: String,
    pub role: DeviceRole,
    pub enabled: bool,
}

/// What happened to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Added,
    Removed,
    /// Already there when the monitor started
    Present,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Added => "added",
            Transition::Removed => "removed",
            Transition::Present => "present",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One device transition to hand to the notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub transition: Transition,
    /// Empty when the device vanished before its name was ever known
    pub name: String,
    pub id: DeviceId,
}

impl Notification {
    pub fn new(transition: Transition, name: impl Into<String>, id: DeviceId) -> Self {
        Self {
            transition,
            name: name.into(),
            id,
        }
    }
}
