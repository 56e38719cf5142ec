// SPDX-License-Identifier: MIT
//! Device name cache
//!
//! Removal events don't carry the device name and by the time they arrive the
//! server can no longer be asked for it, so names are remembered here from the
//! moment a device is first seen until the server reports it as removed.

use crate::error::{AppError, Result};

use super::DeviceId;

/// Bounded map from device id to last known name, indexed directly by id
#[derive(Debug, Clone)]
pub struct DeviceNameCache {
    names: Vec<Option<String>>,
}

impl DeviceNameCache {
    /// Create a cache able to hold ids `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Self {
            names: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.names.len()
    }

    /// Number of devices currently known
    pub fn len(&self) -> usize {
        self.names.iter().filter(|name| name.is_some()).count()
    }

    pub fn lookup(&self, id: DeviceId) -> Option<&str> {
        self.names.get(usize::from(id))?.as_deref()
    }

    /// Remember `name` for `id`, replacing whatever was there
    ///
    /// Ids beyond the capacity are rejected and leave the cache untouched.
    pub fn store(&mut self, id: DeviceId, name: impl Into<String>) -> Result<()> {
        let capacity = self.capacity();
        let slot = self
            .names
            .get_mut(usize::from(id))
            .ok_or(AppError::DeviceIdOutOfRange { id, capacity })?;
        *slot = Some(name.into());
        Ok(())
    }

    /// Forget `id`, returning the name it had
    pub fn evict(&mut self, id: DeviceId) -> Option<String> {
        self.names.get_mut(usize::from(id))?.take()
    }

    pub fn clear(&mut self) {
        self.names.iter_mut().for_each(|slot| *slot = None);
    }
}
