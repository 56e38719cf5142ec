// SPDX-License-Identifier: MIT
//! Turns hierarchy-changed events into added/removed transitions

use crate::devices::{DeviceNameCache, Notification, Transition};
use crate::protocols::{DisplaySession, HierarchyEvent, flags};

/// Work out which physical devices were enabled or disabled by `event`
///
/// Events whose top-level flags carry neither `DeviceEnabled` nor
/// `DeviceDisabled` report nothing. Names come from the cache when possible,
/// otherwise from a live query whose answer is cached for the matching
/// removal. A `SlaveRemoved` record always drops the cached name, after the
/// record itself has been reported.
pub fn classify<S: DisplaySession + ?Sized>(
    event: &HierarchyEvent,
    cache: &mut DeviceNameCache,
    session: &mut S,
) -> Vec<Notification> {
    let mut notifications = Vec::new();

    let reportable = event.has(flags::DEVICE_ENABLED | flags::DEVICE_DISABLED);
    if !reportable {
        trace!("No enable/disable in hierarchy event ({})", flags::describe(event.flags));
    }

    for record in &event.records {
        let id = record.id;

        if reportable
            && record.has(flags::DEVICE_ENABLED | flags::DEVICE_DISABLED)
            && !record.role.is_master()
        {
            let name = match cache.lookup(id) {
                Some(name) => name.to_string(),
                None => match session.device_name(id) {
                    Some(name) => {
                        if let Err(e) = cache.store(id, name.clone()) {
                            warn!("Not caching name of device {}: {}", id, e);
                        }
                        name
                    }
                    None => {
                        warn!("No name known for device {}", id);
                        String::new()
                    }
                },
            };

            let transition = if record.has(flags::DEVICE_ENABLED) {
                Transition::Added
            } else {
                Transition::Removed
            };
            debug!(
                "Device {} ({}) {} [{}, enabled: {}]",
                id,
                name,
                transition,
                flags::describe(record.flags),
                record.enabled
            );
            notifications.push(Notification::new(transition, name, id));
        }

        if record.has(flags::SLAVE_REMOVED) {
            if let Some(name) = cache.evict(id) {
                debug!("Forgot device {} ({})", id, name);
            }
        }
    }

    notifications
}
