// SPDX-License-Identifier: MIT
use crate::devices::{DeviceNameCache, Notification, Transition};
use crate::error::Result;
use crate::protocols::DisplaySession;

/// Report every enabled physical device as present and seed the name cache
///
/// The cache is reset first, so enumerating again (e.g. after a restart of
/// the session) only reflects what the server lists right now. Devices that
/// are disabled at startup are neither cached nor reported.
pub fn process_current_devices<S: DisplaySession + ?Sized>(
    session: &mut S,
    cache: &mut DeviceNameCache,
) -> Result<Vec<Notification>> {
    let devices = session.list_devices()?;
    cache.clear();

    info!("=== START ENUMERATE ({} device(s) listed) ===", devices.len());

    let mut present = Vec::new();
    for device in devices {
        if device.role.is_master() {
            trace!("Skipping master device {} ({})", device.id, device.name);
            continue;
        }
        if !device.enabled {
            debug!("Skipping disabled device {} ({})", device.id, device.name);
            continue;
        }

        if let Err(e) = cache.store(device.id, device.name.clone()) {
            warn!("Not caching name of device {}: {}", device.id, e);
        }
        present.push(Notification::new(Transition::Present, device.name, device.id));
    }

    info!("=== END ENUMERATE ({} device(s) present) ===", present.len());
    Ok(present)
}
