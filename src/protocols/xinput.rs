// SPDX-License-Identifier: MIT
//! X11 session using the XInput 2 extension
//!
//! XI2 reports hotplug activity as `XI_HierarchyChanged` events on the root
//! window. The session negotiates XI 2.0, selects those events for all
//! devices and exposes the connection fd so the event loop can wait on it.

use std::os::fd::{AsRawFd, RawFd};

use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::ConnectionError;
use x11rb::protocol::Event;
use x11rb::protocol::xinput::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

use crate::devices::{DeviceId, DeviceInfo, DeviceRole};
use crate::error::{AppError, Result};

use super::{DisplaySession, HierarchyEvent, HierarchyRecord, SessionEvent};

const XI_MAJOR: u16 = 2;
const XI_MINOR: u16 = 0;

/// Live connection to an X server with hierarchy events selected
pub struct XInputSession {
    conn: RustConnection,
}

impl XInputSession {
    /// Connect to `$DISPLAY`, negotiate XI2 and subscribe to hierarchy changes
    pub fn open() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| AppError::DisplayConnectFailed(e.to_string()))?;

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| AppError::DisplayConnectFailed(format!("no screen {screen_num}")))?;

        let present = conn
            .extension_information(xinput::X11_EXTENSION_NAME)
            .map_err(|e| AppError::ProtocolVersionUnsupported(e.to_string()))?;
        if present.is_none() {
            return Err(AppError::ProtocolVersionUnsupported(
                "XInputExtension not available".to_string(),
            ));
        }

        let version = conn
            .xinput_xi_query_version(XI_MAJOR, XI_MINOR)
            .map_err(|e| AppError::ProtocolVersionUnsupported(e.to_string()))?
            .reply()
            .map_err(|e| AppError::ProtocolVersionUnsupported(e.to_string()))?;
        if version.major_version < XI_MAJOR {
            return Err(AppError::ProtocolVersionUnsupported(format!(
                "server supports XI {}.{}, need {XI_MAJOR}.{XI_MINOR}",
                version.major_version, version.minor_version
            )));
        }
        debug!(
            "XInput {}.{} negotiated",
            version.major_version, version.minor_version
        );

        let mask = xinput::EventMask {
            deviceid: xinput::Device::ALL.into(),
            mask: vec![xinput::XIEventMask::HIERARCHY.into()],
        };
        conn.xinput_xi_select_events(root, &[mask])
            .map_err(|e| AppError::SubscriptionFailed(e.to_string()))?
            .check()
            .map_err(|e| AppError::SubscriptionFailed(e.to_string()))?;
        conn.flush()
            .map_err(|e| AppError::SubscriptionFailed(e.to_string()))?;

        info!("Listening for XI2 hierarchy changes on root window 0x{:x}", root);
        Ok(Self { conn })
    }

    fn query_devices(&self, id: DeviceId) -> Result<Vec<xinput::XIDeviceInfo>> {
        let reply = self
            .conn
            .xinput_xi_query_device(id)
            .map_err(|e| AppError::ConnectionClosed(e.to_string()))?
            .reply()
            .map_err(|e| AppError::EventFetchFailed(format!("XIQueryDevice({id}): {e}")))?;
        Ok(reply.infos)
    }
}

fn role(kind: xinput::DeviceType) -> DeviceRole {
    match kind {
        xinput::DeviceType::MASTER_POINTER => DeviceRole::MasterPointer,
        xinput::DeviceType::MASTER_KEYBOARD => DeviceRole::MasterKeyboard,
        xinput::DeviceType::SLAVE_POINTER => DeviceRole::SlavePointer,
        xinput::DeviceType::SLAVE_KEYBOARD => DeviceRole::SlaveKeyboard,
        _ => DeviceRole::FloatingSlave,
    }
}

fn device_info(info: &xinput::XIDeviceInfo) -> DeviceInfo {
    DeviceInfo {
        id: info.deviceid,
        name: String::from_utf8_lossy(&info.name).into_owned(),
        role: role(info.type_),
        enabled: info.enabled,
    }
}

impl From<&xinput::HierarchyEvent> for HierarchyEvent {
    fn from(event: &xinput::HierarchyEvent) -> Self {
        Self {
            flags: u32::from(event.flags),
            records: event
                .infos
                .iter()
                .map(|info| HierarchyRecord {
                    id: info.deviceid,
                    role: role(info.type_),
                    enabled: info.enabled,
                    flags: u32::from(info.flags),
                })
                .collect(),
        }
    }
}

impl DisplaySession for XInputSession {
    fn poll_event(&mut self) -> Result<Option<SessionEvent>> {
        match self.conn.poll_for_event() {
            Ok(None) => Ok(None),
            Ok(Some(Event::XinputHierarchy(event))) => {
                Ok(Some(SessionEvent::Hierarchy(HierarchyEvent::from(&event))))
            }
            Ok(Some(Event::Error(err))) => {
                warn!("X11 error: {:?}", err);
                Ok(Some(SessionEvent::Other))
            }
            Ok(Some(_)) => Ok(Some(SessionEvent::Other)),
            Err(ConnectionError::ParseError(e)) => Err(AppError::EventFetchFailed(e.to_string())),
            Err(e) => Err(AppError::ConnectionClosed(e.to_string())),
        }
    }

    fn device_name(&mut self, id: DeviceId) -> Option<String> {
        match self.query_devices(id) {
            Ok(infos) => infos
                .iter()
                .find(|info| info.deviceid == id)
                .map(|info| device_info(info).name),
            Err(e) => {
                debug!("Device {} no longer queryable: {}", id, e);
                None
            }
        }
    }

    fn list_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        let infos = self.query_devices(xinput::Device::ALL.into())?;
        Ok(infos.iter().map(device_info).collect())
    }
}

impl AsRawFd for XInputSession {
    fn as_raw_fd(&self) -> RawFd {
        self.conn.stream().as_raw_fd()
    }
}
