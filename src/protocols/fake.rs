// SPDX-License-Identifier: MIT
//! In-memory display session for tests
//!
//! Events are queued in memory; a Unix socket pair stands in for the X
//! connection so the event loop has a real fd to wait on. Queuing an event
//! writes a byte to the peer end, draining reads it back.

use std::collections::{HashMap, VecDeque};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::sync::{Arc, Mutex};

use crate::devices::{DeviceId, DeviceInfo, DeviceRole};
use crate::error::{AppError, Result};

use super::{DisplaySession, HierarchyEvent, HierarchyRecord, SessionEvent, flags};

type Queue = Arc<Mutex<VecDeque<Result<SessionEvent>>>>;

pub struct FakeSession {
    socket: UnixStream,
    feed: FakeFeed,
    devices: Vec<DeviceInfo>,
    live_names: HashMap<DeviceId, String>,
}

/// Queues events into a [`FakeSession`] that has already been moved away
#[derive(Clone)]
pub struct FakeFeed {
    queue: Queue,
    peer: Arc<UnixStream>,
}

impl FakeFeed {
    pub fn push(&self, event: Result<SessionEvent>) {
        self.queue.lock().unwrap().push_back(event);
        (&*self.peer).write_all(&[1]).unwrap();
    }

    pub fn push_hierarchy(&self, event: HierarchyEvent) {
        self.push(Ok(SessionEvent::Hierarchy(event)));
    }
}

impl FakeSession {
    pub fn new() -> Self {
        let (socket, peer) = UnixStream::pair().unwrap();
        socket.set_nonblocking(true).unwrap();
        Self {
            socket,
            feed: FakeFeed {
                queue: Arc::default(),
                peer: Arc::new(peer),
            },
            devices: Vec::new(),
            live_names: HashMap::new(),
        }
    }

    pub fn feed(&self) -> FakeFeed {
        self.feed.clone()
    }

    pub fn with_devices(devices: Vec<DeviceInfo>) -> Self {
        let mut session = Self::new();
        session.devices = devices;
        session
    }

    /// Name the server reports for `id` when asked directly
    pub fn set_live_name(&mut self, id: DeviceId, name: &str) {
        self.live_names.insert(id, name.to_string());
    }

    pub fn push_hierarchy(&self, event: HierarchyEvent) {
        self.feed.push_hierarchy(event);
    }

    fn drain_socket(&mut self) {
        let mut buf = [0u8; 64];
        loop {
            match self.socket.read(&mut buf) {
                Ok(0) => break,
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => panic!("fake session socket: {e}"),
            }
        }
    }
}

impl DisplaySession for FakeSession {
    fn poll_event(&mut self) -> Result<Option<SessionEvent>> {
        let next = self.feed.queue.lock().unwrap().pop_front();
        match next {
            Some(event) => event.map(Some),
            None => {
                self.drain_socket();
                Ok(None)
            }
        }
    }

    fn device_name(&mut self, id: DeviceId) -> Option<String> {
        self.live_names.get(&id).cloned()
    }

    fn list_devices(&mut self) -> Result<Vec<DeviceInfo>> {
        Ok(self.devices.clone())
    }
}

impl AsRawFd for FakeSession {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

pub fn device(id: DeviceId, name: &str, role: DeviceRole, enabled: bool) -> DeviceInfo {
    DeviceInfo {
        id,
        name: name.to_string(),
        role,
        enabled,
    }
}

pub fn record(id: DeviceId, role: DeviceRole, mask: u32) -> HierarchyRecord {
    HierarchyRecord {
        id,
        role,
        enabled: mask & flags::DEVICE_ENABLED != 0,
        flags: mask,
    }
}

/// Event whose top-level flags are the union of its records
pub fn hierarchy(records: Vec<HierarchyRecord>) -> HierarchyEvent {
    HierarchyEvent {
        flags: records.iter().fold(0, |acc, r| acc | r.flags),
        records,
    }
}

pub fn fetch_error() -> Result<SessionEvent> {
    Err(AppError::EventFetchFailed("truncated generic event".to_string()))
}

pub fn connection_closed() -> Result<SessionEvent> {
    Err(AppError::ConnectionClosed("unexpected end of file".to_string()))
}
