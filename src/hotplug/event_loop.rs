// SPDX-License-Identifier: MIT
//! Main monitoring loop
//!
//! Waits on the display connection and the shutdown channel together. When the
//! connection becomes readable every buffered event is drained before waiting
//! again; shutdown is only observed between drains, so a report in progress
//! (including its settle delay) always completes.

use tokio::io::Interest;
use tokio::io::unix::AsyncFd;
use tokio::sync::watch;

use crate::error::Result;
use crate::handler::Notifier;
use crate::protocols::{DisplaySession, SessionEvent};

use super::HotplugMonitor;

/// Run until `shutdown` turns `true` (or its sender goes away)
///
/// Returns an error only when the display connection is lost.
pub async fn run<S, N>(
    session: S,
    monitor: &mut HotplugMonitor<N>,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()>
where
    S: DisplaySession,
    N: Notifier,
{
    let mut connection = AsyncFd::with_interest(session, Interest::READABLE)?;

    // Replies read during setup may have pulled events into the buffer already
    drain(connection.get_mut(), monitor).await?;

    info!("Device hotplug monitoring started");

    loop {
        tokio::select! {
            biased;

            _ = shutdown_requested(&mut shutdown) => {
                info!("Shutdown requested, stopping device monitoring");
                return Ok(());
            }
            ready = connection.readable_mut() => {
                let mut guard = ready?;
                drain(guard.get_inner_mut(), monitor).await?;
                guard.clear_ready();
            }
        }
    }
}

async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    // A dropped sender also means nobody can ask us to keep going
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Process every event currently buffered on the connection
async fn drain<S, N>(session: &mut S, monitor: &mut HotplugMonitor<N>) -> Result<()>
where
    S: DisplaySession,
    N: Notifier,
{
    loop {
        match session.poll_event() {
            Ok(Some(SessionEvent::Hierarchy(event))) => {
                monitor.handle_hierarchy(&event, session).await;
            }
            Ok(Some(SessionEvent::Other)) => trace!("Skipping non-hierarchy event"),
            Ok(None) => return Ok(()),
            Err(e) if e.is_transient() => warn!("Ignoring event: {}", e),
            Err(e) => return Err(e),
        }
    }
}
