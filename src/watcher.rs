//! Foreground watcher ("the Brain").
//!
//! Polls the executable owning the foreground window and, on a change,
//! looks up a direct profile named after that executable and routes the
//! app's audio to it. Two states: Idle (auto-switch off) and Watching,
//! toggled through the handle with no side effect beyond the flag itself.
//!
//! Watcher failures are never fatal to the host process; an indeterminate
//! foreground owner (process exited, access denied) is an inert tick.

use crate::audio::Routing;
use crate::platform;
use crate::profiles::ProfileStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// Fixed polling cadence; staleness of at most one interval is tolerable.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Per-run watcher state, owned by the poll loop and reset each process run.
#[derive(Debug, Default)]
pub struct ForegroundWatcher {
    last_executable: Option<String>,
}

impl ForegroundWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// One poll tick.
    ///
    /// `foreground` is the executable owning the current foreground window,
    /// or `None` when indeterminate; `None` leaves the remembered
    /// executable untouched. An unchanged executable does no lookup and no
    /// routing call, so one process staying foregrounded costs nothing.
    pub fn tick(
        &mut self,
        foreground: Option<String>,
        profiles: &ProfileStore,
        routing: &dyn Routing,
    ) {
        let Some(executable) = foreground else {
            return;
        };
        if self.last_executable.as_deref() == Some(executable.as_str()) {
            return;
        }
        self.last_executable = Some(executable.clone());

        if let Some(endpoint_id) = profiles.get_direct(&executable) {
            debug!(executable = %executable, endpoint_id = %endpoint_id, "foreground changed, auto-routing");
            routing.set_app_device(&endpoint_id, &executable);
        }
    }
}

/// Control handle for the watcher loop.
pub struct WatcherHandle {
    enabled: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl WatcherHandle {
    /// Toggle between Idle and Watching; instantaneous, no other side
    /// effect.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        info!(enabled, "foreground auto-switch toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Block on the watcher thread (it runs for the life of the process).
    pub fn join(self) {
        let _ = self.thread.join();
    }
}

/// Start the poll loop on its own thread, initially Idle.
pub fn spawn<R>(profiles: Arc<ProfileStore>, routing: Arc<R>) -> std::io::Result<WatcherHandle>
where
    R: Routing + Send + Sync + 'static,
{
    let enabled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&enabled);

    let thread = thread::Builder::new()
        .name("foreground-watcher".into())
        .spawn(move || {
            let mut watcher = ForegroundWatcher::new();
            loop {
                if flag.load(Ordering::Relaxed) {
                    watcher.tick(
                        platform::foreground_executable(),
                        &profiles,
                        routing.as_ref(),
                    );
                }
                thread::sleep(POLL_INTERVAL);
            }
        })?;

    Ok(WatcherHandle { enabled, thread })
}
