//! Router application state and user-triggered orchestration.
//!
//! Owns the directory, the stores and the executor, and carries the
//! current scan snapshot plus the last-applied assignments. Every
//! user-triggered routing action persists the runtime state immediately.

use crate::audio::{DeviceDirectory, Direction, Routing, RoutingExecutor, ScanSnapshot};
use crate::config::AppPaths;
use crate::platform::StartupRegistration;
use crate::profiles::ProfileStore;
use crate::state::{RuntimeState, StateStore};
use std::sync::Arc;
use tracing::info;

/// Main application state.
pub struct RouterApp {
    directory: DeviceDirectory,
    executor: Arc<RoutingExecutor>,
    profiles: Arc<ProfileStore>,
    state_store: StateStore,

    /// Endpoints and applications from the most recent scan
    snapshot: ScanSnapshot,

    /// Current assignments, mirrored to the state store on every change
    state: RuntimeState,
}

impl RouterApp {
    pub fn new(paths: &AppPaths) -> Self {
        let executor = Arc::new(RoutingExecutor::new(&paths.tool));
        Self {
            directory: DeviceDirectory::new(Arc::clone(&executor), &paths.scan_file),
            executor,
            profiles: Arc::new(ProfileStore::new(&paths.profiles_file)),
            state_store: StateStore::new(&paths.state_file),
            snapshot: ScanSnapshot::default(),
            state: RuntimeState::default(),
        }
    }

    /// Rescan endpoints and applications.
    pub fn refresh(&mut self) {
        self.snapshot = self.directory.refresh();
        info!(
            outputs = self.snapshot.outputs.len(),
            inputs = self.snapshot.inputs.len(),
            apps = self.snapshot.apps.len(),
            "device scan complete"
        );
    }

    pub fn snapshot(&self) -> &ScanSnapshot {
        &self.snapshot
    }

    pub fn profiles(&self) -> &Arc<ProfileStore> {
        &self.profiles
    }

    pub fn executor(&self) -> &Arc<RoutingExecutor> {
        &self.executor
    }

    /// Friendly name of the current system default for `direction`.
    pub fn current_default(&self, direction: Direction) -> Option<String> {
        self.directory.current_default(direction)
    }

    /// Re-apply the persisted assignments against the current snapshot.
    pub fn restore_routes(&mut self) {
        self.state = self.state_store.load_and_apply(
            &self.snapshot.outputs,
            &self.snapshot.apps,
            self.executor.as_ref(),
        );
    }

    /// Route the system output to the named device and persist it.
    ///
    /// `false` when the name does not resolve in the current scan.
    pub fn set_global_output(&mut self, device_name: &str) -> bool {
        let Some(id) = self.snapshot.outputs.get(device_name) else {
            return false;
        };
        self.executor.set_global_device(id);
        self.state.global_device = Some(device_name.to_string());
        self.state_store.save(&self.state);
        true
    }

    /// Route the system input to the named capture device.
    pub fn set_global_input(&mut self, device_name: &str) -> bool {
        let Some(id) = self.snapshot.inputs.get(device_name) else {
            return false;
        };
        self.executor.set_global_device(id);
        true
    }

    /// Route one application's audio to the named device and persist it.
    ///
    /// The device name may resolve to either direction.
    pub fn set_app_route(&mut self, app_name: &str, device_name: &str) -> bool {
        let Some(executable) = self.snapshot.apps.get(app_name) else {
            return false;
        };
        let Some(id) = self
            .snapshot
            .outputs
            .get(device_name)
            .or_else(|| self.snapshot.inputs.get(device_name))
        else {
            return false;
        };
        self.executor.set_app_device(id, executable);
        self.state
            .app_routes
            .insert(app_name.to_string(), device_name.to_string());
        self.state_store.save(&self.state);
        true
    }

    /// Single-app save shortcut: remember the device for an executable so
    /// the foreground watcher can auto-route it.
    pub fn save_app_auto_profile(&self, app_name: &str, device_name: &str) -> bool {
        let Some(executable) = self.snapshot.apps.get(app_name) else {
            return false;
        };
        let Some(id) = self
            .snapshot
            .outputs
            .get(device_name)
            .or_else(|| self.snapshot.inputs.get(device_name))
        else {
            return false;
        };
        self.profiles.set_direct(executable, id);
        true
    }

    /// Apply a stored profile as a batch of per-app routes.
    pub fn apply_profile(&self, name: &str) {
        let executor = &self.executor;
        self.profiles
            .apply(name, |endpoint_id, executable| {
                executor.set_app_device(endpoint_id, executable)
            });
    }

    /// Toggle mute on the current default output.
    pub fn toggle_mute(&self) {
        self.executor.toggle_mute();
    }

    /// Flip run-at-login registration; returns the new enabled state.
    pub fn toggle_autostart(&self) -> bool {
        let registration = StartupRegistration::new();
        let target = !registration.is_enabled();
        if registration.set_enabled(target) {
            target
        } else {
            registration.is_enabled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // The export is pre-written and the tool path left dangling: the
    // executor's export call fails (logged) and the directory parses the
    // file that is already there.
    fn app_with_scan(dir: &TempDir) -> RouterApp {
        let paths = AppPaths::in_dir(dir.path());
        std::fs::write(
            &paths.scan_file,
            "Name,Type,Direction,Device Name,Item ID,Process Path\n\
             Speakers,Device,Render,Speakers,SPK-ID,\n\
             Headset,Device,Render,Headset,HS-ID,\n\
             Mic,Device,Capture,Desk Mic,MIC-ID,\n\
             My Game,Application,Render,,,C:\\Games\\game.exe\n",
        )
        .unwrap();

        let mut app = RouterApp::new(&paths);
        app.refresh();
        app
    }

    #[test]
    fn refresh_classifies_the_scan() {
        let dir = TempDir::new().unwrap();
        let app = app_with_scan(&dir);

        assert_eq!(app.snapshot().outputs.len(), 2);
        assert_eq!(app.snapshot().inputs.len(), 1);
        assert_eq!(
            app.snapshot().apps.get("My Game").map(String::as_str),
            Some("game.exe")
        );
    }

    #[test]
    fn global_output_change_persists_runtime_state() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_scan(&dir);

        assert!(app.set_global_output("Speakers"));

        let state = StateStore::new(dir.path().join("state.json")).load();
        assert_eq!(state.global_device.as_deref(), Some("Speakers"));
    }

    #[test]
    fn app_route_change_persists_runtime_state() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_scan(&dir);

        assert!(app.set_app_route("My Game", "Headset"));

        let state = StateStore::new(dir.path().join("state.json")).load();
        assert_eq!(
            state.app_routes.get("My Game").map(String::as_str),
            Some("Headset")
        );
    }

    #[test]
    fn unresolved_names_route_nothing() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_scan(&dir);

        assert!(!app.set_global_output("Ghost Device"));
        assert!(!app.set_app_route("Ghost App", "Speakers"));
        assert!(!app.set_app_route("My Game", "Ghost Device"));
    }

    #[test]
    fn auto_profile_shortcut_stores_a_direct_profile() {
        let dir = TempDir::new().unwrap();
        let app = app_with_scan(&dir);

        assert!(app.save_app_auto_profile("My Game", "Headset"));
        assert_eq!(app.profiles().get_direct("game.exe").as_deref(), Some("HS-ID"));
    }
}
