//! Persisted runtime routing state.
//!
//! A cache of the last known good assignments, keyed by friendly name and
//! re-applied once at startup. Not the source of truth for profiles:
//! entries whose names no longer resolve after a rescan are skipped but
//! kept in storage in case the device or app reappears later.

use crate::audio::Routing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Last-applied global device and per-app routes, by friendly name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    /// Friendly name of the last applied global output device
    #[serde(default)]
    pub global_device: Option<String>,

    /// Application friendly name → endpoint friendly name
    #[serde(default)]
    pub app_routes: BTreeMap<String, String>,
}

/// Durable store for [`RuntimeState`].
pub struct StateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Read the persisted state; missing or malformed files are empty state.
    pub fn load(&self) -> RuntimeState {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return RuntimeState::default(),
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "failed to read runtime state");
                return RuntimeState::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(state) => state,
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "runtime state is malformed");
                RuntimeState::default()
            }
        }
    }

    /// Overwrite the entire persisted state.
    ///
    /// Called after every user-triggered routing action, not on a timer.
    pub fn save(&self, state: &RuntimeState) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let json = match serde_json::to_string_pretty(state) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize runtime state");
                return;
            }
        };
        let tmp = self.path.with_extension("json.tmp");
        let result = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            warn!(file = %self.path.display(), error = %e, "failed to save runtime state");
        }
    }

    /// Re-apply the persisted state against the current scan maps.
    ///
    /// The global device is applied only if its name still resolves in
    /// `outputs`; each app route only if both the app and device names
    /// resolve. Stale entries are skipped, not purged. Returns the loaded
    /// state so the caller can carry it as the current assignment set.
    pub fn load_and_apply(
        &self,
        outputs: &BTreeMap<String, String>,
        apps: &BTreeMap<String, String>,
        routing: &dyn Routing,
    ) -> RuntimeState {
        let state = self.load();

        if let Some(device_name) = &state.global_device {
            match outputs.get(device_name) {
                Some(id) => {
                    info!(device = %device_name, "restoring global output device");
                    routing.set_global_device(id);
                }
                None => {
                    debug!(device = %device_name, "saved global device not present, skipping");
                }
            }
        }

        for (app_name, device_name) in &state.app_routes {
            let (Some(executable), Some(id)) = (apps.get(app_name), outputs.get(device_name))
            else {
                debug!(app = %app_name, device = %device_name, "saved app route not present, skipping");
                continue;
            };
            info!(app = %app_name, device = %device_name, "restoring app route");
            routing.set_app_device(id, executable);
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRouting {
        global: StdMutex<Vec<String>>,
        app: StdMutex<Vec<(String, String)>>,
    }

    impl Routing for RecordingRouting {
        fn set_global_device(&self, endpoint_id: &str) {
            self.global.lock().unwrap().push(endpoint_id.to_string());
        }

        fn set_app_device(&self, endpoint_id: &str, executable_name: &str) {
            self.app
                .lock()
                .unwrap()
                .push((endpoint_id.to_string(), executable_name.to_string()));
        }
    }

    fn maps() -> (BTreeMap<String, String>, BTreeMap<String, String>) {
        let outputs = BTreeMap::from([
            ("Speakers".to_string(), "SPK-ID".to_string()),
            ("Headset".to_string(), "HS-ID".to_string()),
        ]);
        let apps = BTreeMap::from([("My Game".to_string(), "game.exe".to_string())]);
        (outputs, apps)
    }

    fn saved_state() -> RuntimeState {
        RuntimeState {
            global_device: Some("Speakers".to_string()),
            app_routes: BTreeMap::from([("My Game".to_string(), "Headset".to_string())]),
        }
    }

    #[test]
    fn round_trip_applies_global_and_app_routes_once_each() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&saved_state());

        let (outputs, apps) = maps();
        let routing = RecordingRouting::default();
        let restored = store.load_and_apply(&outputs, &apps, &routing);

        assert_eq!(*routing.global.lock().unwrap(), vec!["SPK-ID".to_string()]);
        assert_eq!(
            *routing.app.lock().unwrap(),
            vec![("HS-ID".to_string(), "game.exe".to_string())]
        );
        assert_eq!(restored, saved_state());
    }

    #[test]
    fn absent_device_skips_only_the_app_route() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&saved_state());

        let (mut outputs, apps) = maps();
        outputs.remove("Headset");
        let routing = RecordingRouting::default();
        store.load_and_apply(&outputs, &apps, &routing);

        assert_eq!(*routing.global.lock().unwrap(), vec!["SPK-ID".to_string()]);
        assert!(routing.app.lock().unwrap().is_empty());
    }

    #[test]
    fn skipped_entries_stay_in_storage() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        store.save(&saved_state());

        let routing = RecordingRouting::default();
        store.load_and_apply(&BTreeMap::new(), &BTreeMap::new(), &routing);

        // nothing resolved, nothing applied, nothing purged
        assert!(routing.global.lock().unwrap().is_empty());
        assert_eq!(store.load(), saved_state());
    }

    #[test]
    fn missing_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state.json"));
        assert_eq!(store.load(), RuntimeState::default());
    }

    #[test]
    fn malformed_file_is_empty_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "]]garbage[[").unwrap();
        assert_eq!(StateStore::new(path).load(), RuntimeState::default());
    }
}
