//! Global profile hotkeys.
//!
//! Ctrl+Alt+1, 2 and 3 apply the three base profiles as per-app routing
//! batches. The slot→profile mapping and the press handler are pure so
//! they are testable without the OS hotkey machinery.

use crate::audio::Routing;
use crate::platform;
use crate::profiles::{ProfileStore, BASE_PROFILES};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::info;

/// Base profile bound to hotkey slot `slot` (Ctrl+Alt+1 is slot 0).
pub fn profile_for_slot(slot: usize) -> Option<&'static str> {
    BASE_PROFILES.get(slot).copied()
}

fn handle_press<R: Routing>(slot: usize, profiles: &ProfileStore, routing: &R) {
    let Some(name) = profile_for_slot(slot) else {
        return;
    };
    info!(profile = name, "profile hotkey pressed");
    profiles.apply(name, |endpoint_id, executable| {
        routing.set_app_device(endpoint_id, executable)
    });
}

/// Start the hotkey listener on its own thread.
///
/// The thread blocks in the OS message loop for the life of the process;
/// the handle is returned for symmetry but never joined in practice.
pub fn spawn<R>(profiles: Arc<ProfileStore>, routing: Arc<R>) -> std::io::Result<JoinHandle<()>>
where
    R: Routing + Send + Sync + 'static,
{
    thread::Builder::new()
        .name("profile-hotkeys".into())
        .spawn(move || {
            platform::listen_for_profile_hotkeys(BASE_PROFILES.len(), move |slot| {
                handle_press(slot, &profiles, routing.as_ref())
            });
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRouting {
        app: Mutex<Vec<(String, String)>>,
    }

    impl Routing for RecordingRouting {
        fn set_global_device(&self, _endpoint_id: &str) {}

        fn set_app_device(&self, endpoint_id: &str, executable_name: &str) {
            self.app
                .lock()
                .unwrap()
                .push((endpoint_id.to_string(), executable_name.to_string()));
        }
    }

    #[test]
    fn slots_map_to_the_base_profiles_in_order() {
        assert_eq!(profile_for_slot(0), Some("Gaming"));
        assert_eq!(profile_for_slot(1), Some("Work"));
        assert_eq!(profile_for_slot(2), Some("Meeting"));
        assert_eq!(profile_for_slot(3), None);
    }

    #[test]
    fn pressing_a_slot_applies_its_base_profile() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path().join("profiles.json"));
        profiles.assign_in_matrix("Gaming", "game.exe", "DEV1");

        let routing = RecordingRouting::default();
        handle_press(0, &profiles, &routing);

        assert_eq!(
            *routing.app.lock().unwrap(),
            vec![("DEV1".to_string(), "game.exe".to_string())]
        );
    }

    #[test]
    fn an_out_of_range_slot_routes_nothing() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path().join("profiles.json"));
        profiles.assign_in_matrix("Gaming", "game.exe", "DEV1");

        let routing = RecordingRouting::default();
        handle_press(7, &profiles, &routing);

        assert!(routing.app.lock().unwrap().is_empty());
    }

    #[test]
    fn an_unset_base_profile_is_a_no_op_press() {
        let dir = TempDir::new().unwrap();
        let profiles = ProfileStore::new(dir.path().join("profiles.json"));

        let routing = RecordingRouting::default();
        handle_press(1, &profiles, &routing);

        assert!(routing.app.lock().unwrap().is_empty());
    }
}
