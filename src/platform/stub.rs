//! Inert platform stubs for non-Windows builds.

use tracing::warn;

/// Always indeterminate off Windows.
pub fn foreground_executable() -> Option<String> {
    None
}

/// No system-wide hotkeys off Windows; returns without listening.
pub fn listen_for_profile_hotkeys(_count: usize, _on_hotkey: impl Fn(usize)) {
    warn!("global hotkeys are not supported on this platform");
}

/// Startup registration is unavailable off Windows; every call reports
/// failure.
pub struct StartupRegistration;

impl StartupRegistration {
    pub fn new() -> Self {
        Self
    }

    pub fn is_enabled(&self) -> bool {
        false
    }

    pub fn set_enabled(&self, _enabled: bool) -> bool {
        warn!("startup registration is not supported on this platform");
        false
    }
}

impl Default for StartupRegistration {
    fn default() -> Self {
        Self::new()
    }
}
