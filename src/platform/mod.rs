//! Platform collaborators: run-at-login registration, the
//! foreground-window owner probe and system-wide hotkeys.
//!
//! Non-Windows builds get inert stubs so the core library and its tests
//! compile everywhere.

#[cfg(windows)]
pub mod foreground;
#[cfg(windows)]
pub mod hotkeys;
#[cfg(windows)]
pub mod registry;

#[cfg(not(windows))]
mod stub;

#[cfg(windows)]
pub use foreground::foreground_executable;
#[cfg(windows)]
pub use hotkeys::listen_for_profile_hotkeys;
#[cfg(windows)]
pub use registry::StartupRegistration;

#[cfg(not(windows))]
pub use stub::{foreground_executable, listen_for_profile_hotkeys, StartupRegistration};
