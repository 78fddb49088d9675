//! Per-application audio routing engine.
//!
//! Routes system and per-application audio to specific hardware endpoints
//! through an external command-line switcher, with named routing profiles
//! and automatic per-app switching driven by the foreground window.
//!
//! ## Features
//!
//! - Enumerate output/input endpoints and audio-session applications
//! - Named routing profiles: single-device ("direct") and per-app ("matrix")
//! - Profile catalog with base profiles and a capped custom set
//! - Foreground watcher that re-routes when the active application changes
//! - Global hotkeys (Ctrl+Alt+1/2/3) applying the base profiles
//! - Last-known-good routing state restored at startup
//! - Start with Windows option

pub mod app;
pub mod audio;
pub mod config;
pub mod hotkeys;
pub mod platform;
pub mod profiles;
pub mod state;
pub mod watcher;

pub use app::RouterApp;
pub use audio::{
    Application, DeviceDirectory, DeviceRole, Direction, Endpoint, Routing, RoutingExecutor,
    ScanSnapshot,
};
pub use config::{AppPaths, DependencyError};
pub use platform::StartupRegistration;
pub use profiles::{Profile, ProfileError, ProfileStore};
pub use state::{RuntimeState, StateStore};
pub use watcher::{ForegroundWatcher, WatcherHandle};
