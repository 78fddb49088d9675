//! File locations and the startup dependency check.
//!
//! The switcher tool, its scan export and both persisted JSON files all
//! live beside the executable, matching a portable install.

use std::path::{Path, PathBuf};
use thiserror::Error;

const SWITCHER_TOOL: &str = "SoundVolumeView.exe";
const SCAN_FILE: &str = "devices.csv";
const PROFILES_FILE: &str = "profiles.json";
const STATE_FILE: &str = "state.json";

/// Startup dependency errors. The only fatal error class in the crate.
#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("required switcher tool not found: {}", path.display())]
    MissingTool { path: PathBuf },
}

/// Resolved locations of the tool and the data files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// External switcher tool executable
    pub tool: PathBuf,

    /// Enumeration export the tool writes and the directory reads
    pub scan_file: PathBuf,

    /// Profile catalog (JSON)
    pub profiles_file: PathBuf,

    /// Runtime routing state (JSON)
    pub state_file: PathBuf,
}

impl AppPaths {
    /// Resolve all paths relative to the running executable's directory.
    pub fn resolve() -> std::io::Result<Self> {
        let base = std::env::current_exe()?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::in_dir(base))
    }

    /// Resolve all paths under an explicit base directory.
    pub fn in_dir(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            tool: base.join(SWITCHER_TOOL),
            scan_file: base.join(SCAN_FILE),
            profiles_file: base.join(PROFILES_FILE),
            state_file: base.join(STATE_FILE),
        }
    }

    /// Validate that the external switcher tool is present.
    ///
    /// Checked once before anything else starts; every later failure
    /// degrades to no-op and log instead.
    pub fn check_dependencies(&self) -> Result<(), DependencyError> {
        if self.tool.exists() {
            Ok(())
        } else {
            Err(DependencyError::MissingTool {
                path: self.tool.clone(),
            })
        }
    }
}
