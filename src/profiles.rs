//! Named routing profiles and the durable profile catalog.
//!
//! A profile is either a single endpoint assignment ("direct", the shape
//! behind save/restore-last-device and the single-app auto-route shortcut)
//! or a per-application matrix applied as a batch. Both shapes live under
//! one name key in a JSON catalog: a bare string value is a direct
//! profile, an object is a matrix.
//!
//! Every mutation is one load-modify-save critical section; the file is
//! rewritten immediately, no buffering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{info, warn};

/// Non-deletable profile names that always exist conceptually.
pub const BASE_PROFILES: [&str; 3] = ["Gaming", "Work", "Meeting"];

/// Cap on user-defined profiles beyond the base set.
pub const MAX_CUSTOM_PROFILES: usize = 2;

/// A named routing profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    /// One target endpoint id.
    Direct(String),

    /// Executable name → endpoint id, applied as a batch.
    Matrix(BTreeMap<String, String>),
}

/// The full profile catalog, keyed by profile name.
pub type Catalog = BTreeMap<String, Profile>;

/// Profile catalog validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile name cannot be empty.")]
    EmptyName,

    #[error("Profile already exists.")]
    AlreadyExists,

    #[error("Maximum of {MAX_CUSTOM_PROFILES} custom profiles reached.")]
    LimitExceeded,

    #[error("Base profiles cannot be deleted.")]
    IsBaseProfile,

    #[error("Profile not found.")]
    NotFound,
}

/// Durable profile catalog with invariant enforcement.
pub struct ProfileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Read the catalog from storage.
    ///
    /// A missing file is an empty catalog; a malformed file is an empty
    /// catalog plus a warning, never an error to the caller.
    pub fn load(&self) -> Catalog {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Catalog::new(),
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "failed to read profile catalog");
                return Catalog::new();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(file = %self.path.display(), error = %e, "profile catalog is malformed");
                Catalog::new()
            }
        }
    }

    /// Write the whole catalog back to storage (last write wins).
    pub fn save(&self, catalog: &Catalog) {
        let json = match serde_json::to_string_pretty(catalog) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize profile catalog");
                return;
            }
        };
        let tmp = self.path.with_extension("json.tmp");
        let result = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            warn!(file = %self.path.display(), error = %e, "failed to save profile catalog");
        }
    }

    /// Names of user-defined matrix profiles.
    ///
    /// Base names are excluded, as are names ending in `.exe`: those come
    /// from the single-app save shortcut, not the matrix builder. A custom
    /// profile deliberately named with that suffix is misclassified here;
    /// the heuristic is preserved as-is.
    pub fn custom_profiles(&self) -> Vec<String> {
        Self::customs_in(&self.load())
    }

    fn customs_in(catalog: &Catalog) -> Vec<String> {
        catalog
            .keys()
            .filter(|name| !BASE_PROFILES.contains(&name.as_str()))
            .filter(|name| !looks_like_executable(name))
            .cloned()
            .collect()
    }

    /// Create an empty custom matrix profile.
    pub fn create_custom(&self, name: &str) -> Result<(), ProfileError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut catalog = self.load();

        if BASE_PROFILES.contains(&name) || catalog.contains_key(name) {
            return Err(ProfileError::AlreadyExists);
        }
        if Self::customs_in(&catalog).len() >= MAX_CUSTOM_PROFILES {
            return Err(ProfileError::LimitExceeded);
        }

        catalog.insert(name.to_string(), Profile::Matrix(BTreeMap::new()));
        self.save(&catalog);
        info!(profile = name, "created custom profile");
        Ok(())
    }

    /// Delete a custom profile. Base profiles are shielded.
    pub fn delete_custom(&self, name: &str) -> Result<(), ProfileError> {
        if BASE_PROFILES.contains(&name) {
            return Err(ProfileError::IsBaseProfile);
        }

        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut catalog = self.load();

        if catalog.remove(name).is_none() {
            return Err(ProfileError::NotFound);
        }
        self.save(&catalog);
        info!(profile = name, "deleted custom profile");
        Ok(())
    }

    /// Upsert a direct profile, overwriting any prior shape for `name`.
    pub fn set_direct(&self, name: &str, endpoint_id: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut catalog = self.load();
        catalog.insert(name.to_string(), Profile::Direct(endpoint_id.to_string()));
        self.save(&catalog);
    }

    /// The endpoint id of a direct profile, or `None`.
    ///
    /// A matrix stored under `name` yields `None`, not an error.
    pub fn get_direct(&self, name: &str) -> Option<String> {
        match self.load().get(name) {
            Some(Profile::Direct(id)) => Some(id.clone()),
            _ => None,
        }
    }

    /// Upsert one entry inside a matrix profile, creating the profile (or
    /// replacing a non-matrix shape) if needed.
    pub fn assign_in_matrix(&self, profile_name: &str, executable_name: &str, endpoint_id: &str) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut catalog = self.load();

        // a non-matrix shape under this name is replaced wholesale
        let mut entries = match catalog.remove(profile_name) {
            Some(Profile::Matrix(entries)) => entries,
            _ => BTreeMap::new(),
        };
        entries.insert(executable_name.to_string(), endpoint_id.to_string());
        catalog.insert(profile_name.to_string(), Profile::Matrix(entries));

        self.save(&catalog);
        info!(profile = profile_name, executable = executable_name, "assigned app in matrix");
    }

    /// Apply a profile through `routing_fn(endpoint_id, target)`.
    ///
    /// A matrix invokes the function once per entry (order unspecified); a
    /// direct profile invokes it once with the profile name as the target.
    /// An unknown name is a logged no-op.
    pub fn apply<F>(&self, name: &str, mut routing_fn: F)
    where
        F: FnMut(&str, &str),
    {
        match self.load().get(name) {
            Some(Profile::Matrix(entries)) => {
                for (executable, endpoint_id) in entries {
                    routing_fn(endpoint_id, executable);
                }
                info!(profile = name, "applied profile matrix");
            }
            Some(Profile::Direct(endpoint_id)) => {
                routing_fn(endpoint_id, name);
            }
            None => {
                warn!(profile = name, "profile not found, nothing applied");
            }
        }
    }
}

fn looks_like_executable(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".exe")
}
