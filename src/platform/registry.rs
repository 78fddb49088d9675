//! Run-at-login registration via the Windows Run key.
//!
//! Registers the current executable under a fixed application name in
//! `HKCU\...\CurrentVersion\Run`. Failures degrade to `false` plus a log
//! line; nothing here raises to the caller.

use tracing::warn;
use windows::core::PCWSTR;
use windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, REG_SZ,
};

/// OS-level "run at login" registration keyed by a fixed application name.
pub struct StartupRegistration {
    run_key_path: Vec<u16>,
    value_name: Vec<u16>,
}

impl StartupRegistration {
    const RUN_KEY: &'static str = r"Software\Microsoft\Windows\CurrentVersion\Run";
    const APP_NAME: &'static str = "AudioRouter";

    pub fn new() -> Self {
        Self {
            run_key_path: to_wide(Self::RUN_KEY),
            value_name: to_wide(Self::APP_NAME),
        }
    }

    /// Check whether the Run entry is present.
    pub fn is_enabled(&self) -> bool {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            );
            if result.is_err() {
                return false;
            }

            let mut data_size = 0u32;
            let result = RegQueryValueExW(
                hkey,
                PCWSTR::from_raw(self.value_name.as_ptr()),
                None,
                None,
                None,
                Some(&mut data_size),
            );
            let _ = RegCloseKey(hkey);

            result.is_ok() && data_size > 0
        }
    }

    /// Register or unregister the current executable; `true` on success.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_WRITE,
                &mut hkey,
            );
            if result.is_err() {
                warn!("failed to open Run key for writing");
                return false;
            }

            let result = if enabled {
                let Ok(exe_path) = std::env::current_exe() else {
                    let _ = RegCloseKey(hkey);
                    warn!("could not resolve current executable path");
                    return false;
                };
                let exe_path_wide = to_wide(&exe_path.to_string_lossy());

                RegSetValueExW(
                    hkey,
                    PCWSTR::from_raw(self.value_name.as_ptr()),
                    0,
                    REG_SZ,
                    Some(std::slice::from_raw_parts(
                        exe_path_wide.as_ptr() as *const u8,
                        exe_path_wide.len() * 2,
                    )),
                )
            } else {
                // a missing value is already the desired state
                RegDeleteValueW(hkey, PCWSTR::from_raw(self.value_name.as_ptr()))
            };

            let _ = RegCloseKey(hkey);

            if result.is_err() && enabled {
                warn!("failed to write Run entry");
                return false;
            }
            true
        }
    }
}

impl Default for StartupRegistration {
    fn default() -> Self {
        Self::new()
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
