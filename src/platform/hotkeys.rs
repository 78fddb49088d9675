//! System-wide hotkey registration for profile shortcuts.
//!
//! Registers Ctrl+Alt+1..N and blocks on a message loop, reporting the
//! zero-based slot of each press. Registration failures (another app owns
//! the combination) are logged and skipped; the remaining slots still
//! work.

use tracing::warn;
use windows::Win32::UI::Input::KeyboardAndMouse::{RegisterHotKey, MOD_ALT, MOD_CONTROL};
use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

/// Block the calling thread, invoking `on_hotkey(slot)` for each press of
/// Ctrl+Alt+(slot+1).
pub fn listen_for_profile_hotkeys(count: usize, on_hotkey: impl Fn(usize)) {
    unsafe {
        for slot in 0..count {
            // virtual-key codes for '1'..'9' match ASCII
            let vk = u32::from(b'1') + slot as u32;
            if RegisterHotKey(None, slot as i32 + 1, MOD_CONTROL | MOD_ALT, vk).is_err() {
                warn!(slot, "failed to register profile hotkey");
            }
        }

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).into() {
            if msg.message == WM_HOTKEY {
                let slot = (msg.wParam.0 as usize).wrapping_sub(1);
                on_hotkey(slot);
            }
        }
    }
}
