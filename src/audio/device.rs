//! Audio endpoint and application data models.
//!
//! Endpoints and applications are rebuilt on every scan; nothing here is
//! persisted beyond the name/id pair itself.

/// Endpoint direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Render endpoint (speakers, headsets)
    Output,

    /// Capture endpoint (microphones)
    Input,
}

impl Direction {
    /// The marker the switcher tool uses for this direction in its export.
    pub fn marker(&self) -> &'static str {
        match self {
            Direction::Output => "Render",
            Direction::Input => "Capture",
        }
    }
}

/// An audio endpoint exposed by the OS.
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Opaque device ID used for routing commands
    pub id: String,

    /// Human-readable device name (display key; unique within one scan)
    pub friendly_name: String,

    /// Render or capture
    pub direction: Direction,
}

/// An application currently holding an audio session.
#[derive(Debug, Clone)]
pub struct Application {
    /// Display name reported by the session
    pub friendly_name: String,

    /// Executable file name; the routing key (case-sensitive)
    pub executable_name: String,
}

/// Default-device role (maps to the OS ERole slots).
///
/// The three roles are independently settable; routing commands fan out
/// across all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceRole {
    /// Games, system sounds, voice commands
    Console = 0,

    /// Music, movies
    Multimedia = 1,

    /// Voice chat, VoIP
    Communications = 2,
}

impl DeviceRole {
    /// All three roles, in command order.
    pub const ALL: [DeviceRole; 3] = [
        DeviceRole::Console,
        DeviceRole::Multimedia,
        DeviceRole::Communications,
    ];

    /// The numeric argument the switcher tool expects.
    pub fn as_arg(&self) -> &'static str {
        match self {
            DeviceRole::Console => "0",
            DeviceRole::Multimedia => "1",
            DeviceRole::Communications => "2",
        }
    }
}
