//! Endpoint/application directory backed by the switcher tool's export.
//!
//! Every call triggers a fresh export and re-parse; there is no caching,
//! so frequent pollers must debounce on their side.

use super::device::{Application, Direction, Endpoint};
use super::executor::RoutingExecutor;
use super::scan::{self, Record};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

const COL_TYPE: &str = "Type";
const COL_DIRECTION: &str = "Direction";
const COL_NAME: &str = "Name";
const COL_DEVICE_NAME: &str = "Device Name";
const COL_ITEM_ID: &str = "Item ID";
const COL_PROCESS_PATH: &str = "Process Path";
const DEFAULT_COLS: [&str; 3] = ["Default", "Default Multimedia", "Default Communications"];

const TYPE_DEVICE: &str = "Device";
const TYPE_APPLICATION: &str = "Application";

/// One scan's worth of name→key maps.
#[derive(Debug, Clone, Default)]
pub struct ScanSnapshot {
    /// Render endpoint friendly name → endpoint id
    pub outputs: BTreeMap<String, String>,

    /// Capture endpoint friendly name → endpoint id
    pub inputs: BTreeMap<String, String>,

    /// Application friendly name → executable name
    pub apps: BTreeMap<String, String>,
}

/// Queries the OS audio subsystem through the switcher tool's export file.
pub struct DeviceDirectory {
    executor: Arc<RoutingExecutor>,
    scan_file: PathBuf,
}

impl DeviceDirectory {
    pub fn new(executor: Arc<RoutingExecutor>, scan_file: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            scan_file: scan_file.into(),
        }
    }

    /// Rescan and classify endpoints and applications.
    ///
    /// A missing or malformed export yields empty maps and a warning, never
    /// an error.
    pub fn refresh(&self) -> ScanSnapshot {
        classify(&self.export())
    }

    /// Friendly name of the current default endpoint for `direction`.
    pub fn current_default(&self, direction: Direction) -> Option<String> {
        find_default(&self.export(), direction)
    }

    fn export(&self) -> Vec<Record> {
        self.executor.export_scan(&self.scan_file);
        match std::fs::read_to_string(&self.scan_file) {
            Ok(contents) => {
                let records = scan::parse_records(&contents);
                if records.is_empty() && !contents.trim().is_empty() {
                    warn!(file = %self.scan_file.display(), "scan export did not parse");
                }
                records
            }
            Err(e) => {
                warn!(file = %self.scan_file.display(), error = %e, "failed to read scan export");
                Vec::new()
            }
        }
    }
}

fn field<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    record.get(column).map(String::as_str).filter(|v| !v.is_empty())
}

/// Classify export records into output/input/application maps.
///
/// Rows missing a name or id are dropped silently.
pub fn classify(records: &[Record]) -> ScanSnapshot {
    let mut snapshot = ScanSnapshot::default();

    for record in records {
        match field(record, COL_TYPE) {
            Some(TYPE_DEVICE) => {
                if let Some(endpoint) = endpoint_from(record) {
                    let target = match endpoint.direction {
                        Direction::Output => &mut snapshot.outputs,
                        Direction::Input => &mut snapshot.inputs,
                    };
                    target.insert(endpoint.friendly_name, endpoint.id);
                }
            }
            Some(TYPE_APPLICATION) => {
                if let Some(app) = application_from(record) {
                    snapshot.apps.insert(app.friendly_name, app.executable_name);
                }
            }
            _ => {}
        }
    }

    snapshot
}

fn endpoint_from(record: &Record) -> Option<Endpoint> {
    let name = field(record, COL_DEVICE_NAME).or_else(|| field(record, COL_NAME))?;
    let id = field(record, COL_ITEM_ID)?;
    let direction = match field(record, COL_DIRECTION) {
        Some(d) if d == Direction::Output.marker() => Direction::Output,
        Some(d) if d == Direction::Input.marker() => Direction::Input,
        _ => return None,
    };
    Some(Endpoint {
        id: id.to_string(),
        friendly_name: name.to_string(),
        direction,
    })
}

fn application_from(record: &Record) -> Option<Application> {
    let name = field(record, COL_NAME)?;
    let executable = executable_from_path(field(record, COL_PROCESS_PATH)?)?;
    Some(Application {
        friendly_name: name.to_string(),
        executable_name: executable.to_string(),
    })
}

/// Find the row flagged as the active default for `direction`.
///
/// The export marks the default in any of three role columns; the first
/// row carrying the marker in any of them wins.
pub fn find_default(records: &[Record], direction: Direction) -> Option<String> {
    let marker = direction.marker();
    records
        .iter()
        .filter(|r| field(r, COL_TYPE) == Some(TYPE_DEVICE))
        .filter(|r| field(r, COL_DIRECTION) == Some(marker))
        .find(|r| DEFAULT_COLS.iter().any(|c| field(r, c) == Some(marker)))
        .and_then(|r| field(r, COL_DEVICE_NAME).or_else(|| field(r, COL_NAME)))
        .map(str::to_string)
}

fn executable_from_path(path: &str) -> Option<&str> {
    path.rsplit(['\\', '/']).next().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::scan::parse_records;

    const EXPORT: &str = "\
Name,Type,Direction,Device Name,Item ID,Process Path,Default,Default Multimedia,Default Communications
Speakers,Device,Render,Speakers (Realtek),{0.0.0}.{aaa},,Render,Render,
Headset,Device,Render,USB Headset,{0.0.0}.{bbb},,,,
Microphone,Device,Capture,Desk Mic,{0.0.1}.{ccc},,,,Capture
Discord,Application,Render,,,C:\\Apps\\Discord\\discord.exe,,,
Game,Application,Render,,,C:\\Games\\game.exe,,,
";

    #[test]
    fn classifies_devices_by_direction() {
        let snapshot = classify(&parse_records(EXPORT));
        assert_eq!(
            snapshot.outputs.get("Speakers (Realtek)").map(String::as_str),
            Some("{0.0.0}.{aaa}")
        );
        assert_eq!(
            snapshot.outputs.get("USB Headset").map(String::as_str),
            Some("{0.0.0}.{bbb}")
        );
        assert_eq!(
            snapshot.inputs.get("Desk Mic").map(String::as_str),
            Some("{0.0.1}.{ccc}")
        );
        assert_eq!(snapshot.inputs.len(), 1);
    }

    #[test]
    fn applications_use_executable_file_name() {
        let snapshot = classify(&parse_records(EXPORT));
        assert_eq!(
            snapshot.apps.get("Discord").map(String::as_str),
            Some("discord.exe")
        );
        assert_eq!(snapshot.apps.get("Game").map(String::as_str), Some("game.exe"));
    }

    #[test]
    fn rows_missing_name_or_id_are_dropped() {
        let export = "Name,Type,Direction,Device Name,Item ID\n\
                      ,Device,Render,,{0.0.0}.{aaa}\n\
                      Orphan,Device,Render,Orphan,\n";
        let snapshot = classify(&parse_records(export));
        assert!(snapshot.outputs.is_empty());
    }

    #[test]
    fn malformed_export_yields_empty_snapshot() {
        let snapshot = classify(&parse_records("not,a\nreal export at all"));
        assert!(snapshot.outputs.is_empty());
        assert!(snapshot.inputs.is_empty());
        assert!(snapshot.apps.is_empty());
    }

    #[test]
    fn default_render_device_found_by_any_role_column() {
        let records = parse_records(EXPORT);
        assert_eq!(
            find_default(&records, Direction::Output).as_deref(),
            Some("Speakers (Realtek)")
        );
        // the mic is flagged only in the communications column
        assert_eq!(
            find_default(&records, Direction::Input).as_deref(),
            Some("Desk Mic")
        );
    }

    #[test]
    fn no_default_flag_yields_none() {
        let export = "Name,Type,Direction,Device Name,Item ID,Default\n\
                      Speakers,Device,Render,Speakers,{aaa},\n";
        assert_eq!(find_default(&parse_records(export), Direction::Output), None);
    }
}
