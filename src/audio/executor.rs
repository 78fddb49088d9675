//! Routing command execution through the external switcher tool.
//!
//! Every operation is fire-and-forget: the tool is invoked once per
//! default role so the change is visible no matter which role slot the OS
//! queries next. Failures (missing tool, non-zero exit) are swallowed and
//! logged; callers cannot distinguish "applied" from "silently failed".

use super::device::DeviceRole;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Device-switch capability consumed by the stores and the watcher.
///
/// Implemented by [`RoutingExecutor`]; tests substitute a recording fake.
pub trait Routing {
    /// Make the endpoint the system default for every role.
    fn set_global_device(&self, endpoint_id: &str);

    /// Route one application's audio to the endpoint, for every role.
    fn set_app_device(&self, endpoint_id: &str, executable_name: &str);
}

/// Invokes the external switcher tool.
pub struct RoutingExecutor {
    tool: PathBuf,
}

impl RoutingExecutor {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self { tool: tool.into() }
    }

    /// Ask the tool to write its enumeration table to `path`.
    pub fn export_scan(&self, path: &Path) {
        self.run(["/scomma".as_ref(), path.as_os_str()]);
    }

    /// Toggle mute on the current default render endpoint.
    pub fn toggle_mute(&self) {
        self.run(["/Mute", "Toggle"]);
    }

    fn run<I, S>(&self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let result = Command::new(&self.tool)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) if status.success() => {}
            Ok(status) => {
                warn!(tool = %self.tool.display(), ?status, "switcher tool exited with failure");
            }
            Err(e) => {
                warn!(tool = %self.tool.display(), error = %e, "failed to invoke switcher tool");
            }
        }
    }
}

impl Routing for RoutingExecutor {
    fn set_global_device(&self, endpoint_id: &str) {
        debug!(endpoint_id, "setting global default device");
        for args in role_fan_out("/SetDefault", endpoint_id, None) {
            self.run(&args);
        }
    }

    fn set_app_device(&self, endpoint_id: &str, executable_name: &str) {
        debug!(endpoint_id, executable_name, "routing application audio");
        for args in role_fan_out("/SetAppDefault", endpoint_id, Some(executable_name)) {
            self.run(&args);
        }
    }
}

/// Argument vectors for one device-switch operation, one per default role.
///
/// The tri-role fan-out is the correctness guarantee of this layer: the OS
/// exposes three independently queryable default slots, and all of them
/// must agree after a switch.
fn role_fan_out(command: &str, endpoint_id: &str, executable: Option<&str>) -> Vec<Vec<String>> {
    DeviceRole::ALL
        .iter()
        .map(|role| {
            let mut args = vec![
                command.to_string(),
                endpoint_id.to_string(),
                role.as_arg().to_string(),
            ];
            if let Some(executable) = executable {
                args.push(executable.to_string());
            }
            args
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_switch_issues_one_command_per_role() {
        let commands = role_fan_out("/SetDefault", "DEV1", None);
        assert_eq!(
            commands,
            vec![
                vec!["/SetDefault", "DEV1", "0"],
                vec!["/SetDefault", "DEV1", "1"],
                vec!["/SetDefault", "DEV1", "2"],
            ]
        );
    }

    #[test]
    fn app_switch_issues_one_command_per_role_with_the_executable() {
        let commands = role_fan_out("/SetAppDefault", "DEV1", Some("discord.exe"));
        assert_eq!(commands.len(), 3);
        for (command, role) in commands.iter().zip(["0", "1", "2"]) {
            assert_eq!(command, &vec!["/SetAppDefault", "DEV1", role, "discord.exe"]);
        }
    }
}
