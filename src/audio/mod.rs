//! Audio endpoint directory and routing through the external switcher tool.
//!
//! This module provides endpoint/application enumeration (via the tool's
//! tabular export) and the side-effecting routing commands.

pub mod device;
pub mod directory;
pub mod executor;
pub mod scan;

pub use device::{Application, DeviceRole, Direction, Endpoint};
pub use directory::{DeviceDirectory, ScanSnapshot};
pub use executor::{Routing, RoutingExecutor};
