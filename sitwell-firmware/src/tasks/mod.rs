//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod monitor;
pub mod telemetry;

pub use monitor::{monitor_task, MonitorSettings, SeatMonitor};
pub use telemetry::telemetry_task;
