/*!
 * Core Module
 * Shared types, limits, configuration, and ID generation
 */

pub mod config;
pub mod id;
pub mod limits;
pub mod serde;
pub mod types;

pub use config::{ConfigError, ConfigResult, SchedulerConfig};
pub use id::PidGenerator;
pub use types::{Pid, Priority, SlotName, SlotValue};
