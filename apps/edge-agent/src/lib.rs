// [apps/edge-agent/src/lib.rs]
pub mod config_loader;
pub mod error;
pub mod scheduler;
pub mod state;
pub mod telemetry_source;

pub use config_loader::{load_config, CliArgs};
pub use error::StateError;
pub use scheduler::{spawn_ota_poller, spawn_security_monitor, TaskHandle};
pub use state::NodeState;
pub use telemetry_source::{NullTelemetrySource, TelemetrySource};
