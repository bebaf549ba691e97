//! Configuration system for shipready.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod env_config;
pub mod report_config;
pub mod rules_config;
pub mod scan_config;
pub mod shipready_config;

pub use env_config::EnvConfig;
pub use report_config::ReportConfig;
pub use rules_config::RulesConfig;
pub use scan_config::ScanConfig;
pub use shipready_config::{CliOverrides, ShipreadyConfig};
