//! Configuration for rigger.
//!
//! A single `rigger.toml` describes where unit definitions live, where
//! instances are deployed, which version-control backend to query and the
//! fixed values exported to every task script.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_rigger_toml, parse_rigger_toml_str, to_toml};
pub use paths::default_config_path;
pub use schema::{RiggerConfig, SubsystemConfig, VcsConfig, VcsKind};
pub use store::ConfigStore;
