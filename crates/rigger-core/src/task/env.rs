//! Environment handed to task scripts.

use std::collections::BTreeMap;
use std::path::Path;

pub const INSTALL_DIR: &str = "INSTALL_DIR";
pub const DESTINATION_DIR: &str = "DESTINATION_DIR";
pub const NAME: &str = "NAME";
pub const REVISION: &str = "REVISION";
pub const TAG: &str = "TAG";
pub const MYSQL_COMMAND: &str = "MYSQL_COMMAND";

/// Keys owned by the task contract; config may not shadow them.
pub const RESERVED_KEYS: [&str; 6] = [
    INSTALL_DIR,
    DESTINATION_DIR,
    NAME,
    REVISION,
    TAG,
    MYSQL_COMMAND,
];

/// Per-invocation environment mapping.
///
/// Built fresh for every task run: the fixed contract keys first, then
/// subsystem-wide values from config, then caller overrides on top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEnv {
    vars: BTreeMap<String, String>,
}

impl TaskEnv {
    pub fn new(
        install_dir: &Path,
        destination_dir: &Path,
        name: &str,
        revision: &str,
        tag: &str,
    ) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(
            INSTALL_DIR.to_string(),
            install_dir.to_string_lossy().to_string(),
        );
        vars.insert(
            DESTINATION_DIR.to_string(),
            destination_dir.to_string_lossy().to_string(),
        );
        vars.insert(NAME.to_string(), name.to_string());
        vars.insert(REVISION.to_string(), revision.to_string());
        vars.insert(TAG.to_string(), tag.to_string());
        Self { vars }
    }

    pub fn with_mysql_command(mut self, command: &str) -> Self {
        self.vars
            .insert(MYSQL_COMMAND.to_string(), command.to_string());
        self
    }

    /// Layer `values` over the current mapping, replacing existing keys.
    pub fn layered(mut self, values: &BTreeMap<String, String>) -> Self {
        for (key, value) in values {
            self.vars.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.vars
    }
}
