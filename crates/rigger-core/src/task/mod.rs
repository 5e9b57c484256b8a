//! Task scripts: discovery, environment contract and execution.
//!
//! A task named `T` is satisfied by any file in a unit's definition directory
//! whose name starts with `T`, so `setup.sh`, `setup.py` and `setup` are all
//! valid implementations of the `setup` task. Tasks are optional; a unit that
//! ships no script for a task simply does not support it.

pub mod env;
mod executor;
mod locator;

use serde::{Deserialize, Serialize};

pub use env::TaskEnv;
pub use executor::{TaskExecutor, TaskOutput};
pub use locator::{can_execute, locate};

pub const DOWNLOAD: &str = "download";
pub const SETUP: &str = "setup";
pub const UNINSTALL: &str = "uninstall";
pub const IS_INSTALLED: &str = "is_installed";
pub const GET_REVISIONS: &str = "get_revisions";

/// A named task invocation with optional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl From<&str> for Task {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
