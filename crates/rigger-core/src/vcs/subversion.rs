use std::path::Path;
use std::process::Command;

use anyhow::Context;

use super::VersionControl;
use crate::revision::parse_revision_log;

/// Shells out to the `svn` client.
#[derive(Debug, Clone)]
pub struct Subversion {
    command: String,
}

impl Subversion {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn location(base: &str, unit: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), unit)
    }

    fn run_svn(&self, args: &[&str]) -> anyhow::Result<String> {
        tracing::debug!(command = %self.command, ?args, "Running svn");
        let output = Command::new(&self.command)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {} {:?}", self.command, args))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "svn command failed {:?} (exit {}): {}",
                args,
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for Subversion {
    fn name(&self) -> &'static str {
        "subversion"
    }

    fn revisions(&self, base: &str, unit: &str) -> anyhow::Result<Vec<String>> {
        let location = Self::location(base, unit);
        let log = self.run_svn(&["log", "--quiet", &location])?;
        Ok(parse_revision_log(log.lines()))
    }

    fn list(&self, base: &str) -> anyhow::Result<Vec<String>> {
        let listing = self.run_svn(&["ls", base])?;
        Ok(listing
            .lines()
            .map(|line| line.trim().trim_end_matches('/'))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn checkout(
        &self,
        base: &str,
        unit: &str,
        revision: Option<&str>,
        destination: &Path,
    ) -> anyhow::Result<()> {
        let location = Self::location(base, unit);
        let destination = destination
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid checkout destination"))?;
        let mut args = vec!["checkout"];
        if let Some(rev) = revision {
            args.extend(["-r", rev]);
        }
        args.extend([location.as_str(), destination]);
        self.run_svn(&args)?;
        Ok(())
    }
}
