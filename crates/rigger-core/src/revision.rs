//! Revision listing.
//!
//! A unit may ship a `get_revisions` script; otherwise revisions come from
//! the version-control history of the unit's source location.

use crate::error::Result;
use crate::vcs::VersionControl;

/// Installers able to list the revisions of a unit.
pub trait Revisionable {
    /// Available revisions, in the order the source reports them.
    fn list_revisions(&self, unit: &str) -> Result<Vec<String>>;
}

/// Extract revision ids from a quiet subversion log.
///
/// Only lines starting with `r<digits>` count; the leading `r` is stripped
/// and everything after the first whitespace is dropped.
///
/// ```text
/// ------------------------------------------------------------------------
/// r47364 | kim | 2009-02-17 17:13:44 +0100 (Tue, 17 Feb 2009)
/// ```
pub fn parse_revision_log<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let token = line.split_whitespace().next()?;
            if !line.starts_with(token) {
                return None;
            }
            let digits = token.strip_prefix('r')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some(digits.to_string())
        })
        .collect()
}

/// Split the stdout of a `get_revisions` script into revisions.
///
/// Lines are kept verbatim; only the empty segment left by a final newline
/// is dropped.
pub fn split_revision_output(stdout: &str) -> Vec<String> {
    let trimmed = stdout.strip_suffix('\n').unwrap_or(stdout);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(str::to_string).collect()
}

/// Revisions from the version-control history, or none without a base.
pub fn generic_revisions(
    vcs: &dyn VersionControl,
    base: Option<&str>,
    unit: &str,
) -> Result<Vec<String>> {
    let Some(base) = base else {
        tracing::debug!("No source base configured; no revisions for '{}'", unit);
        return Ok(Vec::new());
    };
    Ok(vcs.revisions(base, unit)?)
}
