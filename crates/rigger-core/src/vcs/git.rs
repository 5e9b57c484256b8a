use std::path::Path;

use anyhow::Context;
use git2::{Commit, ErrorCode, ObjectType, Oid, Repository, Sort, Tree};

use super::VersionControl;

/// Reads units from a local git repository, one subdirectory per unit.
///
/// `base` is the repository path.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitMirror;

impl GitMirror {
    fn open(base: &str) -> anyhow::Result<Repository> {
        Repository::open(base).with_context(|| format!("Failed to open git repository: {base}"))
    }
}

impl VersionControl for GitMirror {
    fn name(&self) -> &'static str {
        "git"
    }

    fn revisions(&self, base: &str, unit: &str) -> anyhow::Result<Vec<String>> {
        let repo = Self::open(base)?;
        let head = repo.head()?.peel_to_commit()?;

        let mut revwalk = repo.revwalk()?;
        revwalk.push(head.id())?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let mut revisions = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            if changes_unit(&commit, unit)? {
                revisions.push(commit.id().to_string());
            }
        }
        Ok(revisions)
    }

    fn list(&self, base: &str) -> anyhow::Result<Vec<String>> {
        let repo = Self::open(base)?;
        let tree = repo.head()?.peel_to_tree()?;
        let mut names: Vec<String> = tree
            .iter()
            .filter(|entry| entry.kind() == Some(ObjectType::Tree))
            .filter_map(|entry| entry.name().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    fn checkout(
        &self,
        base: &str,
        unit: &str,
        revision: Option<&str>,
        destination: &Path,
    ) -> anyhow::Result<()> {
        let repo = Self::open(base)?;
        let reference = revision.unwrap_or("HEAD");
        let commit = repo
            .revparse_single(reference)
            .with_context(|| format!("Unknown revision '{reference}'"))?
            .peel_to_commit()?;
        let entry = commit
            .tree()?
            .get_path(Path::new(unit))
            .with_context(|| format!("'{unit}' not found at revision {}", commit.id()))?;
        let subtree = entry
            .to_object(&repo)?
            .into_tree()
            .map_err(|_| anyhow::anyhow!("'{unit}' is not a directory"))?;

        std::fs::create_dir_all(destination).with_context(|| {
            format!("Failed to create directory: {}", destination.display())
        })?;
        export_tree(&repo, &subtree, destination)
    }
}

/// Object id of `unit` in a commit's tree, if the unit exists there.
fn unit_entry_id(commit: &Commit<'_>, unit: &str) -> anyhow::Result<Option<Oid>> {
    match commit.tree()?.get_path(Path::new(unit)) {
        Ok(entry) => Ok(Some(entry.id())),
        Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Whether `commit` changed the unit subtree relative to its first parent.
fn changes_unit(commit: &Commit<'_>, unit: &str) -> anyhow::Result<bool> {
    let current = unit_entry_id(commit, unit)?;
    let previous = match commit.parents().next() {
        Some(parent) => unit_entry_id(&parent, unit)?,
        None => None,
    };
    Ok(current != previous)
}

fn export_tree(repo: &Repository, tree: &Tree<'_>, dst: &Path) -> anyhow::Result<()> {
    for entry in tree.iter() {
        let Some(name) = entry.name() else {
            continue;
        };
        let path = dst.join(name);
        match entry.kind() {
            Some(ObjectType::Tree) => {
                std::fs::create_dir_all(&path)
                    .with_context(|| format!("Failed to create directory: {}", path.display()))?;
                let subtree = repo.find_tree(entry.id())?;
                export_tree(repo, &subtree, &path)?;
            }
            Some(ObjectType::Blob) => {
                let blob = repo.find_blob(entry.id())?;
                std::fs::write(&path, blob.content())
                    .with_context(|| format!("Failed to write file: {}", path.display()))?;
                set_mode(&path, entry.filemode())?;
            }
            // Submodules are not exported.
            _ => {}
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, filemode: i32) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if filemode == 0o100755 {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to set permissions: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _filemode: i32) -> anyhow::Result<()> {
    Ok(())
}
