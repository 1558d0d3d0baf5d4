//! In-memory [`RepoGateway`] used by unit tests.

use super::{GitInvocation, Remote, RepoGateway};
use anyhow::Result;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub(crate) struct FakeGateway {
    pub root: PathBuf,
    pub remotes: Vec<Remote>,
    pub refs: RefCell<BTreeSet<String>>,
    /// Keyed by `(repository path, config key)`.
    pub config: RefCell<BTreeMap<(PathBuf, String), String>>,
    pub branches_at: BTreeMap<PathBuf, String>,
    pub porcelain: String,
    pub batches: RefCell<Vec<Vec<GitInvocation>>>,
    pub fail_batch: bool,
    pub fail_branch_delete: bool,
    pub removed: RefCell<Vec<(PathBuf, bool)>>,
    pub deleted_branches: RefCell<Vec<String>>,
}

impl FakeGateway {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            ..Self::default()
        }
    }

    pub fn with_remote(mut self, name: &str, url: &str) -> Self {
        self.remotes.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
        });
        self
    }

    pub fn with_ref(self, full_ref: &str) -> Self {
        self.refs.borrow_mut().insert(full_ref.to_string());
        self
    }

    pub fn with_config(self, path: &str, key: &str, value: &str) -> Self {
        self.config
            .borrow_mut()
            .insert((PathBuf::from(path), key.to_string()), value.to_string());
        self
    }

    pub fn with_porcelain(mut self, porcelain: &str) -> Self {
        self.porcelain = porcelain.to_string();
        self
    }

    pub fn config_value(&self, path: &Path, key: &str) -> Option<String> {
        self.config
            .borrow()
            .get(&(path.to_path_buf(), key.to_string()))
            .cloned()
    }

    pub fn last_batch(&self) -> Vec<String> {
        self.batches
            .borrow()
            .last()
            .map(|b| b.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

impl RepoGateway for FakeGateway {
    fn list_remotes(&self) -> Result<Vec<Remote>> {
        Ok(self.remotes.clone())
    }

    fn resolve_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn ref_exists(&self, full_ref: &str) -> Result<bool> {
        Ok(self.refs.borrow().contains(full_ref))
    }

    fn current_branch(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.branches_at.get(path).cloned())
    }

    fn config_get(&self, path: &Path, key: &str) -> Result<Option<String>> {
        Ok(self.config_value(path, key))
    }

    fn config_set(&self, path: &Path, key: &str, value: &str) -> Result<()> {
        self.config
            .borrow_mut()
            .insert((path.to_path_buf(), key.to_string()), value.to_string());
        Ok(())
    }

    fn run_batch(&self, batch: &[GitInvocation]) -> Result<()> {
        self.batches.borrow_mut().push(batch.to_vec());
        if self.fail_batch {
            anyhow::bail!("{} failed (exit 128)", batch[0]);
        }
        Ok(())
    }

    fn worktree_list_porcelain(&self, _root: &Path) -> Result<String> {
        Ok(self.porcelain.clone())
    }

    fn worktree_remove(&self, _root: &Path, path: &Path, force: bool) -> Result<()> {
        self.removed.borrow_mut().push((path.to_path_buf(), force));
        Ok(())
    }

    fn branch_delete(&self, _root: &Path, branch: &str) -> Result<()> {
        if self.fail_branch_delete {
            anyhow::bail!("Git branch delete failed: branch '{branch}' not found");
        }
        self.deleted_branches.borrow_mut().push(branch.to_string());
        Ok(())
    }
}
