//! Git commit collaborator
//!
//! Creates the signed commit and reads back its signature status. The
//! repository is located with `git2`; the commit itself goes through the
//! `git` binary, because only the CLI routes signing through gpg and the
//! agent's passphrase cache.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::agent::AgentSession;

/// Errors from the commit collaborator.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The path is not inside a git repository with a working tree.
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// The git process could not be spawned.
    #[error("failed to run git: {0}")]
    Io(#[from] std::io::Error),

    /// A git command exited with an error.
    #[error("git {action} failed: {stderr}")]
    GitFailed {
        /// Which git operation failed.
        action: &'static str,
        /// Captured stderr of the failing command.
        stderr: String,
    },
}

/// Parameters for one signed commit.
///
/// Everything in here ends up in the public commit object (signing key id,
/// author identity, message), so the struct is safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    /// Short key id passed to `--gpg-sign`.
    pub signing_key: String,
    /// Commit message.
    pub message: String,
    /// Author and committer name.
    pub author_name: String,
    /// Author and committer email.
    pub author_email: String,
}

/// Creates signed commits and reports their signature status.
///
/// `create_signed_commit` demands an [`AgentSession`]: the commit can only
/// succeed if the agent already holds the passphrase for the signing key,
/// and requiring the session token keeps that ordering visible in the type
/// signature.
pub trait CommitSigner {
    /// Create a signed commit from staged changes; returns the commit id.
    fn create_signed_commit(
        &self,
        session: &AgentSession,
        request: &SigningRequest,
    ) -> Result<String, CommitError>;

    /// Signature status of a commit, as rendered by git. Callers treat a
    /// failure here as a warning: the commit already exists.
    fn verify_signature(&self, commit_id: &str) -> Result<String, CommitError>;
}

/// A local repository addressed by its working tree.
#[derive(Debug, Clone)]
pub struct GitRepo {
    workdir: PathBuf,
}

impl GitRepo {
    /// Locate the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self, CommitError> {
        let repo = git2::Repository::discover(path)
            .map_err(|e| CommitError::NotARepository(e.message().to_string()))?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| CommitError::NotARepository("bare repository".to_string()))?
            .to_path_buf();
        Ok(Self { workdir })
    }

    /// The repository's working tree root.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Stage a path (relative to the working tree) for the next commit.
    pub fn stage(&self, pathspec: &str) -> Result<(), CommitError> {
        self.run("add", &["add", pathspec]).map(|_| ())
    }

    /// Set `user.name`/`user.email` for this repository. Without this git
    /// refuses to commit with "Committer identity unknown".
    pub fn configure_identity(&self, name: &str, email: &str) -> Result<(), CommitError> {
        self.run("config", &["config", "user.name", name])?;
        self.run("config", &["config", "user.email", email])?;
        Ok(())
    }

    fn run(&self, action: &'static str, args: &[&str]) -> Result<String, CommitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(CommitError::GitFailed {
                action,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl CommitSigner for GitRepo {
    fn create_signed_commit(
        &self,
        _session: &AgentSession,
        request: &SigningRequest,
    ) -> Result<String, CommitError> {
        self.configure_identity(&request.author_name, &request.author_email)?;

        let sign_flag = format!("--gpg-sign={}", request.signing_key);
        self.run("commit", &["commit", "-S", &sign_flag, "-m", &request.message])?;

        self.run("rev-parse", &["rev-parse", "HEAD"])
            .map(|id| id.trim().to_string())
    }

    fn verify_signature(&self, commit_id: &str) -> Result<String, CommitError> {
        self.run("log", &["log", "-1", "--show-signature", commit_id])
    }
}
