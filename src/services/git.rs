// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::domain::CommitRecord;
use crate::error::{Result, VcsError};

/// The repository operations a run needs.
pub trait Repository {
    /// Read hash, author, date and message of `rev`.
    fn read_commit(&self, rev: &str) -> Result<CommitRecord>;

    /// Whether `rev` names the commit HEAD points to.
    fn is_head(&self, rev: &str) -> Result<bool>;

    /// Patch introduced by `rev`, at most `max_lines` lines.
    fn diff(&self, rev: &str, max_lines: usize) -> Result<String>;

    /// One-line summary for status output.
    fn pretty_line(&self, rev: &str) -> Result<String>;

    /// Replace HEAD's message, keeping author, date and tree.
    fn amend_head(&self, message: &str) -> Result<()>;

    /// Open the editor on HEAD's message.
    fn edit_head(&self) -> Result<()>;
}

pub struct GitService {
    repo: gix::Repository,
    work_dir: PathBuf,
}

const FIELD_SEP: char = '\0';

impl GitService {
    pub fn discover() -> Result<Self> {
        Self::discover_at(".")
    }

    pub fn discover_at(path: impl AsRef<Path>) -> Result<Self> {
        let repo = gix::discover(path.as_ref()).map_err(|_| VcsError::NotARepository)?;

        let work_dir = repo
            .workdir()
            .ok_or(VcsError::BareRepository)?
            .to_path_buf();

        Ok(Self { repo, work_dir })
    }

    /// Refuse to touch HEAD while git is in the middle of another operation.
    pub fn check_state(&self) -> Result<()> {
        use gix::state::InProgress;

        let Some(state) = self.repo.state() else {
            return Ok(());
        };

        let name = match state {
            InProgress::Merge => "merge",
            InProgress::Rebase | InProgress::RebaseInteractive | InProgress::ApplyMailboxRebase => {
                "rebase"
            }
            InProgress::CherryPick | InProgress::CherryPickSequence => "cherry-pick",
            InProgress::Revert | InProgress::RevertSequence => "revert",
            InProgress::Bisect => "bisect",
            _ => "mailbox apply",
        };
        Err(VcsError::OperationInProgress(name.into()).into())
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        debug!(args = ?args, "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?;
        Ok(output)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.git(args)?;

        if !output.status.success() {
            return Err(VcsError::Command {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Full hash of HEAD, or `UnbornHead` before the first commit.
    pub fn head_hash(&self) -> Result<String> {
        let output = self.git(&["rev-parse", "--verify", "--quiet", "HEAD^{commit}"])?;
        if !output.status.success() {
            return Err(VcsError::UnbornHead.into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Full hash of the commit `rev` names.
    pub fn resolve(&self, rev: &str) -> Result<String> {
        if is_head_alias(rev) {
            return self.head_hash();
        }

        // A leading dash would be read as an option
        if rev.is_empty() || rev.starts_with('-') {
            return Err(VcsError::UnknownRevision { rev: rev.into() }.into());
        }

        let spec = format!("{rev}^{{commit}}");
        let output = self.git(&["rev-parse", "--verify", "--quiet", &spec])?;
        if !output.status.success() {
            return Err(VcsError::UnknownRevision { rev: rev.into() }.into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// True when the index differs from HEAD.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let output = self.git(&["diff", "--cached", "--quiet", "--no-ext-diff"])?;
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(VcsError::Command {
                command: "diff".into(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into()),
        }
    }
}

impl Repository for GitService {
    fn read_commit(&self, rev: &str) -> Result<CommitRecord> {
        let hash = self.resolve(rev)?;
        let out = self.run(&[
            "log",
            "-n1",
            "--no-show-signature",
            "--format=%H%x00%an <%ae>%x00%aI%x00%B",
            &hash,
        ])?;

        parse_commit_record(&out).ok_or_else(|| {
            VcsError::Command {
                command: "log".into(),
                stderr: format!("unexpected output for {hash}"),
            }
            .into()
        })
    }

    fn is_head(&self, rev: &str) -> Result<bool> {
        if is_head_alias(rev) {
            return Ok(true);
        }
        Ok(self.resolve(rev)? == self.head_hash()?)
    }

    fn diff(&self, rev: &str, max_lines: usize) -> Result<String> {
        let hash = self.resolve(rev)?;
        let out = self.run(&[
            "show",
            "--no-color",
            "--no-ext-diff",
            "--format=",
            "--patch",
            "--stat",
            &hash,
        ])?;

        Ok(truncate_lines(out.trim_matches('\n'), max_lines))
    }

    fn pretty_line(&self, rev: &str) -> Result<String> {
        let hash = self.resolve(rev)?;
        let color = if console::colors_enabled_stderr() {
            "--color=always"
        } else {
            "--color=never"
        };
        let out = self.run(&[
            "log",
            "-n1",
            color,
            "--no-show-signature",
            "--abbrev-commit",
            "--pretty=format:%C(red)%h%C(reset) - %C(green)(%ci)%C(reset) [%C(yellow)%aN%C(reset)] %s%C(yellow)%d%C(reset)",
            &hash,
        ])?;
        Ok(out.trim_end().to_string())
    }

    fn amend_head(&self, message: &str) -> Result<()> {
        self.check_state()?;
        self.head_hash()?;

        if self.has_staged_changes()? {
            return Err(VcsError::DirtyIndex.into());
        }

        // --allow-empty: HEAD itself may be an empty commit
        self.run(&["commit", "--amend", "--allow-empty", "--quiet", "-m", message])?;
        debug!(chars = message.len(), "amended HEAD");
        Ok(())
    }

    fn edit_head(&self) -> Result<()> {
        debug!("opening editor on HEAD");
        let status = Command::new("git")
            .args(["commit", "--amend", "--allow-empty", "--quiet"])
            .current_dir(&self.work_dir)
            .status()?;

        if !status.success() {
            return Err(VcsError::Command {
                command: "commit".into(),
                stderr: format!("editor session exited with {status}"),
            }
            .into());
        }
        Ok(())
    }
}

fn is_head_alias(rev: &str) -> bool {
    matches!(rev, "HEAD" | "@")
}

/// Parse `%H NUL %an <%ae> NUL %aI NUL %B`.
pub fn parse_commit_record(raw: &str) -> Option<CommitRecord> {
    let mut fields = raw.splitn(4, FIELD_SEP);
    let hash = fields.next()?.trim();
    let author = fields.next()?;
    let date = fields.next()?;
    let message = fields.next()?;

    if hash.is_empty() {
        return None;
    }

    Some(CommitRecord {
        hash: hash.to_string(),
        author: author.to_string(),
        date: date.to_string(),
        message: message.trim_end().to_string(),
    })
}

/// Keep the first `max_lines` lines, noting how many were dropped.
pub fn truncate_lines(text: &str, max_lines: usize) -> String {
    let total = text.lines().count();
    if total <= max_lines {
        return text.to_string();
    }

    let note = format!("... ({} more lines truncated)", total - max_lines);
    let mut kept: Vec<&str> = text.lines().take(max_lines).collect();
    kept.push(&note);
    kept.join("\n")
}
