// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::cell::RefCell;
use std::path::Path;
use std::process::Command;

use aimend::Result;
use aimend::domain::CommitRecord;
use aimend::error::VcsError;
use aimend::services::confirm::{Confirmer, is_affirmative};
use aimend::services::git::Repository;

/// Create a CommitRecord with fixed metadata
#[allow(dead_code)]
pub fn make_commit(message: &str) -> CommitRecord {
    CommitRecord {
        hash: "0123456789abcdef0123456789abcdef01234567".into(),
        author: "Jane Doe <jane@example.com>".into(),
        date: "2026-01-02T03:04:05+00:00".into(),
        message: message.into(),
    }
}

/// In-memory repository that records amend calls
#[allow(dead_code)]
pub struct FakeRepo {
    pub commit: CommitRecord,
    pub head: bool,
    pub dirty_index: bool,
    pub amended: RefCell<Vec<String>>,
    pub edited: RefCell<usize>,
}

#[allow(dead_code)]
impl FakeRepo {
    pub fn new(message: &str) -> Self {
        Self {
            commit: make_commit(message),
            head: true,
            dirty_index: false,
            amended: RefCell::new(Vec::new()),
            edited: RefCell::new(0),
        }
    }

    pub fn amended(&self) -> Vec<String> {
        self.amended.borrow().clone()
    }
}

impl Repository for FakeRepo {
    fn read_commit(&self, _rev: &str) -> Result<CommitRecord> {
        Ok(self.commit.clone())
    }

    fn is_head(&self, _rev: &str) -> Result<bool> {
        Ok(self.head)
    }

    fn diff(&self, _rev: &str, _max_lines: usize) -> Result<String> {
        Ok("diff --git a/src/lib.rs b/src/lib.rs\n-    if x {\n+    if x.is_some() {".into())
    }

    fn pretty_line(&self, _rev: &str) -> Result<String> {
        Ok(format!("{} - {}", self.commit.short_hash(), self.commit.subject()))
    }

    fn amend_head(&self, message: &str) -> Result<()> {
        if self.dirty_index {
            return Err(VcsError::DirtyIndex.into());
        }
        self.amended.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn edit_head(&self) -> Result<()> {
        *self.edited.borrow_mut() += 1;
        Ok(())
    }
}

/// Answers every question with a canned line of input
#[allow(dead_code)]
pub struct FakeConfirmer {
    pub answer: String,
    pub asked: RefCell<usize>,
}

#[allow(dead_code)]
impl FakeConfirmer {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: answer.into(),
            asked: RefCell::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        *self.asked.borrow()
    }
}

impl Confirmer for FakeConfirmer {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        *self.asked.borrow_mut() += 1;
        Ok(is_affirmative(&self.answer))
    }
}

/// Run git in `dir` with a fixed author identity and date
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Jane Doe")
        .env("GIT_AUTHOR_EMAIL", "jane@example.com")
        .env("GIT_AUTHOR_DATE", "2020-01-02T03:04:05+00:00")
        .env("GIT_COMMITTER_NAME", "Jane Doe")
        .env("GIT_COMMITTER_EMAIL", "jane@example.com")
        .env("GIT_COMMITTER_DATE", "2020-01-02T03:04:05+00:00")
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Fresh repository with local identity and signing disabled
#[allow(dead_code)]
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["config", "user.name", "Test Runner"]);
    git(dir, &["config", "user.email", "runner@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "core.hooksPath", "/dev/null"]);
}

/// Write `path`, stage it and commit with `message`
#[allow(dead_code)]
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    std::fs::write(dir.join(path), content).expect("write file");
    git(dir, &["add", path]);
    git(dir, &["commit", "-q", "-m", message]);
}
