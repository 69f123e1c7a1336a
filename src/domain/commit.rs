// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

pub const SHORT_HASH_LEN: usize = 10;

/// Snapshot of one commit, read once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    /// `Name <email>`
    pub author: String,
    /// Author date, strict ISO 8601
    pub date: String,
    /// Subject and body as stored in the commit
    pub message: String,
}

impl CommitRecord {
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }

    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }
}
