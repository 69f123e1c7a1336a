// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use crate::domain::CommitRecord;

pub const SYSTEM_PROMPT: &str = "You are a senior software engineer who writes clear, helpful git commit messages. \
Use present tense. Start with a short subject line that begins with a lowercase category tag \
(for example 'fix:', 'feat:', 'refactor:', 'docs:', 'style:', 'test:', 'chore:') followed by a concise lowercase summary. \
Add a body only when it gives extra clarity. Reply with the commit message only.";

/// Build the user prompt for one commit.
///
/// The original message is embedded verbatim so the model rewrites it
/// instead of inventing one. When `diff` is given it is appended in a
/// fenced block; a blank diff counts as none.
pub fn build_prompt(commit: &CommitRecord, diff: Option<&str>) -> String {
    let diff = diff.filter(|d| !d.trim().is_empty());
    let mut prompt = String::with_capacity(
        commit.message.len() + diff.map_or(0, str::len) + 512,
    );

    prompt.push_str("Improve the following git commit message. ");
    if diff.is_some() {
        prompt.push_str("Use the diff below to describe what the change actually does. ");
    }
    prompt.push_str("Only show the improved commit message.\n\n");

    prompt.push_str(&format!("commit {}\n", commit.hash));
    prompt.push_str(&format!("Author: {}\n", commit.author));
    prompt.push_str(&format!("Date:   {}\n\n", commit.date));

    prompt.push_str("<original_message>\n");
    prompt.push_str(&commit.message);
    prompt.push_str("\n</original_message>\n");

    if let Some(diff) = diff {
        prompt.push_str("\n```diff\n");
        prompt.push_str(diff);
        if !diff.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str("```\n");
    }

    prompt
}
