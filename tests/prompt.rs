// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

mod helpers;

use aimend::services::prompt::{SYSTEM_PROMPT, build_prompt};
use helpers::make_commit;
use proptest::prelude::*;

#[test]
fn prompt_embeds_message_and_header() {
    let commit = make_commit("fix bug\n\nthe check was inverted");
    let prompt = build_prompt(&commit, None);

    assert!(prompt.contains("fix bug\n\nthe check was inverted"));
    assert!(prompt.contains(&format!("commit {}", commit.hash)));
    assert!(prompt.contains("Author: Jane Doe <jane@example.com>"));
    assert!(prompt.contains("Date:   2026-01-02T03:04:05+00:00"));
    assert!(!prompt.contains("```diff"));
}

#[test]
fn prompt_is_deterministic() {
    let commit = make_commit("wip");
    assert_eq!(
        build_prompt(&commit, Some("+a")),
        build_prompt(&commit, Some("+a"))
    );
}

#[test]
fn prompt_fences_diff() {
    let commit = make_commit("wip");
    let prompt = build_prompt(&commit, Some("diff --git a/x b/x\n+added"));

    assert!(prompt.contains("Use the diff below"));
    assert!(prompt.ends_with("```diff\ndiff --git a/x b/x\n+added\n```\n"));
}

#[test]
fn blank_diff_is_left_out() {
    let commit = make_commit("wip");
    assert_eq!(build_prompt(&commit, Some("  \n")), build_prompt(&commit, None));
}

#[test]
fn system_prompt_asks_for_category_tag() {
    insta::assert_snapshot!(SYSTEM_PROMPT.split(". ").next().unwrap(), @"You are a senior software engineer who writes clear, helpful git commit messages");
    assert!(SYSTEM_PROMPT.contains("lowercase category tag"));
}

// ─── Proptest: message is always embedded verbatim ───────────────────────────

proptest! {
    #[test]
    fn prompt_contains_original_message(message in "\\PC{1,200}", diff in proptest::option::of("\\PC{0,200}")) {
        let commit = make_commit(&message);
        let prompt = build_prompt(&commit, diff.as_deref());
        prop_assert!(prompt.contains(&message));
    }
}
