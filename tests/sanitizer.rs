// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use aimend::error::{Error, InferenceError};
use aimend::services::sanitizer::{MessageSanitizer, SUGGESTION_MARKER};
use proptest::prelude::*;

fn clean(raw: &str) -> String {
    MessageSanitizer::clean(raw, 80).unwrap()
}

// ─── Cleanup ──────────────────────────────────────────────────────────────────

#[test]
fn plain_reply_is_kept() {
    insta::assert_snapshot!(clean("fix: correct null check"), @"fix: correct null check");
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    insta::assert_snapshot!(clean("\n\n  fix: correct null check  \n"), @"fix: correct null check");
}

#[test]
fn code_fence_is_removed() {
    let raw = "```text\nrefactor: extract helper\n\nmoves parsing out of main\n```";
    assert_eq!(clean(raw), "refactor: extract helper\n\nmoves parsing out of main");
}

#[test]
fn quotes_are_removed() {
    insta::assert_snapshot!(clean("\"docs: describe flags\""), @"docs: describe flags");
}

#[test]
fn preamble_line_is_removed() {
    let raw = "Here is the improved commit message:\n\nfix: correct null check";
    insta::assert_snapshot!(clean(raw), @"fix: correct null check");
}

#[test]
fn inline_preamble_is_removed() {
    insta::assert_snapshot!(clean("Commit message: fix: correct null check"), @"fix: correct null check");
}

#[test]
fn preamble_then_fence() {
    let raw = "Here's the improved commit message:\n```\nstyle: reformat imports\n```";
    insta::assert_snapshot!(clean(raw), @"style: reformat imports");
}

#[test]
fn subject_that_merely_mentions_commit_message_is_kept() {
    let raw = "commit message parsing handles trailers";
    assert_eq!(clean(raw), raw);
}

#[test]
fn subject_ending_in_colon_is_kept() {
    let raw = "Commit message parsing: handle trailers:\n\n- keeps Signed-off-by lines";
    assert_eq!(clean(raw), raw);
}

#[test]
fn preamble_with_short_tail_is_dropped() {
    let raw = "Here is the commit message for this change:\nfix: correct null check";
    insta::assert_snapshot!(clean(raw), @"fix: correct null check");
}

#[test]
fn think_block_is_removed() {
    let raw = "<think>\nthe user wants a fix tag\n</think>\n\nfix: correct null check";
    insta::assert_snapshot!(clean(raw), @"fix: correct null check");
}

#[test]
fn unterminated_think_block_is_empty() {
    let err = MessageSanitizer::clean("<think>still reasoning when cut off", 80).unwrap_err();
    assert!(matches!(err, Error::Inference(InferenceError::EmptyResponse)));
}

#[test]
fn long_body_lines_are_wrapped() {
    let body = "word ".repeat(40);
    let raw = format!("feat: add cache\n\n{}", body.trim());
    let out = clean(&raw);
    assert!(out.lines().all(|l| l.chars().count() <= 80), "{out}");
    assert!(out.starts_with("feat: add cache\n\n"));
}

#[test]
fn zero_width_disables_wrapping() {
    let line = "word ".repeat(40).trim().to_string();
    let out = MessageSanitizer::clean(&line, 0).unwrap();
    assert_eq!(out, line);
}

#[test]
fn empty_input_is_an_error() {
    for raw in ["", "   \n\t  ", "```\n```", "\"\""] {
        let err = MessageSanitizer::clean(raw, 80).unwrap_err();
        assert!(
            matches!(err, Error::Inference(InferenceError::EmptyResponse)),
            "{raw:?} gave {err:?}"
        );
    }
}

#[test]
fn multibyte_text_is_wrapped_safely() {
    let raw = format!("docs: {}", "添加中文说明 ".repeat(30));
    let out = clean(&raw);
    assert!(out.lines().all(|l| l.chars().count() <= 80));
}

// ─── Suggestion marker ────────────────────────────────────────────────────────

#[test]
fn strip_suggestion_drops_marker_and_tail() {
    let msg = format!("fix bug\n\n{SUGGESTION_MARKER}\n\nfix: correct null check\n");
    assert_eq!(MessageSanitizer::strip_suggestion(&msg), "fix bug");
}

#[test]
fn strip_suggestion_accepts_indented_marker() {
    let msg = format!("fix bug\n   {SUGGESTION_MARKER}\nold suggestion");
    assert_eq!(MessageSanitizer::strip_suggestion(&msg), "fix bug");
}

#[test]
fn strip_suggestion_without_marker_is_identity() {
    assert_eq!(
        MessageSanitizer::strip_suggestion("fix bug\n\nbody"),
        "fix bug\n\nbody"
    );
}

#[test]
fn compose_replaces_by_default() {
    assert_eq!(
        MessageSanitizer::compose("fix bug", "fix: correct null check\n", false),
        "fix: correct null check"
    );
}

#[test]
fn compose_append_replaces_previous_suggestion() {
    let old = format!("fix bug\n\n{SUGGESTION_MARKER}\n\nfix: older attempt");
    let out = MessageSanitizer::compose(&old, "fix: correct null check", true);
    assert_eq!(
        out,
        format!("fix bug\n\n{SUGGESTION_MARKER}\n\nfix: correct null check")
    );
    assert_eq!(out.matches(SUGGESTION_MARKER).count(), 1);
}

// ─── Proptest: never panics ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn sanitizer_never_panics(raw in ".*", width in 0usize..120) {
        // Any input must produce Ok or Err — never a panic
        let _ = MessageSanitizer::clean(&raw, width);
    }

    #[test]
    fn cleaned_output_is_never_empty(raw in ".*") {
        if let Ok(msg) = MessageSanitizer::clean(&raw, 80) {
            prop_assert!(!msg.trim().is_empty());
        }
    }
}
