// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{InferenceError, Result};

/// Line separating an old message from an appended suggestion.
pub const SUGGESTION_MARKER: &str = "---aimend-msg---";

// Reasoning models (qwen3, deepseek-r1) may leave an unterminated block when cut off
static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?(?:</think>|\z)").unwrap());

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[\w-]*[ \t]*\n?").unwrap());

static TRAILING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n?```\s*$").unwrap());

static PREAMBLE_PATTERNS: &[&str] = &[
    "here's the improved commit message",
    "here is the improved commit message",
    "here's the commit message",
    "here is the commit message",
    "here's an improved commit message",
    "here is an improved commit message",
    "improved commit message",
    "commit message",
];

pub struct MessageSanitizer;

impl MessageSanitizer {
    /// Turn a raw model reply into a commit message, wrapped at
    /// `wrap_width` columns (0 keeps lines as they are).
    pub fn clean(raw: &str, wrap_width: usize) -> Result<String> {
        let mut text = THINK_BLOCK.replace_all(raw, "").trim().to_string();

        text = Self::strip_preamble(&text).trim().to_string();
        text = LEADING_FENCE.replace(&text, "").to_string();
        text = TRAILING_FENCE.replace(&text, "").trim().to_string();
        text = Self::strip_quotes(&text).trim().to_string();

        if text.is_empty() {
            return Err(InferenceError::EmptyResponse.into());
        }

        let text = if wrap_width > 0 {
            wrap(&text, wrap_width)
        } else {
            text
        };

        Ok(text)
    }

    fn strip_preamble(text: &str) -> String {
        let (first, rest) = match text.split_once('\n') {
            Some((first, rest)) => (first, Some(rest)),
            None => (text, None),
        };

        for pattern in PREAMBLE_PATTERNS {
            let n = pattern.len();
            let matches = first.len() >= n
                && first.is_char_boundary(n)
                && first[..n].eq_ignore_ascii_case(pattern);
            if !matches {
                continue;
            }

            // "Here is the commit message for this change:" on its own line
            if let Some(head) = first.trim_end().strip_suffix(':')
                && is_preamble_tail(&head[n..])
            {
                return rest.unwrap_or_default().to_string();
            }

            // "Commit message: fix: ..." with the message inline
            let Some(after) = first[n..].trim_start().strip_prefix(':') else {
                continue;
            };
            let after = after.trim();
            return match rest {
                Some(rest) => format!("{after}\n{rest}"),
                None => after.to_string(),
            };
        }

        text.to_string()
    }

    fn strip_quotes(text: &str) -> &str {
        for quote in ['"', '\'', '`'] {
            if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
                return &text[1..text.len() - 1];
            }
        }
        text
    }

    /// Drop an earlier appended suggestion and everything after it.
    pub fn strip_suggestion(message: &str) -> String {
        let mut kept = Vec::new();
        for line in message.lines() {
            if line.trim() == SUGGESTION_MARKER {
                break;
            }
            kept.push(line);
        }
        kept.join("\n").trim().to_string()
    }

    /// Final message for the amend: either the suggestion alone, or the
    /// old message with the suggestion appended below the marker.
    pub fn compose(old: &str, suggestion: &str, append: bool) -> String {
        if !append {
            return suggestion.trim_end().to_string();
        }

        let old = Self::strip_suggestion(old);
        format!(
            "{old}\n\n{SUGGESTION_MARKER}\n\n{}",
            suggestion.trim_end()
        )
    }
}

/// Words a model adds after the phrase itself, as in "... for this change".
fn is_preamble_tail(tail: &str) -> bool {
    let tail = tail.trim();
    if tail.is_empty() {
        return true;
    }
    let lower = tail.to_ascii_lowercase();
    (lower.starts_with("for ") || lower.starts_with("based on "))
        && tail.split_whitespace().count() <= 6
        && !tail.contains(':')
}

/// Greedy word wrap, line by line. Continuation lines keep the original
/// indentation, plus two columns under a `- ` or `* ` bullet.
pub fn wrap(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    if line.chars().count() <= width {
        return line.to_string();
    }

    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    let hanging = if body.starts_with("- ") || body.starts_with("* ") {
        format!("{indent}  ")
    } else {
        indent.to_string()
    };

    let mut out: Vec<String> = Vec::new();
    let mut current = indent.to_string();
    let mut current_len = current.chars().count();
    let mut has_word = false;

    for word in body.split_whitespace() {
        let word_len = word.chars().count();
        if has_word && current_len + 1 + word_len > width {
            out.push(std::mem::replace(&mut current, hanging.clone()));
            current_len = hanging.chars().count();
            has_word = false;
        }
        if has_word {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
        has_word = true;
    }
    out.push(current);

    out.join("\n")
}
