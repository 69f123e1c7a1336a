// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use dialoguer::Input;

use crate::error::{Error, Result};

pub const AMEND_PROMPT: &str = "Amend the commit? [Y/n]";

/// Asks the operator a yes/no question.
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Reads one line from the controlling terminal.
pub struct TerminalConfirmer;

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| match e {
                dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                    Error::Interrupted
                }
                other => other.into(),
            })?;
        Ok(is_affirmative(&answer))
    }
}

/// Empty input accepts; so do `y`, `yes` and `1`. Anything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "" | "y" | "yes" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_yes_variants_accept() {
        for answer in ["", "  ", "y", "Y", "yes", "YES", " y\n", "1"] {
            assert!(is_affirmative(answer), "{answer:?} should accept");
        }
    }

    #[test]
    fn everything_else_declines() {
        for answer in ["n", "N", "no", "x", "0", "yep", "q", "?"] {
            assert!(!is_affirmative(answer), "{answer:?} should decline");
        }
    }
}
