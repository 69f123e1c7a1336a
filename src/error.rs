// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

// miette's Diagnostic derive generates code that triggers this false positive
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Repository and repository-state problems.
#[derive(Error, Diagnostic, Debug)]
pub enum VcsError {
    #[error("Not a git repository")]
    #[diagnostic(
        code(aimend::git::not_repo),
        help("Run this command inside a git repository")
    )]
    NotARepository,

    #[error("Bare repositories are not supported")]
    #[diagnostic(code(aimend::git::bare))]
    BareRepository,

    #[error("HEAD does not point to a commit yet")]
    #[diagnostic(
        code(aimend::git::unborn),
        help("Create the first commit before rewriting its message")
    )]
    UnbornHead,

    #[error("Unknown revision '{rev}'")]
    #[diagnostic(code(aimend::git::unknown_rev))]
    UnknownRevision { rev: String },

    #[error("'{rev}' is not HEAD; only HEAD can be amended")]
    #[diagnostic(
        code(aimend::git::not_head),
        help("Drop --yes to only print the suggestion, or check out the commit first")
    )]
    NotHead { rev: String },

    #[error("The index has staged changes")]
    #[diagnostic(
        code(aimend::git::dirty_index),
        help("Commit or unstage them first (git restore --staged .), otherwise they would be folded into HEAD")
    )]
    DirtyIndex,

    #[error("A {0} is in progress")]
    #[diagnostic(
        code(aimend::git::in_progress),
        help("Finish or abort it before amending")
    )]
    OperationInProgress(String),

    #[error("git {command} failed: {stderr}")]
    #[diagnostic(code(aimend::git::command))]
    Command { command: String, stderr: String },
}

/// Network and endpoint problems.
#[derive(Error, Diagnostic, Debug)]
pub enum InferenceError {
    #[error("Cannot connect to the inference server at {host}")]
    #[diagnostic(
        code(aimend::inference::unreachable),
        help("Start the local server (e.g. llama-server or ollama serve) or pass --host")
    )]
    Unreachable { host: String },

    #[error("Inference request timed out after {secs}s")]
    #[diagnostic(
        code(aimend::inference::timeout),
        help("Raise timeout_secs or try a smaller model")
    )]
    Timeout { secs: u64 },

    #[error("Inference server returned HTTP {status}: {body}")]
    #[diagnostic(code(aimend::inference::status))]
    Status { status: u16, body: String },

    #[error("Unexpected response from the inference server: {0}")]
    #[diagnostic(code(aimend::inference::malformed))]
    MalformedResponse(String),

    #[error("The model returned an empty message")]
    #[diagnostic(
        code(aimend::inference::empty),
        help("Run again, or try --diff to give the model more context")
    )]
    EmptyResponse,

    #[error("Request failed: {0}")]
    #[diagnostic(code(aimend::inference::http))]
    Http(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Inference(#[from] InferenceError),

    #[error("Interrupted")]
    Interrupted,

    #[error("Configuration error: {0}")]
    #[diagnostic(code(aimend::config::error))]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Dialog(e.to_string())
    }
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
