// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "aimend")]
#[command(version)]
#[command(about = "Rewrite a commit message with a local LLM", long_about = None)]
pub struct Cli {
    /// Commit whose message to rewrite (only HEAD can be amended)
    #[arg(default_value = "HEAD")]
    pub commit: String,

    /// Also send the commit's diff to the model for more context
    #[arg(short, long)]
    pub diff: bool,

    /// Print the raw model response before cleanup
    #[arg(short, long)]
    pub raw: bool,

    /// Keep the old message and append the suggestion below a marker line
    #[arg(short, long)]
    pub append: bool,

    /// Amend without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print the suggestion only, never amend
    #[arg(long)]
    pub dry_run: bool,

    /// Open the editor on the amended message for a final touch-up
    #[arg(short, long)]
    pub edit: bool,

    /// Inference server URL, e.g. http://localhost:8080
    #[arg(long, env = "AIMEND_HOST")]
    pub host: Option<String>,

    /// Model name sent to the server
    #[arg(short, long, env = "AIMEND_MODEL")]
    pub model: Option<String>,

    /// Wire protocol of the server (openai, ollama)
    #[arg(short, long, env = "AIMEND_PROVIDER")]
    pub provider: Option<String>,

    /// Show the prompt sent to the model
    #[arg(long)]
    pub show_prompt: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Initialize config file
    Init,
    /// Show current configuration
    Config,
}
