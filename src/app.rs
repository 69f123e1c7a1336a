// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use std::io::IsTerminal;
use std::time::Duration;

use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::domain::{CommitRecord, Outcome, Stage};
use crate::error::{Error, Result, VcsError};
use crate::services::{
    confirm::{AMEND_PROMPT, Confirmer, TerminalConfirmer},
    git::{GitService, Repository},
    llm::{self, InferenceClient},
    prompt,
    sanitizer::MessageSanitizer,
};

pub struct App {
    cli: Cli,
    config: Config,
    cancel_token: CancellationToken,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let config = Config::load(&cli)?;
        debug!(
            provider = %config.provider,
            host = %config.host,
            model = %config.model,
            timeout_secs = config.timeout_secs,
            "config loaded"
        );
        let cancel_token = CancellationToken::new();
        Ok(Self {
            cli,
            config,
            cancel_token,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup Ctrl+C handler with CancellationToken
        let cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            signal::ctrl_c().await.ok();
            cancel.cancel();
        });

        if let Some(ref cmd) = self.cli.command {
            return self.handle_command(cmd);
        }

        let repo = GitService::discover()?;
        let client = llm::create_client(&self.config)?;

        let outcome = Workflow::new(
            &self.cli,
            &self.config,
            &repo,
            client.as_ref(),
            &TerminalConfirmer,
        )
        .run(self.cancel_token.clone())
        .await?;

        match outcome {
            Outcome::Amended(_) => eprintln!("{} Amended!", style("✓").green().bold()),
            Outcome::Declined => eprintln!("Aborted."),
            Outcome::Printed(_) => {}
        }

        Ok(())
    }

    fn handle_command(&self, cmd: &Commands) -> Result<()> {
        match cmd {
            Commands::Init => {
                let path = Config::create_default()?;
                println!("Created config: {}", path.display());
                Ok(())
            }
            Commands::Config => {
                println!("Provider: {}", self.config.provider);
                println!("Host: {}", self.config.host);
                println!("Model: {}", self.config.model);
                println!("Timeout: {}s", self.config.timeout_secs);
                println!("Temperature: {}", self.config.temperature);
                println!("Max tokens: {}", self.config.max_tokens);
                println!("Max diff lines: {}", self.config.max_diff_lines);
                println!("Wrap width: {}", self.config.wrap_width);
                if let Some(ref path) = Config::config_path() {
                    let status = if path.exists() { "found" } else { "not found" };
                    println!("Config file: {} ({})", path.display(), status);
                }
                Ok(())
            }
        }
    }
}

/// One run against one commit: read, generate, confirm, amend.
pub struct Workflow<'a> {
    cli: &'a Cli,
    config: &'a Config,
    repo: &'a dyn Repository,
    client: &'a dyn InferenceClient,
    confirmer: &'a dyn Confirmer,
    interactive: bool,
    stage: Stage,
}

impl<'a> Workflow<'a> {
    pub fn new(
        cli: &'a Cli,
        config: &'a Config,
        repo: &'a dyn Repository,
        client: &'a dyn InferenceClient,
        confirmer: &'a dyn Confirmer,
    ) -> Self {
        Self {
            cli,
            config,
            repo,
            client,
            confirmer,
            interactive: std::io::stdout().is_terminal() && std::io::stdin().is_terminal(),
            stage: Stage::Idle,
        }
    }

    /// Override terminal detection.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub async fn run(&mut self, cancel: CancellationToken) -> Result<Outcome> {
        let cli = self.cli;
        let rev = cli.commit.as_str();

        let commit = self.repo.read_commit(rev)?;
        let is_head = self.repo.is_head(rev)?;
        debug!(hash = %commit.hash, is_head, "commit loaded");

        // Fail before spending time on the model
        if self.cli.yes && !self.cli.dry_run && !is_head {
            return Err(VcsError::NotHead { rev: rev.into() }.into());
        }

        eprintln!("Commit: {}", self.repo.pretty_line(rev)?);
        eprintln!("\nOld message:\n");
        print_message(&commit.message, &Style::new().dim());

        self.enter(Stage::Generating);
        let suggestion = self.generate(&commit, cancel).await?;
        let new_message = MessageSanitizer::compose(&commit.message, &suggestion, self.cli.append);

        eprintln!("\nNew message:\n");
        print_message(&new_message, &Style::new().green());

        if self.cli.dry_run {
            println!("{new_message}");
            return Ok(self.finish_printed(new_message));
        }

        if !is_head {
            print_info(&format!("{rev} is not HEAD; nothing to amend"));
            println!("{new_message}");
            return Ok(self.finish_printed(new_message));
        }

        if !self.cli.yes {
            if !self.interactive {
                print_warning("Not a terminal. Use --yes to amend from scripts.");
                println!("{new_message}");
                return Ok(self.finish_printed(new_message));
            }

            self.enter(Stage::AwaitingConfirmation);
            eprintln!();
            if !self.confirmer.confirm(AMEND_PROMPT)? {
                self.enter(Stage::Aborted);
                return Ok(Outcome::Declined);
            }
        }

        self.repo.amend_head(&new_message)?;
        self.enter(Stage::Amended);
        eprintln!("Commit: {}", self.repo.pretty_line("HEAD")?);

        if self.cli.edit {
            self.repo.edit_head()?;
            eprintln!("Commit: {}", self.repo.pretty_line("HEAD")?);
        }

        Ok(Outcome::Amended(new_message))
    }

    async fn generate(&self, commit: &CommitRecord, cancel: CancellationToken) -> Result<String> {
        // An earlier appended suggestion would only bias the model
        let for_prompt = CommitRecord {
            message: MessageSanitizer::strip_suggestion(&commit.message),
            ..commit.clone()
        };

        let diff = if self.cli.diff {
            Some(self.repo.diff(&commit.hash, self.config.max_diff_lines)?)
        } else {
            None
        };

        let prompt = prompt::build_prompt(&for_prompt, diff.as_deref());
        debug!(prompt_chars = prompt.len(), with_diff = diff.is_some(), "prompt built");

        if self.cli.show_prompt {
            eprintln!("{}", style("--- PROMPT ---").dim());
            eprintln!("{}", prompt::SYSTEM_PROMPT);
            eprintln!();
            eprintln!("{prompt}");
            eprintln!("{}", style("--- END PROMPT ---").dim());
        }

        if cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }

        let spinner = self.spinner();
        let result = self.client.generate(&prompt, cancel).await;
        spinner.finish_and_clear();
        let raw = result?;

        if self.cli.raw {
            eprintln!("{}", style("--- RAW RESPONSE ---").dim());
            eprintln!("{raw}");
            eprintln!("{}", style("--- END RAW RESPONSE ---").dim());
        }

        MessageSanitizer::clean(&raw, self.config.wrap_width)
    }

    fn spinner(&self) -> ProgressBar {
        if !self.interactive || !std::io::stderr().is_terminal() {
            print_status(&format!(
                "Generating with {} ({})...",
                self.client.name(),
                self.config.model
            ));
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}") {
            spinner.set_style(template);
        }
        spinner.set_message(format!(
            "Generating with {} ({})...",
            self.client.name(),
            self.config.model
        ));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    fn finish_printed(&mut self, message: String) -> Outcome {
        self.enter(Stage::Aborted);
        Outcome::Printed(message)
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal(), "no transitions out of {}", self.stage);
        debug!(from = %self.stage, to = %next, "stage");
        self.stage = next;
    }
}

// ─── Output Helpers ───

fn print_message(message: &str, line_style: &Style) {
    for line in message.lines() {
        eprintln!("    {}", line_style.apply_to(line));
    }
}

fn print_status(msg: &str) {
    eprintln!("{} {}", style("→").cyan(), msg);
}

fn print_info(msg: &str) {
    eprintln!("{} {}", style("info:").cyan(), msg);
}

fn print_warning(msg: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), msg);
}
