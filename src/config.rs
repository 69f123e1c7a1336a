// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Commercial

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use url::Url;

use crate::cli::Cli;
use crate::error::{Error, Result};

/// Wire protocol spoken by the local inference server
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI-compatible `/v1/chat/completions` (llama.cpp, vLLM, LM Studio)
    #[default]
    #[serde(alias = "llamacpp", alias = "llama.cpp")]
    OpenAI,
    /// Ollama native `/api/chat`
    Ollama,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "llamacpp" | "llama.cpp" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!(
                "unknown provider '{other}', expected openai or ollama"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: Provider,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds (default 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// LLM temperature (0.0-2.0, default 0.2)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate (default 512)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Lines of diff sent with --diff
    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: usize,

    /// Wrap generated lines at this column, 0 disables
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
}

fn default_host() -> String {
    "http://127.0.0.1:8080".into()
}
fn default_model() -> String {
    "local".into()
}
fn default_timeout_secs() -> u64 {
    300
}
fn default_temperature() -> f32 {
    0.2
}
fn default_max_tokens() -> u32 {
    512
}
fn default_max_diff_lines() -> usize {
    800
}
fn default_wrap_width() -> usize {
    80
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_diff_lines: default_max_diff_lines(),
            wrap_width: default_wrap_width(),
        }
    }
}

impl Config {
    /// Load with priority: CLI > ENV > user config > project config > defaults
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Project-level config (.aimend.toml in the working directory)
        if let Ok(cwd) = std::env::current_dir() {
            let project_config = cwd.join(".aimend.toml");
            if project_config.exists() {
                figment = figment.merge(Toml::file(&project_config));
            }
        }

        if let Some(path) = Self::config_path()
            && path.exists()
        {
            figment = figment.merge(Toml::file(&path));
        }

        // AIMEND_HOST, AIMEND_MODEL, AIMEND_TIMEOUT_SECS, ...
        figment = figment.merge(Env::prefixed("AIMEND_"));

        let mut config: Config = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;

        config.apply_cli(cli)?;
        config.host = normalize_host(&config.host)?;
        config.validate()?;
        Ok(config)
    }

    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "aimend").map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    fn apply_cli(&mut self, cli: &Cli) -> Result<()> {
        if let Some(ref p) = cli.provider {
            self.provider = p.parse()?;
        }
        if let Some(ref m) = cli.model {
            self.model = m.clone();
        }
        if let Some(ref h) = cli.host {
            self.host = h.clone();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::Config("model cannot be empty".into()));
        }

        if !(1..=3600).contains(&self.timeout_secs) {
            return Err(Error::Config(format!(
                "timeout_secs must be 1–3600, got {}",
                self.timeout_secs
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config(format!(
                "temperature must be 0.0–2.0, got {}",
                self.temperature
            )));
        }

        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".into()));
        }

        if !(10..=20_000).contains(&self.max_diff_lines) {
            return Err(Error::Config(format!(
                "max_diff_lines must be 10–20000, got {}",
                self.max_diff_lines
            )));
        }

        if self.wrap_width != 0 && !(40..=200).contains(&self.wrap_width) {
            return Err(Error::Config(format!(
                "wrap_width must be 0 or 40–200, got {}",
                self.wrap_width
            )));
        }

        Ok(())
    }

    /// Create default config file with secure permissions
    pub fn create_default() -> Result<PathBuf> {
        let Some(dir) = Self::config_dir() else {
            return Err(Error::Config("Cannot determine config directory".into()));
        };

        fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = r#"# aimend configuration

# Wire protocol: openai (llama.cpp server, vLLM, LM Studio) or ollama
provider = "openai"

# Inference server URL
host = "http://127.0.0.1:8080"

# Model name (llama.cpp ignores it; for Ollama use `ollama list`)
model = "local"

# Request timeout in seconds
timeout_secs = 300

# Sampling temperature
temperature = 0.2

# Maximum tokens to generate
max_tokens = 512

# Lines of diff sent with --diff
max_diff_lines = 800

# Wrap generated lines at this column (0 disables)
wrap_width = 80
"#;

        fs::write(&path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms)?;
        }

        Ok(path)
    }
}

/// Adds `http://` when no scheme is given and strips trailing slashes.
pub fn normalize_host(host: &str) -> Result<String> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(Error::Config("host cannot be empty".into()));
    }

    let with_scheme = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else if host.contains("://") {
        return Err(Error::Config(format!(
            "host must use http:// or https://, got '{host}'"
        )));
    } else {
        format!("http://{host}")
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| Error::Config(format!("invalid host '{host}': {e}")))?;
    if url.host_str().is_none() {
        return Err(Error::Config(format!("host '{host}' has no hostname")));
    }

    Ok(with_scheme)
}
