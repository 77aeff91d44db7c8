use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNEKBOX_URL: &str = "http://localhost:8060/input";
pub const DEFAULT_PASTE_URL: &str = "https://paste.pythondiscord.com/{key}";
pub const DEFAULT_VENV_ACTIVATE: &str = "/snekbox/.venv/bin/activate_this.py";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Top-level config (evalbot.toml + EVALBOT_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalbotConfig {
    pub discord: Option<DiscordConfig>,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
}

/// Remote collaborators: the code execution service and the paste service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Endpoint accepting `{"code": ...}` and answering `{"output": ...}`.
    #[serde(default = "default_snekbox_url")]
    pub snekbox_url: String,
    /// Paste service URL template. `{key}` is replaced with `documents` for
    /// uploads and with the returned key for links.
    #[serde(default = "default_paste_url")]
    pub paste_url: String,
    /// Per-request timeout applied to both services.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            snekbox_url: default_snekbox_url(),
            paste_url: default_paste_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Wrapper script with a `{CODE}` placeholder. Built-in template when unset.
    pub template: Option<String>,
    #[serde(default = "default_venv_activate")]
    pub venv_activate: String,
    /// Line prefix that marks a comment in the evaluated language.
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            template: None,
            venv_activate: default_venv_activate(),
            comment_marker: default_comment_marker(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// Text command prefixes. A leading bot mention always works as well.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Channels where `eval` may be used. Empty means every guild channel.
    #[serde(default)]
    pub eval_channels: Vec<u64>,
    /// Roles that may use `eval` outside of `eval_channels`.
    #[serde(default)]
    pub bypass_roles: Vec<u64>,
    /// Register and answer the `/eval` slash command.
    #[serde(default)]
    pub slash_commands: bool,
    /// Presence text shown under the bot name.
    pub activity_name: Option<String>,
}

fn default_snekbox_url() -> String {
    DEFAULT_SNEKBOX_URL.to_string()
}
fn default_paste_url() -> String {
    DEFAULT_PASTE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_venv_activate() -> String {
    DEFAULT_VENV_ACTIVATE.to_string()
}
fn default_comment_marker() -> String {
    "#".to_string()
}
fn default_prefixes() -> Vec<String> {
    vec!["bot.".to_string(), "self.".to_string()]
}

impl EvalbotConfig {
    /// Load config from a TOML file with EVALBOT_* env var overrides.
    ///
    /// Nested keys use a double underscore, e.g.
    /// `EVALBOT_DISCORD__BOT_TOKEN` or `EVALBOT_SERVICES__SNEKBOX_URL`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(&path))
                .merge(Env::prefixed("EVALBOT_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> crate::error::Result<Self> {
        Ok(figment.extract()?)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.evalbot/evalbot.toml", home)
}
