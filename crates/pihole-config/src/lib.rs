//! Profile configuration for Pi-hole API clients.
//!
//! TOML profiles under the platform config dir, merged with `PIHOLE_`
//! environment variables, plus the URL and credential resolution chains
//! that turn a profile into a `pihole_api::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use pihole_api::ClientConfig;

/// Environment variable consulted when no profile sets a URL.
pub const URL_ENV: &str = "PIHOLE_URL";

/// Environment variable consulted for the password after `password_env`.
pub const PASSWORD_ENV: &str = "PIHOLE_PASSWORD";

const DEFAULT_PROFILE: &str = "default";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no Pi-hole URL configured for profile '{profile}' (set `url` or {URL_ENV})")]
    MissingUrl { profile: String },

    #[error("unknown profile '{profile}'")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    /// Settings every profile inherits unless it overrides them.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named appliance profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retries after the first attempt; negative disables retrying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_max: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_wait_min_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_wait_max_ms: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            retry_max: None,
            retry_wait_min_ms: None,
            retry_wait_max_ms: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named appliance profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Appliance URL, e.g. "https://pi.hole" or "http://10.0.0.2:8080".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Password in plaintext. Prefer `password_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Name of an environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_max: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_wait_min_ms: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_wait_max_ms: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "pihole", "pihole-rs").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("pihole-rs");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment keys use `__` as the nesting separator, e.g.
/// `PIHOLE_DEFAULTS__TIMEOUT=60` or `PIHOLE_DEFAULT_PROFILE=lab`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading pi-hole config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PIHOLE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

/// Explicit values that win over everything in the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub url: Option<String>,
    pub password: Option<String>,
    pub insecure: Option<bool>,
}

/// The profile name to use: explicit, then `default_profile`, then "default".
pub fn active_profile_name(explicit: Option<&str>, config: &Config) -> String {
    explicit
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| DEFAULT_PROFILE.into())
}

/// Look up the active profile.
///
/// A profile named explicitly must exist. The implicit default may be
/// absent, in which case an empty profile is used so the environment
/// alone can configure the client.
pub fn active_profile(
    explicit: Option<&str>,
    config: &Config,
) -> Result<(String, Profile), ConfigError> {
    let name = active_profile_name(explicit, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if explicit.is_some() => Err(ConfigError::UnknownProfile { profile: name }),
        None => Ok((name, Profile::default())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// URL chain: explicit, profile, `PIHOLE_URL`.
pub fn resolve_url(
    profile: &Profile,
    profile_name: &str,
    explicit: Option<&str>,
) -> Result<String, ConfigError> {
    non_empty(explicit.map(str::to_owned))
        .or_else(|| non_empty(profile.url.clone()))
        .or_else(|| non_empty(std::env::var(URL_ENV).ok()))
        .ok_or_else(|| ConfigError::MissingUrl {
            profile: profile_name.into(),
        })
}

/// Password chain: explicit, the profile's `password_env` variable,
/// `PIHOLE_PASSWORD`, plaintext in the profile.
///
/// `None` is a valid outcome: appliances without a password accept
/// unauthenticated sessions.
pub fn resolve_password(profile: &Profile, explicit: Option<&str>) -> Option<SecretString> {
    non_empty(explicit.map(str::to_owned))
        .or_else(|| {
            profile
                .password_env
                .as_deref()
                .and_then(|name| non_empty(std::env::var(name).ok()))
        })
        .or_else(|| non_empty(std::env::var(PASSWORD_ENV).ok()))
        .or_else(|| non_empty(profile.password.clone()))
        .map(SecretString::from)
}

/// Build a `ClientConfig` from a profile, its inherited defaults and the
/// environment, with no explicit overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    build_client_config(profile, profile_name, defaults, &Overrides::default())
}

/// Resolve the active profile with `overrides` applied on top.
pub fn resolve_client_config(
    config: &Config,
    overrides: &Overrides,
) -> Result<ClientConfig, ConfigError> {
    let (name, profile) = active_profile(overrides.profile.as_deref(), config)?;
    build_client_config(&profile, &name, &config.defaults, overrides)
}

fn build_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    overrides: &Overrides,
) -> Result<ClientConfig, ConfigError> {
    let url = resolve_url(profile, profile_name, overrides.url.as_deref())?;
    let password = resolve_password(profile, overrides.password.as_deref());

    let wait_min = profile.retry_wait_min_ms.or(defaults.retry_wait_min_ms);
    let wait_max = profile.retry_wait_max_ms.or(defaults.retry_wait_max_ms);
    if let (Some(min), Some(max)) = (wait_min, wait_max) {
        if max < min {
            return Err(ConfigError::Validation {
                field: "retry_wait_max_ms".into(),
                reason: format!("{max} is below retry_wait_min_ms {min}"),
            });
        }
    }

    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    debug!(
        profile = profile_name,
        url = %url,
        has_password = password.is_some(),
        "resolved pi-hole profile"
    );

    Ok(ClientConfig {
        url: Some(url),
        password,
        tls_insecure_skip_verify: overrides
            .insecure
            .or(profile.insecure)
            .unwrap_or(defaults.insecure),
        timeout: Some(Duration::from_secs(timeout)),
        retry_max: profile.retry_max.or(defaults.retry_max),
        retry_wait_min: wait_min.map(Duration::from_millis),
        retry_wait_max: wait_max.map(Duration::from_millis),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_points_at_default_profile() {
        let cfg = Config::default();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn explicit_profile_must_exist() {
        let err = active_profile(Some("lab"), &Config::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownProfile { profile } if profile == "lab"));
    }

    #[test]
    fn implicit_profile_may_be_absent() {
        let (name, profile) = active_profile(None, &Config::default()).unwrap();
        assert_eq!(name, "default");
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn wait_bounds_are_checked() {
        let profile = Profile {
            url: Some("http://pi.hole".into()),
            retry_wait_min_ms: Some(5_000),
            retry_wait_max_ms: Some(1_000),
            ..Profile::default()
        };
        let err = profile_to_client_config(&profile, "lab", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "retry_wait_max_ms"));
    }

    #[test]
    fn profile_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "home".into(),
            Profile {
                url: Some("https://pi.hole".into()),
                password_env: Some("HOME_PIHOLE_PW".into()),
                retry_max: Some(-1),
                ..Profile::default()
            },
        );
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
