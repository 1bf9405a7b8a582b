//! CLI-owned configuration: TOML profiles merged with flags and env.
//!
//! Core and feed never see these types -- resolution happens up front and
//! produces a `FeedConfig`, a `FeedSchema`, and `Thresholds`. Precedence
//! for every setting is CLI flag > profile > built-in default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use meshmon_core::{FeedSchema, Thresholds};
use meshmon_feed::{DEFAULT_MAX_AGE, DEFAULT_TIMEOUT, FeedConfig, default_cache_path};

use crate::cli::Cli;
use crate::error::CheckError;

// ── TOML config structs ──────────────────────────────────────────────

/// On-disk configuration. One file can describe several mesh communities
/// as named profiles.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    /// Fallbacks for settings no profile or flag overrides.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named feed profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub schema: FeedSchema,

    #[serde(default = "default_max_age")]
    pub max_age: u64,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_warning")]
    pub warning: u32,

    #[serde(default = "default_critical")]
    pub critical: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            schema: FeedSchema::default(),
            max_age: default_max_age(),
            timeout: default_timeout(),
            warning: default_warning(),
            critical: default_critical(),
        }
    }
}

fn default_max_age() -> u64 {
    DEFAULT_MAX_AGE.as_secs()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}
fn default_warning() -> u32 {
    Thresholds::default().warning
}
fn default_critical() -> u32 {
    Thresholds::default().critical
}

/// One mesh community's feed definition.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Candidate feed URLs, tried in order.
    #[serde(default)]
    pub urls: Vec<String>,

    /// Document shape the feed publishes.
    pub schema: Option<FeedSchema>,

    /// Cache file override.
    pub cache_file: Option<PathBuf>,

    /// Freshness interval override, in seconds.
    pub max_age: Option<u64>,

    /// Network timeout override, in seconds.
    pub timeout: Option<u64>,

    /// Client-count threshold overrides.
    pub warning: Option<u32>,
    pub critical: Option<u32>,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "meshmon", "meshmon")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("meshmon");
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full `Config` from defaults, file, and environment. A missing
/// file is fine; a malformed one is a fatal check error.
///
/// Environment variables carry the `MESHMON_` prefix and nest on `__`, so
/// `MESHMON_DEFAULTS__WARNING=25` sets `defaults.warning` while single
/// underscores stay part of the key (`MESHMON_DEFAULT_PROFILE`).
pub fn load_config() -> Result<Config, CheckError> {
    load_config_from(config_path())
}

fn load_config_from(path: impl AsRef<Path>) -> Result<Config, CheckError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MESHMON_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution ───────────────────────────────────────────────────────

/// Everything the check needs, resolved from flags, profile, and defaults.
#[derive(Debug)]
pub struct ResolvedCheck {
    pub feed: FeedConfig,
    pub schema: FeedSchema,
    pub thresholds: Thresholds,
}

/// Resolve the active configuration for this invocation.
pub fn resolve(cli: &Cli) -> Result<ResolvedCheck, CheckError> {
    let config = load_config()?;
    resolve_with(&config, cli)
}

fn resolve_with(config: &Config, cli: &Cli) -> Result<ResolvedCheck, CheckError> {
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into());
    let profile = config.profiles.get(&profile_name);

    // 1. Sources (flags > profile); at least one URL must come from somewhere.
    let raw_urls = if cli.urls.is_empty() {
        profile.map(|p| p.urls.as_slice()).unwrap_or_default()
    } else {
        cli.urls.as_slice()
    };
    if raw_urls.is_empty() {
        return Err(CheckError::Validation {
            field: "url".into(),
            reason: "no status feed URL; pass --url or configure a profile".into(),
        });
    }
    let sources = raw_urls
        .iter()
        .map(|raw| {
            raw.parse().map_err(|_| CheckError::Validation {
                field: "url".into(),
                reason: format!("invalid URL: {raw}"),
            })
        })
        .collect::<Result<Vec<url::Url>, _>>()?;

    // 2. Schema
    let schema = cli
        .schema
        .map(FeedSchema::from)
        .or_else(|| profile.and_then(|p| p.schema))
        .unwrap_or(config.defaults.schema);

    // 3. Cache file
    let cache_path = cli
        .cache_file
        .clone()
        .or_else(|| profile.and_then(|p| p.cache_file.clone()))
        .unwrap_or_else(default_cache_path);

    // 4. Freshness interval and timeout
    let max_age = cli
        .max_age
        .or_else(|| profile.and_then(|p| p.max_age))
        .unwrap_or(config.defaults.max_age);
    let timeout = cli
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(config.defaults.timeout);

    // 5. Thresholds
    let thresholds = Thresholds {
        warning: cli
            .warning
            .or_else(|| profile.and_then(|p| p.warning))
            .unwrap_or(config.defaults.warning),
        critical: cli
            .critical
            .or_else(|| profile.and_then(|p| p.critical))
            .unwrap_or(config.defaults.critical),
    };

    Ok(ResolvedCheck {
        feed: FeedConfig {
            sources,
            cache_path,
            max_age: Duration::from_secs(max_age),
            timeout: Duration::from_secs(timeout),
        },
        schema,
        thresholds,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["check-mesh-node"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    fn community_config() -> Config {
        let profile = Profile {
            urls: vec!["https://map.example.org/nodes.json".into()],
            schema: Some(FeedSchema::MacMap),
            max_age: Some(60),
            warning: Some(20),
            ..Profile::default()
        };
        Config {
            default_profile: Some("community".into()),
            defaults: Defaults::default(),
            profiles: HashMap::from([("community".into(), profile)]),
        }
    }

    #[test]
    fn built_in_defaults_apply_without_a_profile() {
        let resolved = resolve_with(
            &Config::default(),
            &cli(&["-n", "gw-01", "-u", "https://map.example.org/nodes.json"]),
        )
        .unwrap();

        assert_eq!(resolved.schema, FeedSchema::NodeList);
        assert_eq!(resolved.feed.max_age, Duration::from_secs(300));
        assert_eq!(resolved.feed.timeout, Duration::from_secs(5));
        assert_eq!(
            resolved.thresholds,
            Thresholds {
                warning: 40,
                critical: 50
            }
        );
    }

    #[test]
    fn profile_values_fill_in_missing_flags() {
        let resolved = resolve_with(&community_config(), &cli(&["-n", "gw-01"])).unwrap();

        assert_eq!(
            resolved.feed.sources[0].as_str(),
            "https://map.example.org/nodes.json"
        );
        assert_eq!(resolved.schema, FeedSchema::MacMap);
        assert_eq!(resolved.feed.max_age, Duration::from_secs(60));
        assert_eq!(resolved.thresholds.warning, 20);
        assert_eq!(resolved.thresholds.critical, 50);
    }

    #[test]
    fn flags_override_the_profile() {
        let resolved = resolve_with(
            &community_config(),
            &cli(&[
                "-n",
                "gw-01",
                "-u",
                "https://other.example.org/nodes.json",
                "--schema",
                "node-info",
                "--max-age",
                "0",
                "-w",
                "30",
            ]),
        )
        .unwrap();

        assert_eq!(
            resolved.feed.sources[0].as_str(),
            "https://other.example.org/nodes.json"
        );
        assert_eq!(resolved.schema, FeedSchema::NodeInfo);
        assert_eq!(resolved.feed.max_age, Duration::ZERO);
        assert_eq!(resolved.thresholds.warning, 30);
    }

    #[test]
    fn url_flags_keep_their_order() {
        let resolved = resolve_with(
            &Config::default(),
            &cli(&[
                "-n",
                "gw-01",
                "-u",
                "https://a.example.org/nodes.json",
                "-u",
                "https://b.example.org/nodes.json",
            ]),
        )
        .unwrap();

        let sources: Vec<_> = resolved.feed.sources.iter().map(url::Url::as_str).collect();
        assert_eq!(
            sources,
            vec![
                "https://a.example.org/nodes.json",
                "https://b.example.org/nodes.json"
            ]
        );
    }

    #[test]
    fn missing_sources_are_a_validation_error() {
        let err = resolve_with(&Config::default(), &cli(&["-n", "gw-01"])).unwrap_err();
        assert!(matches!(err, CheckError::Validation { .. }));
    }

    #[test]
    fn invalid_url_is_a_validation_error() {
        let err = resolve_with(
            &Config::default(),
            &cli(&["-n", "gw-01", "-u", "not a url"]),
        )
        .unwrap_err();
        assert!(matches!(err, CheckError::Validation { .. }));
    }

    #[test]
    fn env_overrides_the_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    default_profile = "home"

                    [profiles.home]
                    urls = ["https://map.example.org/nodes.json"]
                    schema = "mac-map"
                    warning = 20
                "#,
            )?;
            jail.set_env("MESHMON_DEFAULT_PROFILE", "travel");
            jail.set_env("MESHMON_DEFAULTS__WARNING", "25");

            let config = load_config_from("config.toml").unwrap();
            assert_eq!(config.default_profile.as_deref(), Some("travel"));
            assert_eq!(config.defaults.warning, 25);

            let home = &config.profiles["home"];
            assert_eq!(home.urls, vec!["https://map.example.org/nodes.json"]);
            assert_eq!(home.schema, Some(FeedSchema::MacMap));
            assert_eq!(home.warning, Some(20));
            Ok(())
        });
    }
}
