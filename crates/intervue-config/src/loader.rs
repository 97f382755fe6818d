// SPDX-FileCopyrightText: 2026 Intervue Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading.
//!
//! Lookup order: `./intervue.toml` > `~/.config/intervue/intervue.toml` >
//! `/etc/intervue/intervue.toml`, with `INTERVUE_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::IntervueConfig;

/// File name looked up in every configuration directory.
pub const CONFIG_FILE_NAME: &str = "intervue.toml";

/// System-wide configuration path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/intervue/intervue.toml";

/// Sections whose keys may be overridden through `INTERVUE_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "search",
    "embedding",
    "ollama",
    "openai",
    "provider",
    "evaluation",
];

/// User-level configuration path under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("intervue").join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/intervue/intervue.toml`
/// 3. `~/.config/intervue/intervue.toml`
/// 4. `./intervue.toml`
/// 5. `INTERVUE_*` environment variables
pub fn load_config() -> Result<IntervueConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an in-memory TOML document (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<IntervueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IntervueConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<IntervueConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(IntervueConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(IntervueConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Maps `INTERVUE_SEARCH_INDEX_NAME` to `search.index_name`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores survive intact. The key reaches `map` with
/// its original casing.
fn env_provider() -> Env {
    Env::prefixed("INTERVUE_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("search_index_name"), "search.index_name");
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(
            map_env_key("provider_initial_backoff_ms"),
            "provider.initial_backoff_ms"
        );
        assert_eq!(map_env_key("log_level"), "log_level");
    }

    #[test]
    fn env_key_without_separator_is_left_alone() {
        assert_eq!(map_env_key("searchy"), "searchy");
    }
}
