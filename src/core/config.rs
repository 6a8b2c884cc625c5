//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tether/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TetherConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub form: FormConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_backend: Option<String>,
    pub save_transcript: Option<bool>,
}

/// Settings the local backend serves as the form's initial state.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FormConfig {
    pub label: Option<String>,
    pub max_message_len: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BACKEND: &str = "local";
pub const DEFAULT_LABEL: &str = "Message";
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 280;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend: String,
    pub label: String,
    pub max_message_len: usize,
    pub save_transcript: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.tether/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tether").join("config.toml"))
}

/// Load config from `~/.tether/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TetherConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TetherConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TetherConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TetherConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: TetherConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Tether Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_backend = "local"          # Which backend serves the form
# save_transcript = true             # Persist wire traffic on quit

# [form]
# label = "Message"                  # Label the backend puts on the editor
# max_message_len = 280              # Texts longer than this are marked invalid
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_backend` and `cli_no_save` come from CLI flags (None/false = not specified).
pub fn resolve(config: &TetherConfig, cli_backend: Option<&str>, cli_no_save: bool) -> ResolvedConfig {
    // Backend: CLI → env → config → default
    let backend = cli_backend
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TETHER_BACKEND").ok())
        .or_else(|| config.general.default_backend.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND.to_string());

    // Transcript saving: a CLI --no-save always wins
    let save_transcript = if cli_no_save {
        false
    } else {
        config.general.save_transcript.unwrap_or(true)
    };

    ResolvedConfig {
        backend,
        label: config
            .form
            .label
            .clone()
            .unwrap_or_else(|| DEFAULT_LABEL.to_string()),
        max_message_len: config
            .form
            .max_message_len
            .unwrap_or(DEFAULT_MAX_MESSAGE_LEN),
        save_transcript,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = TetherConfig::default();
        assert!(config.general.default_backend.is_none());
        assert!(config.form.label.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = TetherConfig::default();
        let resolved = resolve(&config, None, false);
        assert_eq!(resolved.backend, DEFAULT_BACKEND);
        assert_eq!(resolved.label, DEFAULT_LABEL);
        assert_eq!(resolved.max_message_len, DEFAULT_MAX_MESSAGE_LEN);
        assert!(resolved.save_transcript);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = TetherConfig {
            general: GeneralConfig {
                default_backend: Some("local".to_string()),
                save_transcript: Some(false),
            },
            form: FormConfig {
                label: Some("Subject".to_string()),
                max_message_len: Some(64),
            },
        };
        let resolved = resolve(&config, None, false);
        assert_eq!(resolved.backend, "local");
        assert_eq!(resolved.label, "Subject");
        assert_eq!(resolved.max_message_len, 64);
        assert!(!resolved.save_transcript);
    }

    #[test]
    fn test_resolve_cli_backend_wins() {
        let config = TetherConfig {
            general: GeneralConfig {
                default_backend: Some("local".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("replay"), false);
        assert_eq!(resolved.backend, "replay");
    }

    #[test]
    fn test_resolve_cli_no_save_wins() {
        let config = TetherConfig {
            general: GeneralConfig {
                save_transcript: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, None, true);
        assert!(!resolved.save_transcript);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
default_backend = "local"
save_transcript = false

[form]
label = "Feedback"
max_message_len = 500
"#;
        let config: TetherConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_backend.as_deref(), Some("local"));
        assert_eq!(config.general.save_transcript, Some(false));
        assert_eq!(config.form.label.as_deref(), Some("Feedback"));
        assert_eq!(config.form.max_message_len, Some(500));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[form]
label = "Note"
"#;
        let config: TetherConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.form.label.as_deref(), Some("Note"));
        assert!(config.form.max_message_len.is_none());
        assert!(config.general.default_backend.is_none());
    }
}
