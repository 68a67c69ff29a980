// Configuration loading and parsing (league.toml, advisor.toml, credentials.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::valuation::scoring::Strategy;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path} (copy it from defaults/)")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub advisor: AdvisorConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    /// Slot labels in draft-board order, e.g. QB, RB, WR, FLEX, BN.
    pub roster_positions: Vec<String>,
    /// Stat name to point value, e.g. `rec = 0.5` for half-PPR.
    #[serde(default)]
    pub scoring: HashMap<String, f64>,
}

// ---------------------------------------------------------------------------
// advisor.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire advisor.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AdvisorFile {
    llm: LlmConfig,
    advisor: AdvisorSection,
}

#[derive(Debug, Clone, Deserialize)]
struct AdvisorSection {
    strategy: String,
}

/// The public advisor config assembled from the advisor.toml sections.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub llm: LlmConfig,
    pub default_strategy: Strategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub openai_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml`,
/// `config/advisor.toml`, and (optionally) `config/credentials.toml`,
/// all relative to the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = league_file.league;

    // --- advisor.toml (required) ---
    let advisor_path = config_dir.join("advisor.toml");
    let advisor_text = read_file(&advisor_path)?;
    let advisor_file: AdvisorFile =
        toml::from_str(&advisor_text).map_err(|e| ConfigError::ParseError {
            path: advisor_path.clone(),
            source: e,
        })?;

    let default_strategy = Strategy::parse(&advisor_file.advisor.strategy).ok_or_else(|| {
        ConfigError::ValidationError {
            field: "advisor.strategy".into(),
            message: format!(
                "must be one of safe, balanced, upside; got `{}`",
                advisor_file.advisor.strategy
            ),
        }
    })?;

    let advisor = AdvisorConfig {
        llm: advisor_file.llm,
        default_strategy,
    };

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        league,
        advisor,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Convenience wrapper: loads config relative to the current working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.roster_positions.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.roster_positions".into(),
            message: "must contain at least one slot label".into(),
        });
    }

    if config.advisor.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.advisor.llm.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
