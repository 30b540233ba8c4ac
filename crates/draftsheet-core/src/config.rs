// Configuration loading and parsing (draftsheet.toml).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::draft::sequencer::{MAX_ROUNDS, MAX_TEAMS};

const CONFIG_FILE: &str = "draftsheet.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub data: DataConfig,
    /// Where `export` writes roster CSVs when no directory is given.
    pub export_dir: PathBuf,
    /// Pre-draft keepers, applied in file order.
    pub keepers: Vec<KeeperConfig>,
}

// ---------------------------------------------------------------------------
// draftsheet.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for draftsheet.toml.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    draft: DraftConfig,
    data: DataConfig,
    #[serde(default)]
    export: ExportSection,
    #[serde(default)]
    keepers: Vec<KeeperConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    pub teams: u32,
    pub rounds: u32,
    /// Number of upcoming picks shown after each update.
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

fn default_lookahead() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Player table CSV, relative to the working directory.
    pub players: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExportSection {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeeperConfig {
    pub team: u32,
    pub player: String,
    pub round: u32,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate `config/draftsheet.toml` under `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        draft: file.draft,
        data: file.data,
        export_dir: file.export.dir.unwrap_or_else(default_export_dir),
        keepers: file.keepers,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/draftsheet.toml` from `defaults/draftsheet.toml` when the
/// config file is absent. Returns the path written, or `None` when a config
/// file already exists. An existing file is never overwritten.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/{CONFIG_FILE} or defaults/{CONFIG_FILE} in {}; \
                 run from the project root",
                base_dir.display()
            ),
        });
    }
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", source.display(), target.display()),
    })?;
    Ok(Some(target))
}

/// Loads config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_config(&cwd)?;
    load_config_from(&cwd)
}

/// Platform data directory for exports, or `exports/` when none is known.
pub fn default_export_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "draftsheet")
        .map(|dirs| dirs.data_dir().join("exports"))
        .unwrap_or_else(|| PathBuf::from("exports"))
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
    let draft = &config.draft;
    if draft.teams == 0 || draft.teams > MAX_TEAMS {
        return Err(ConfigError::ValidationError {
            field: "draft.teams".into(),
            message: format!("must be between 1 and {MAX_TEAMS}, got {}", draft.teams),
        });
    }
    if draft.rounds == 0 || draft.rounds > MAX_ROUNDS {
        return Err(ConfigError::ValidationError {
            field: "draft.rounds".into(),
            message: format!("must be between 1 and {MAX_ROUNDS}, got {}", draft.rounds),
        });
    }
    if config.data.players.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.players".into(),
            message: "must not be empty".into(),
        });
    }

    let mut seen = HashSet::new();
    for (idx, keeper) in config.keepers.iter().enumerate() {
        if keeper.team < 1 || keeper.team > draft.teams {
            return Err(ConfigError::ValidationError {
                field: format!("keepers[{idx}].team"),
                message: format!("must be between 1 and {}, got {}", draft.teams, keeper.team),
            });
        }
        if keeper.round < 1 || keeper.round > draft.rounds {
            return Err(ConfigError::ValidationError {
                field: format!("keepers[{idx}].round"),
                message: format!("must be between 1 and {}, got {}", draft.rounds, keeper.round),
            });
        }
        if keeper.player.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("keepers[{idx}].player"),
                message: "must not be empty".into(),
            });
        }
        if !seen.insert(keeper.team) {
            return Err(ConfigError::ValidationError {
                field: format!("keepers[{idx}].team"),
                message: format!("team {} already has a keeper", keeper.team),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
