use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::consts::{DEFAULT_FREE_SPACE_GB, REQUIRED_EXTENSION};

/// Environment variable naming an explicit config file
pub(crate) const CONFIG_ENV: &str = "SCRATCHKIT_CONFIG";

#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    /// Default base folder for scratch sessions
    #[serde(default = "default_scratch_path")]
    pub(crate) scratch_path: PathBuf,
    /// Legacy scratch location removed on every fresh run
    #[serde(default)]
    pub(crate) old_scratch_path: Option<PathBuf>,
    /// XML file whose `scratchPath` node overrides `scratch_path`
    #[serde(default = "default_user_settings_file")]
    pub(crate) user_settings_file: PathBuf,
    #[serde(default = "default_free_space_gb")]
    pub(crate) free_space_threshold_gb: f64,
    /// Extensions the local host can check out
    #[serde(default = "default_extensions")]
    pub(crate) extensions: Vec<String>,
    /// Run as a server host owning this scratch database
    #[serde(default)]
    pub(crate) server_scratch_database: Option<PathBuf>,
    #[serde(default)]
    pub(crate) debug: bool,
    /// File the config was read from, `None` for defaults
    #[serde(skip)]
    pub(crate) source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_path: default_scratch_path(),
            old_scratch_path: None,
            user_settings_file: default_user_settings_file(),
            free_space_threshold_gb: default_free_space_gb(),
            extensions: default_extensions(),
            server_scratch_database: None,
            debug: false,
            source: None,
        }
    }
}

fn default_scratch_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("scratchkit")
        .join("scratch")
}

fn default_user_settings_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("scratchkit")
        .join("user_settings.xml")
}

fn default_free_space_gb() -> f64 {
    DEFAULT_FREE_SPACE_GB
}

fn default_extensions() -> Vec<String> {
    vec![REQUIRED_EXTENSION.to_string()]
}

impl Config {
    /// Load from an explicit path, falling back to the usual locations
    pub(crate) fn load(explicit: Option<&PathBuf>) -> Self {
        let mut config_paths = Vec::new();
        if let Some(path) = explicit {
            if !path.exists() {
                eprintln!(
                    "Warning: Config file {} does not exist, using default locations",
                    path.display()
                );
            }
            config_paths.push(path.clone());
        }
        config_paths.extend(Self::get_config_paths());

        for path in config_paths {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match toml::from_str::<Config>(&content) {
                    Ok(config) => {
                        return Self {
                            source: Some(path),
                            ..config
                        };
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    }
                }
            }
        }

        Self::default()
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 0. Explicit override: $SCRATCHKIT_CONFIG
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            paths.push(PathBuf::from(path));
        }

        // 1. XDG config: ~/.config/scratchkit/config.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("scratchkit").join("config.toml"));
        }

        // 2. Platform config dir (macOS Application Support, Windows AppData)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("scratchkit").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        // 3. Home directory: ~/.scratchkit.toml
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".scratchkit.toml"));
        }

        paths
    }
}
