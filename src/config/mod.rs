use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::BoardSettings;
use crate::buildables::Buildable;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Board size and starting terrain
    #[serde(default)]
    pub board: BoardSettings,

    /// Build action selected on startup (none = selection disabled)
    #[serde(default)]
    pub starting_buildable: Option<Buildable>,

    /// Show the hovered cell read-out
    #[serde(default = "default_show_coordinates")]
    pub show_coordinates: bool,
}

fn default_show_coordinates() -> bool {
    true
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            board: BoardSettings::default(),
            starting_buildable: None,
            show_coordinates: default_show_coordinates(),
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Parse config JSON, describing why it was rejected on failure
fn parse_config(json: &str) -> Result<AppConfigData, String> {
    serde_json::from_str(json).map_err(|e| format!("Configuration file was corrupted: {}", e))
}

/// Load configuration from disk. The second value is set when the file
/// existed but could not be used, and defaults were substituted.
fn load_config(config_path: &Path) -> (AppConfigData, Option<String>) {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return (AppConfigData::default(), None);
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => match parse_config(&json) {
            Ok(data) => {
                info!("Loaded config from {:?}", config_path);
                (data, None)
            }
            Err(reason) => {
                warn!("Failed to parse config file: {}", reason);
                (AppConfigData::default(), Some(reason))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    if let Err(e) = crate::paths::ensure_directories() {
        warn!("Failed to create app directories: {}", e);
    }

    let config_path = get_config_path();
    let (data, reset_reason) = load_config(&config_path);
    config.data = data;
    config.config_path = config_path;
    config.dirty = false;

    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                save_config_system.run_if(on_message::<SaveConfigRequest>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.board, BoardSettings::default());
        assert!(data.starting_buildable.is_none());
        assert!(data.show_coordinates);
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            board: BoardSettings {
                width: 8,
                height: 6,
                ..Default::default()
            },
            starting_buildable: Some(Buildable::Hotel),
            show_coordinates: false,
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed = parse_config(&json).unwrap();

        assert_eq!(parsed.board, data.board);
        assert_eq!(parsed.starting_buildable, Some(Buildable::Hotel));
        assert!(!parsed.show_coordinates);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed = parse_config(r#"{ "board": { "width": 5 } }"#).unwrap();
        assert_eq!(parsed.board.width, 5);
        assert_eq!(parsed.board.height, BoardSettings::default().height);
        assert!(parsed.show_coordinates);
    }

    #[test]
    fn test_corrupted_config_reports_reason() {
        let reason = parse_config("{ not json").unwrap_err();
        assert!(reason.starts_with("Configuration file was corrupted"));
    }

    #[test]
    fn test_missing_file_loads_defaults_silently() {
        let (data, reason) = load_config(Path::new("does/not/exist/config.json"));
        assert!(reason.is_none());
        assert!(data.show_coordinates);
    }
}
