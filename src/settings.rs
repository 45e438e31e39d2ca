//! Startup configuration read from `settings.json`.

use dirs_next as dirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Immutable window and storage configuration.
///
/// Loaded once before the window opens and handed to every tab by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub window_width: u32,
    pub window_height: u32,
    pub database_path: PathBuf,
    pub font_point_size: u32,
}

/// On-disk layout. Older files carry the store path under both `db_path`
/// and `database_path`, so both are read and reconciled afterwards.
#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(rename = "WindowWidth")]
    window_width: Option<u32>,
    #[serde(rename = "WindowHeight")]
    window_height: Option<u32>,
    db_path: Option<String>,
    database_path: Option<String>,
    font_point_size: Option<u32>,
}

impl Settings {
    pub const FILE: &'static str = "settings.json";
    const APP_DIR: &'static str = "body_weight_log";

    /// Resolve the settings file: the working directory wins, then the
    /// per-user config directory. Falls back to the working-directory path
    /// so a missing file is reported against the expected location.
    pub fn locate() -> PathBuf {
        let config_dir = dirs::config_dir().map(|p| p.join(Self::APP_DIR));
        Self::locate_in(Path::new("."), config_dir.as_deref())
    }

    fn locate_in(cwd: &Path, config_dir: Option<&Path>) -> PathBuf {
        let local = cwd.join(Self::FILE);
        if local.is_file() {
            return local;
        }
        if let Some(dir) = config_dir {
            let user = dir.join(Self::FILE);
            if user.is_file() {
                return user;
            }
        }
        local
    }

    /// Read and parse the settings file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| AppError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let raw: SettingsFile = serde_json::from_str(data)?;
        let database_path = raw
            .db_path
            .or(raw.database_path)
            .ok_or(AppError::MissingSetting("db_path"))?;
        Ok(Self {
            window_width: raw
                .window_width
                .ok_or(AppError::MissingSetting("WindowWidth"))?,
            window_height: raw
                .window_height
                .ok_or(AppError::MissingSetting("WindowHeight"))?,
            database_path: PathBuf::from(database_path),
            font_point_size: raw
                .font_point_size
                .ok_or(AppError::MissingSetting("font_point_size"))?,
        })
    }

    pub fn window_size(&self) -> [f32; 2] {
        [self.window_width as f32, self.window_height as f32]
    }
}
