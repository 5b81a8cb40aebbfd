use std::path::PathBuf;

use hp_core::app_dirs::AppDirs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub settings_path: PathBuf,
    pub logs_dir: PathBuf,
    /// Holds the single-instance lock file.
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn from_app_dirs(dirs: &AppDirs) -> Self {
        Self {
            settings_path: dirs.app_config_root.join("config.toml"),
            logs_dir: dirs.app_data_root.join("logs"),
            data_dir: dirs.app_data_root.clone(),
        }
    }
}
