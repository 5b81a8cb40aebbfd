use std::path::PathBuf;

use hp_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "hotpaste";

/// `HOTPASTE_PROFILE=dev` keeps a second instance's files apart.
fn resolved_app_dir_name() -> String {
    match std::env::var("HOTPASTE_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_dir_override: Option<PathBuf>,
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_dir_override: None,
        }
    }

    /// Resolve both roots under `base` instead of the system directories.
    #[cfg(test)]
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_dir_override: Some(base),
        }
    }

    fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }

    fn base_config_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_dir_override {
            return Some(base.clone());
        }
        dirs::config_dir()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        let base_config = self
            .base_config_dir()
            .ok_or(AppDirsError::ConfigDirUnavailable)?;
        let app_dir_name = resolved_app_dir_name();

        Ok(AppDirs {
            app_data_root: base_data.join(&app_dir_name),
            app_config_root: base_config.join(&app_dir_name),
        })
    }
}
