use std::path::PathBuf;

use pl_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "pastelet";
const PROFILE_ENV: &str = "PASTELET_PROFILE";

/// Resolves Pastelet's data root under the user's local data directory.
///
/// A non-empty profile moves everything to `pastelet-<profile>`, so a second
/// instance never shares history or keys with the default one.
pub struct DirsAppDirsAdapter {
    base: Option<PathBuf>,
    profile: Option<String>,
}

impl DirsAppDirsAdapter {
    /// System data-local dir, profile taken from `PASTELET_PROFILE`.
    pub fn new() -> Self {
        Self {
            base: None,
            profile: std::env::var(PROFILE_ENV).ok(),
        }
        .normalized()
    }

    /// Resolve under `base` instead of the system data-local dir.
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base: Some(base),
            ..Self::new()
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.profile = self.profile.filter(|p| !p.is_empty());
        self
    }

    fn dir_name(&self) -> String {
        match &self.profile {
            Some(profile) => format!("{APP_DIR_NAME}-{profile}"),
            None => APP_DIR_NAME.to_string(),
        }
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base
            .clone()
            .or_else(dirs::data_local_dir)
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;

        Ok(AppDirs {
            app_data_root: base.join(self.dir_name()),
        })
    }
}
