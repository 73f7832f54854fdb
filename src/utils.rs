use crate::host::error::HostError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "lt_weather_parsers";
const PARAMS_FILE_NAME: &str = "params.json";

pub fn get_config_dir() -> Result<PathBuf, HostError> {
    dirs::config_dir()
        .ok_or(HostError::ConfigDirResolution)
        .map(|p| p.join(CONFIG_DIR_NAME))
}

pub fn default_params_file() -> Result<PathBuf, HostError> {
    get_config_dir().map(|dir| dir.join(PARAMS_FILE_NAME))
}

pub async fn ensure_dir_exists(path: &Path) -> Result<(), HostError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(HostError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating config directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| HostError::ConfigDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(HostError::ConfigDirCreation(path.to_path_buf(), e)),
    }
}
