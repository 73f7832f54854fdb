//! Per-parser key/value settings and the stores that persist them between runs.
//!
//! The controller keeps one small string map per parser. Parsers read their cached
//! station identifier and skip lists from it, and write the identifier back once a
//! nearest station has been found.

use crate::host::error::HostError;
use crate::utils::ensure_dir_exists;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Cached eismoinfo.lt station id.
pub const NEAREST_STATION_ID: &str = "nearestStationID";
/// Cached meteo.lt forecast place code.
pub const NEAREST_PLACE_CODE: &str = "nearestPlaceCode";
/// Cached meteo.lt observation station code.
pub const NEAREST_STATION_CODE: &str = "nearestStationCode";
/// Comma separated station ids never to pick.
pub const SKIP_STATION_IDS: &str = "SkipStationIDs";

/// String settings of one parser. An empty value means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// The value for `key`, treating an empty string as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Comma separated list stored under `key`, blanks dropped.
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fills in every key of `defaults` that this set does not have yet.
    pub fn merge_defaults(&mut self, defaults: &Params) {
        for (key, value) in &defaults.0 {
            self.0.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Where the host keeps parser parameters between runs.
#[async_trait]
pub trait ParamStore: Send {
    async fn load(&self, parser: &str) -> Result<Option<Params>, HostError>;
    async fn save(&mut self, parser: &str, params: &Params) -> Result<(), HostError>;
}

/// Keeps parameters for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryParamStore {
    params: HashMap<String, Params>,
}

impl MemoryParamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ParamStore for MemoryParamStore {
    async fn load(&self, parser: &str) -> Result<Option<Params>, HostError> {
        Ok(self.params.get(parser).cloned())
    }

    async fn save(&mut self, parser: &str, params: &Params) -> Result<(), HostError> {
        self.params.insert(parser.to_string(), params.clone());
        Ok(())
    }
}

/// Keeps the parameters of all parsers in one JSON object keyed by parser name.
#[derive(Debug, Clone)]
pub struct JsonFileParamStore {
    path: PathBuf,
}

impl JsonFileParamStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Params>, HostError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Parameter file {} does not exist yet", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(HostError::ParamRead(self.path.clone(), e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| HostError::ParamDecode(self.path.clone(), e))
    }
}

#[async_trait]
impl ParamStore for JsonFileParamStore {
    async fn load(&self, parser: &str) -> Result<Option<Params>, HostError> {
        Ok(self.read_all().await?.remove(parser))
    }

    async fn save(&mut self, parser: &str, params: &Params) -> Result<(), HostError> {
        let mut all = self.read_all().await?;
        all.insert(parser.to_string(), params.clone());

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            ensure_dir_exists(dir).await?;
        }
        let json = serde_json::to_vec_pretty(&all).map_err(HostError::ParamEncode)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| HostError::ParamWrite(self.path.clone(), e))?;
        debug!("Saved parameters of '{}' to {}", parser, self.path.display());
        Ok(())
    }
}
