use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::{fs, io, path::Path, time::Duration};

/// Runtime knobs for the tracking loop. Every field has a default so an
/// absent or partial config file still yields a working agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between samples while connected.
    pub sample_interval_secs: u64,
    /// Seconds to wait before re-checking connectivity while offline.
    pub offline_retry_secs: u64,
    /// Forward tick-count jump (ms) beyond which a sleep/resume is inferred.
    pub resume_threshold_ms: u64,
    /// Address used for the connectivity reach-check.
    pub probe_addr: String,
    /// Seconds before the reach-check is considered failed.
    pub probe_timeout_secs: u64,
    /// Remote document store endpoint.
    pub sink_addr: String,
    /// Collection that activity records and shutdown events land in.
    pub collection: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sample_interval_secs: 60,
            offline_retry_secs: 10,
            resume_threshold_ms: 60_000,
            probe_addr: "8.8.8.8:53".into(),
            probe_timeout_secs: 3,
            sink_addr: "127.0.0.1:7464".into(),
            collection: "system_logs".into(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("no settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }

    pub fn offline_retry(&self) -> Duration {
        Duration::from_secs(self.offline_retry_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}
