// src/config.rs
//! Configuration management with file-backed storage

use crate::error::{GpsError, Result};
use crate::monitor::GpsSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_window_size() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub source_type: String,  // "serial", "tcp", "file"
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub tcp_host: Option<String>,
    pub tcp_port: Option<u16>,
    pub nmea_file: Option<String>,
    /// Number of fixes kept in the averaging window
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            source_type: "serial".to_string(),
            serial_port: Some("/dev/ttyUSB0".to_string()),
            serial_baudrate: Some(9600),
            tcp_host: Some("localhost".to_string()),
            tcp_port: Some(10110),
            nmea_file: None,
            window_size: default_window_size(),
        }
    }
}

impl TrackerConfig {
    /// Load configuration from storage
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| GpsError::Other(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents).map_err(GpsError::Json)?;

        Ok(config)
    }

    /// Save configuration to storage
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GpsError::Other(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(GpsError::Json)?;

        std::fs::write(&config_path, contents)
            .map_err(|e| GpsError::Other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| GpsError::Other("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("gps-tracker").join("config.json"))
    }

    /// Resolve the configured source into a connectable `GpsSource`
    pub fn source(&self) -> Result<GpsSource> {
        match self.source_type.as_str() {
            "serial" => {
                let port = self.serial_port.clone()
                    .ok_or_else(|| GpsError::Other("No serial port configured".to_string()))?;
                Ok(GpsSource::Serial {
                    port,
                    baudrate: self.serial_baudrate.unwrap_or(9600),
                })
            }
            "tcp" => {
                let host = self.tcp_host.clone()
                    .ok_or_else(|| GpsError::Other("No TCP host configured".to_string()))?;
                let port = self.tcp_port
                    .ok_or_else(|| GpsError::Other("No TCP port configured".to_string()))?;
                Ok(GpsSource::Tcp { host, port })
            }
            "file" => {
                let path = self.nmea_file.clone()
                    .ok_or_else(|| GpsError::Other("No NMEA file configured".to_string()))?;
                Ok(GpsSource::File { path: PathBuf::from(path) })
            }
            other => Err(GpsError::Parse(format!("Unknown source type: {}", other))),
        }
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    /// Update TCP stream settings
    pub fn update_tcp(&mut self, host: String, port: u16) {
        self.source_type = "tcp".to_string();
        self.tcp_host = Some(host);
        self.tcp_port = Some(port);
    }

    /// Update NMEA log file settings
    pub fn update_file(&mut self, path: String) {
        self.source_type = "file".to_string();
        self.nmea_file = Some(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::default();

        assert_eq!(config.source_type, "serial");
        assert_eq!(config.window_size, 10);
    }

    #[test]
    fn test_update_serial() {
        let mut config = TrackerConfig::default();
        config.update_serial("/dev/ttyACM0".to_string(), 115200);

        assert_eq!(config.source_type, "serial");
        assert_eq!(config.serial_port, Some("/dev/ttyACM0".to_string()));
        assert_eq!(config.serial_baudrate, Some(115200));
    }

    #[test]
    fn test_update_tcp() {
        let mut config = TrackerConfig::default();
        config.update_tcp("gps.local".to_string(), 10110);

        assert_eq!(config.source_type, "tcp");

        match config.source().unwrap() {
            GpsSource::Tcp { host, port } => {
                assert_eq!(host, "gps.local");
                assert_eq!(port, 10110);
            }
            other => panic!("expected TCP source, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_source_type() {
        let mut config = TrackerConfig::default();
        config.source_type = "carrier-pigeon".to_string();

        assert!(config.source().is_err());
    }

    #[test]
    fn test_missing_file_path() {
        let mut config = TrackerConfig::default();
        config.source_type = "file".to_string();

        assert!(config.source().is_err());
    }
}
