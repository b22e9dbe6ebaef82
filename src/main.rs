// src/main.rs
//! GPS Tracker - streaming NMEA position tracker with rolling averaging

use clap::Parser;
use gps_tracker::{config::TrackerConfig, error::GpsError, monitor, GpsMonitor, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gps-tracker", version, about = "Streaming NMEA position tracker with a rolling spherical-average position")]
struct Cli {
    /// Serial port to read NMEA sentences from (e.g. /dev/ttyUSB0)
    #[arg(long, value_name = "PORT")]
    serial: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = 9600)]
    baud: u32,

    /// TCP endpoint serving raw NMEA sentences, as host:port
    #[arg(long, value_name = "HOST:PORT")]
    tcp: Option<String>,

    /// NMEA log file to replay
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Number of fixes in the averaging window
    #[arg(long, value_name = "N")]
    window: Option<usize>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

fn parse_tcp_endpoint(endpoint: &str) -> Result<(String, u16)> {
    let (host, port) = endpoint
        .rsplit_once(':')
        .ok_or_else(|| GpsError::Parse(format!("Expected host:port, got '{}'", endpoint)))?;

    let port = port
        .parse::<u16>()
        .map_err(|_| GpsError::Parse(format!("Invalid TCP port: '{}'", port)))?;

    Ok((host.to_string(), port))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_ports {
        return monitor::list_serial_ports().await;
    }

    let mut config = TrackerConfig::load().unwrap_or_default();

    if let Some(port) = cli.serial {
        config.update_serial(port, cli.baud);
    } else if let Some(endpoint) = cli.tcp.as_deref() {
        let (host, port) = parse_tcp_endpoint(endpoint)?;
        config.update_tcp(host, port);
    } else if let Some(path) = cli.file {
        config.update_file(path.to_string_lossy().into_owned());
    }

    if let Some(window) = cli.window {
        config.window_size = window;
    }

    let source = config.source()?;

    println!("Starting GPS Tracker...");
    println!("Using {} source, averaging over {} fixes", config.source_type, config.window_size);

    let gps = GpsMonitor::new(config.window_size);
    gps.start(source).await?;
    gps.run_display().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tcp_endpoint() {
        let (host, port) = parse_tcp_endpoint("gps.local:10110").unwrap();
        assert_eq!(host, "gps.local");
        assert_eq!(port, 10110);

        assert!(parse_tcp_endpoint("no-port").is_err());
        assert!(parse_tcp_endpoint("host:notanumber").is_err());
    }
}
