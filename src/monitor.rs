// src/monitor.rs
//! Main position monitor coordination

use crate::{
    display::terminal::TerminalDisplay,
    error::{GpsError, Result},
    gps::{
        data::SatelliteInfo,
        nmea::{self, Sentence},
        Fix,
    },
    tracker::PositionTracker,
};
use chrono::{DateTime, Utc};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    net::TcpStream,
    task::JoinHandle,
};
use tokio_serial::SerialPortBuilderExt;

/// NMEA line source configuration
#[derive(Debug, Clone)]
pub enum GpsSource {
    Serial { port: String, baudrate: u32 },
    Tcp { host: String, port: u16 },
    File { path: PathBuf },
}

/// Everything the ingestion task maintains, guarded by a single lock.
///
/// The tracker window is the authoritative position state; the rest is
/// telemetry for the display. Mutations happen only through `ingest`, one
/// whole line per critical section, so readers always observe a window
/// that is either before or after a complete evict/append step.
#[derive(Debug, Clone)]
pub struct MonitorState {
    pub tracker: PositionTracker,
    pub satellites: Vec<SatelliteInfo>,
    pub source: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
    pub raw_history: Vec<String>,
    pub sentences_seen: u64,
    pub fixes_accepted: u64,
}

impl MonitorState {
    pub fn new(window: usize) -> Self {
        Self {
            tracker: PositionTracker::new(window),
            satellites: Vec::new(),
            source: None,
            last_update: None,
            raw_history: Vec::new(),
            sentences_seen: 0,
            fixes_accepted: 0,
        }
    }

    /// Fold one raw sentence line into the state.
    ///
    /// Unusable lines still count as seen and show up in the raw history;
    /// they never touch the tracker window.
    fn ingest(&mut self, line: &str, source: &str) {
        self.sentences_seen += 1;
        self.last_update = Some(Utc::now());
        self.source = Some(source.to_string());
        self.add_raw_sentence(line);

        match nmea::parse_sentence(line) {
            Sentence::Fix(fix) => {
                self.tracker.record(fix);
                self.fixes_accepted += 1;
            }
            Sentence::Satellites(satellites) => {
                self.satellites = satellites;
            }
            Sentence::NotUsable => {}
        }
    }

    /// Add a raw NMEA sentence to history (keep last 5)
    fn add_raw_sentence(&mut self, line: &str) {
        self.raw_history.push(line.to_string());

        if self.raw_history.len() > 5 {
            self.raw_history.remove(0);
        }
    }
}

/// Position monitor that coordinates line ingestion and queries.
pub struct GpsMonitor {
    state: Arc<RwLock<MonitorState>>,
    running: Arc<AtomicBool>,
}

impl GpsMonitor {
    /// Create a new monitor averaging over a window of `window` fixes.
    pub fn new(window: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(MonitorState::new(window))),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start ingesting NMEA lines from the specified source.
    pub async fn start(&self, source: GpsSource) -> Result<()> {
        match source {
            GpsSource::Serial { port, baudrate } => {
                self.connect_serial(&port, baudrate).await?;
            }
            GpsSource::Tcp { host, port } => {
                self.connect_tcp(&host, port).await?;
            }
            GpsSource::File { path } => {
                self.connect_file(&path).await?;
            }
        }
        Ok(())
    }

    /// Start the terminal display loop.
    pub async fn run_display(&self) -> Result<()> {
        let terminal_display = TerminalDisplay::new();
        terminal_display.run(Arc::clone(&self.state), Arc::clone(&self.running)).await
    }

    /// Connect to a GPS device via serial port
    async fn connect_serial(&self, port: &str, baudrate: u32) -> Result<()> {
        println!("Connecting to GPS on {} at {} baud...", port, baudrate);

        let serial = tokio_serial::new(port, baudrate)
            .timeout(Duration::from_millis(1000))
            .open_native_async()
            .map_err(|e| GpsError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

        println!("Connected successfully!");

        self.spawn_line_reader(serial, "Serial GPS");
        Ok(())
    }

    /// Connect to a TCP server feeding raw NMEA sentences
    async fn connect_tcp(&self, host: &str, port: u16) -> Result<()> {
        println!("Connecting to NMEA stream at {}:{}...", host, port);

        let stream = TcpStream::connect(format!("{}:{}", host, port))
            .await
            .map_err(|e| GpsError::Connection(format!("Failed to connect to {}:{}: {}", host, port, e)))?;

        println!("Connected successfully!");

        self.spawn_line_reader(stream, "Network GPS");
        Ok(())
    }

    /// Replay NMEA sentences from a log file
    async fn connect_file(&self, path: &std::path::Path) -> Result<()> {
        println!("Replaying NMEA log from {}...", path.display());

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| GpsError::Connection(format!("Failed to open {}: {}", path.display(), e)))?;

        self.spawn_line_reader(file, "NMEA log");
        Ok(())
    }

    /// Spawn the background task that pulls lines from `input` into the
    /// shared state until EOF, a read error, or `stop` is called.
    ///
    /// Lines are read as raw bytes and decoded lossily: a burst of binary
    /// garbage on the wire becomes an unusable sentence for that line
    /// instead of ending the task.
    fn spawn_line_reader<R>(&self, input: R, source: &'static str) -> JoinHandle<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);

        tokio::spawn(async move {
            let mut reader = BufReader::new(input);
            let mut buf = Vec::new();

            while running.load(Ordering::Relaxed) {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break, // EOF
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        let line = line.trim();
                        if !line.is_empty() {
                            state.write().unwrap().ingest(line, source);
                        }
                    }
                    Err(e) => {
                        eprintln!("Error reading from {}: {}", source, e);
                        break;
                    }
                }
            }
        })
    }

    /// Stop the monitor
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Check if the monitor is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// The current averaged position, if any fix has been recorded yet.
    pub fn current_position(&self) -> Option<Fix> {
        self.state.read().unwrap().tracker.current_position()
    }

    /// Get a clone of the current monitor state
    pub fn state(&self) -> MonitorState {
        self.state.read().unwrap().clone()
    }
}

/// List available serial ports
pub async fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| GpsError::Other(format!("Failed to list serial ports: {}", e)))?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GGA: &str = "$GPGGA,224904.054,5159.5578,N,001131.000,E,1,04";
    const GSV: &str = "$GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75";

    #[test]
    fn test_ingest_records_fix() {
        let mut state = MonitorState::new(4);

        state.ingest(GGA, "test");

        assert_eq!(state.tracker.len(), 1);
        assert_eq!(state.fixes_accepted, 1);
        assert_eq!(state.sentences_seen, 1);
        assert!(state.last_update.is_some());

        let position = state.tracker.current_position().unwrap();
        assert!((position.latitude() - 51.595578).abs() < 1e-9);
        assert!((position.longitude() - 1.131).abs() < 1e-9);
    }

    #[test]
    fn test_ingest_ignores_unusable_lines() {
        let mut state = MonitorState::new(4);

        state.ingest("$GPGGA,abc,xx,N,yyy,E,1,04", "test");
        state.ingest("complete garbage", "test");

        assert_eq!(state.sentences_seen, 2);
        assert_eq!(state.fixes_accepted, 0);
        assert_eq!(state.tracker.len(), 0);
        assert_eq!(state.tracker.current_position(), None);
    }

    #[test]
    fn test_ingest_updates_satellites_without_fix() {
        let mut state = MonitorState::new(4);

        state.ingest(GSV, "test");

        assert_eq!(state.satellites.len(), 4);
        assert_eq!(state.tracker.len(), 0);
    }

    #[test]
    fn test_raw_history_keeps_last_five() {
        let mut state = MonitorState::new(4);
        for i in 0..7 {
            state.ingest(&format!("$GPXXX,{}", i), "test");
        }

        assert_eq!(state.raw_history.len(), 5);
        assert_eq!(state.raw_history[0], "$GPXXX,2");
        assert_eq!(state.raw_history[4], "$GPXXX,6");
    }

    #[tokio::test]
    async fn test_reader_task_feeds_tracker() {
        let monitor = GpsMonitor::new(4);
        let stream: &[u8] = b"$GPGGA,224904.054,5159.5578,N,001131.000,E,1,04\n\
            $GPGSV,3,1,12,01,40,083,46,02,17,308,41,12,07,344,39,14,22,228,45*75\n\
            \xff\xfe\xfd\n\
            $GPGGA,abc,xx,N,yyy,E,1,04\n\
            $GPGGA,224905.054,5159.5580,N,001131.200,E,1,04\n";

        let handle = monitor.spawn_line_reader(std::io::Cursor::new(stream.to_vec()), "test");
        handle.await.unwrap();

        let state = monitor.state();
        assert_eq!(state.sentences_seen, 5);
        assert_eq!(state.fixes_accepted, 2);
        assert_eq!(state.tracker.len(), 2);
        assert_eq!(state.satellites.len(), 4);
        assert!(monitor.current_position().is_some());
    }

    #[tokio::test]
    async fn test_stopped_monitor_reads_nothing() {
        let monitor = GpsMonitor::new(4);
        monitor.stop();
        assert!(!monitor.is_running());

        let handle = monitor.spawn_line_reader(
            std::io::Cursor::new(b"$GPGGA,224904.054,5159.5578,N,001131.000,E,1,04\n".to_vec()),
            "test",
        );
        handle.await.unwrap();

        assert_eq!(monitor.state().sentences_seen, 0);
        assert_eq!(monitor.current_position(), None);
    }
}
