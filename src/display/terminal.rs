// src/display/terminal.rs
//! Terminal-based display implementation

use crate::{
    error::{GpsError, Result},
    monitor::MonitorState,
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    time::Duration,
};
use tokio::time::sleep;

pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Start the terminal display loop
    pub async fn run(
        &self,
        state: Arc<RwLock<MonitorState>>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap)
            .map_err(GpsError::Io)?;

        // Set up Ctrl+C handler
        let running_clone = Arc::clone(&running);
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.unwrap();
            running_clone.store(false, Ordering::Relaxed);
        });

        while running.load(Ordering::Relaxed) {
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))
                .map_err(GpsError::Io)?;

            let snapshot = state.read().unwrap().clone();
            self.render_display(&mut stdout, &snapshot)?;

            stdout.flush().map_err(GpsError::Io)?;
            sleep(Duration::from_secs(1)).await;
        }

        execute!(stdout, Show, EnableLineWrap)
            .map_err(GpsError::Io)?;
        println!("\nShutting down...");
        if let Some(position) = state.read().unwrap().tracker.current_position() {
            println!("Final averaged position: {}", position);
        }
        Ok(())
    }

    /// Render the monitor state to the terminal
    fn render_display(&self, stdout: &mut impl Write, state: &MonitorState) -> Result<()> {
        // Header
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("GPS Tracker - Rolling Average Position (Rust)"),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        ).map_err(GpsError::Io)?;

        // Timestamp and source
        let timestamp_str = match state.last_update {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "No data received".to_string(),
        };
        let source_str = state.source.as_deref().unwrap_or("Unknown");
        execute!(
            stdout,
            Print(format!("Last Update: {} ({})\n\n", timestamp_str, source_str))
        ).map_err(GpsError::Io)?;

        self.render_position_section(stdout, state)?;
        self.render_satellite_section(stdout, state)?;
        self.render_raw_data_section(stdout, state)?;

        // Footer
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        ).map_err(GpsError::Io)?;

        Ok(())
    }

    fn render_position_section(&self, stdout: &mut impl Write, state: &MonitorState) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("AVERAGED POSITION:\n"),
            ResetColor
        ).map_err(GpsError::Io)?;

        let position = state.tracker.current_position();

        execute!(
            stdout,
            Print(format!("  Latitude:  {}\n", Self::format_coordinate(position.map(|p| p.latitude()))))
        ).map_err(GpsError::Io)?;

        execute!(
            stdout,
            Print(format!("  Longitude: {}\n", Self::format_coordinate(position.map(|p| p.longitude()))))
        ).map_err(GpsError::Io)?;

        execute!(
            stdout,
            Print(format!(
                "  Window:    {:>6} of {} fixes\n",
                state.tracker.len(),
                state.tracker.capacity()
            ))
        ).map_err(GpsError::Io)?;

        execute!(
            stdout,
            Print(format!(
                "  Sentences: {:>6}   Fixes accepted: {}\n\n",
                state.sentences_seen, state.fixes_accepted
            ))
        ).map_err(GpsError::Io)?;

        Ok(())
    }

    fn render_satellite_section(&self, stdout: &mut impl Write, state: &MonitorState) -> Result<()> {
        if state.satellites.is_empty() {
            return Ok(());
        }

        execute!(
            stdout,
            SetForegroundColor(Color::Magenta),
            Print(format!("SATELLITES ({} in view):\n", state.satellites.len())),
            ResetColor
        ).map_err(GpsError::Io)?;

        for sat in state.satellites.iter().take(8) {
            execute!(
                stdout,
                Print(format!(
                    "  PRN {:02}  elev {}  azim {}  SNR {}  {}\n",
                    sat.prn,
                    Self::format_angle(sat.elevation),
                    Self::format_angle(sat.azimuth),
                    Self::format_snr(sat.snr),
                    sat.signal_strength_description()
                ))
            ).map_err(GpsError::Io)?;
        }

        execute!(stdout, Print("\n")).map_err(GpsError::Io)?;
        Ok(())
    }

    fn render_raw_data_section(&self, stdout: &mut impl Write, state: &MonitorState) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print("RAW DATA:\n"),
            ResetColor
        ).map_err(GpsError::Io)?;

        if state.raw_history.is_empty() {
            execute!(stdout, Print("  (no sentences yet)\n")).map_err(GpsError::Io)?;
        }

        for line in &state.raw_history {
            execute!(stdout, Print(format!("  {}\n", line))).map_err(GpsError::Io)?;
        }

        execute!(stdout, Print("\n")).map_err(GpsError::Io)?;
        Ok(())
    }

    fn format_coordinate(coord: Option<f64>) -> String {
        match coord {
            Some(val) => format!("{:>12.6}°", val),
            None => "No fix yet".to_string(),
        }
    }

    fn format_angle(angle: Option<f32>) -> String {
        match angle {
            Some(val) => format!("{:>3.0}°", val),
            None => "  --".to_string(),
        }
    }

    fn format_snr(snr: Option<f32>) -> String {
        match snr {
            Some(val) => format!("{:>2.0} dB", val),
            None => "-- dB".to_string(),
        }
    }
}
