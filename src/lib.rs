// src/lib.rs
//! GPS Tracker Library
//!
//! A streaming NMEA position tracker that keeps a rolling window of the
//! most recent fixes and averages them on the sphere.

pub mod gps;
pub mod display;
pub mod monitor;
pub mod tracker;
pub mod config;
pub mod error;

// Re-export main types for convenience
pub use gps::data::Fix;
pub use monitor::{GpsMonitor, GpsSource};
pub use tracker::PositionTracker;
pub use error::{Result, GpsError};
