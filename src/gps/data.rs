// src/gps/data.rs
//! GPS data structures and utilities

use std::fmt;

/// A single validated position fix in decimal degrees.
///
/// Uses the standard sign convention of positive for North and East and
/// negative for South and West. Latitude is within [-90, 90] and longitude
/// within [-180, 180]; on the ingest path a `Fix` is only ever produced by
/// the NMEA parser after range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    latitude: f64,
    longitude: f64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Fix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12.6}°, {:>12.6}°", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SatelliteInfo {
    pub prn: u8,                 // Satellite PRN/ID number
    pub elevation: Option<f32>,  // Elevation angle in degrees
    pub azimuth: Option<f32>,    // Azimuth angle in degrees
    pub snr: Option<f32>,        // Signal-to-noise ratio in dB
}

impl SatelliteInfo {
    pub fn new(prn: u8) -> Self {
        Self {
            prn,
            elevation: None,
            azimuth: None,
            snr: None,
        }
    }

    pub fn signal_strength_description(&self) -> String {
        match self.snr {
            Some(snr) if snr >= 40.0 => "Excellent".to_string(),
            Some(snr) if snr >= 35.0 => "Good".to_string(),
            Some(snr) if snr >= 25.0 => "Fair".to_string(),
            Some(snr) if snr >= 15.0 => "Poor".to_string(),
            Some(_) => "Very Poor".to_string(),
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_accessors() {
        let fix = Fix::new(51.595578, 1.131);
        assert_eq!(fix.latitude(), 51.595578);
        assert_eq!(fix.longitude(), 1.131);
    }

    #[test]
    fn test_signal_strength_description() {
        let mut sat = SatelliteInfo::new(1);
        assert_eq!(sat.signal_strength_description(), "Unknown");
        sat.snr = Some(46.0);
        assert_eq!(sat.signal_strength_description(), "Excellent");
        sat.snr = Some(20.0);
        assert_eq!(sat.signal_strength_description(), "Poor");
    }
}
