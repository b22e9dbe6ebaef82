// src/tracker.rs
//! Rolling-window position tracking with spherical averaging

use crate::gps::data::Fix;
use std::collections::VecDeque;

/// Bounded FIFO history of position fixes with on-demand averaging.
///
/// Holds at most `capacity` fixes; recording into a full window evicts the
/// oldest fix first. The averaged position is recomputed from the whole
/// window on every query, so repeated queries with no intervening record
/// return identical results.
#[derive(Debug, Clone)]
pub struct PositionTracker {
    capacity: usize,
    history: VecDeque<Fix>,
}

impl PositionTracker {
    /// Create a tracker averaging over at most `capacity` fixes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            history: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of fixes currently in the window.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Fixes currently in the window, oldest first.
    pub fn fixes(&self) -> impl Iterator<Item = &Fix> {
        self.history.iter()
    }

    /// Record a new fix, evicting the oldest when the window is full.
    pub fn record(&mut self, fix: Fix) {
        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(fix);
    }

    /// The average of the current window, computed on the sphere.
    ///
    /// Returns `None` until the first fix is recorded; a single fix comes
    /// back unchanged. Larger windows are averaged by summing Cartesian
    /// unit vectors and converting the mean vector back to latitude and
    /// longitude, which keeps clusters straddling the antimeridian or a
    /// pole from collapsing toward zero the way a plain arithmetic mean
    /// of raw degrees would.
    pub fn current_position(&self) -> Option<Fix> {
        match self.history.len() {
            0 => None,
            1 => self.history.front().copied(),
            count => {
                let mut x = 0.0_f64;
                let mut y = 0.0_f64;
                let mut z = 0.0_f64;

                for fix in &self.history {
                    let lat = fix.latitude().to_radians();
                    let lon = fix.longitude().to_radians();
                    x += lat.cos() * lon.cos();
                    y += lat.cos() * lon.sin();
                    z += lat.sin();
                }

                let n = count as f64;
                x /= n;
                y /= n;
                z /= n;

                let latitude = z.atan2((x * x + y * y).sqrt()).to_degrees();
                let longitude = y.atan2(x).to_degrees();

                Some(Fix::new(latitude, longitude))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(lat: f64, lon: f64) -> Fix {
        Fix::new(lat, lon)
    }

    #[test]
    fn test_empty_window_has_no_position() {
        let tracker = PositionTracker::new(10);
        assert_eq!(tracker.current_position(), None);
    }

    #[test]
    fn test_single_fix_returned_unchanged() {
        let mut tracker = PositionTracker::new(10);
        tracker.record(fix(51.595578, 1.131));

        assert_eq!(tracker.current_position(), Some(fix(51.595578, 1.131)));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut tracker = PositionTracker::new(3);
        for i in 0..5 {
            tracker.record(fix(i as f64, i as f64));
        }

        assert_eq!(tracker.len(), 3);
        let window: Vec<Fix> = tracker.fixes().copied().collect();
        assert_eq!(window, vec![fix(2.0, 2.0), fix(3.0, 3.0), fix(4.0, 4.0)]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut tracker = PositionTracker::new(0);
        tracker.record(fix(10.0, 20.0));

        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.current_position(), None);
    }

    #[test]
    fn test_query_is_idempotent() {
        let mut tracker = PositionTracker::new(4);
        tracker.record(fix(10.0, 20.0));
        tracker.record(fix(12.0, 22.0));
        tracker.record(fix(14.0, 24.0));

        assert_eq!(tracker.current_position(), tracker.current_position());
    }

    #[test]
    fn test_identical_fixes_average_to_themselves() {
        for count in 1..=6 {
            let mut tracker = PositionTracker::new(8);
            for _ in 0..count {
                tracker.record(fix(51.595578, 1.131));
            }

            let average = tracker.current_position().unwrap();
            assert!((average.latitude() - 51.595578).abs() < 1e-9);
            assert!((average.longitude() - 1.131).abs() < 1e-9);
        }
    }

    #[test]
    fn test_average_on_equator_bisects_longitudes() {
        let mut tracker = PositionTracker::new(4);
        tracker.record(fix(0.0, 10.0));
        tracker.record(fix(0.0, 20.0));

        let average = tracker.current_position().unwrap();
        assert!(average.latitude().abs() < 1e-9);
        assert!((average.longitude() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_cluster_does_not_collapse() {
        // A naive arithmetic mean of these longitudes would sit near 59,
        // nowhere close to the actual cluster at the antimeridian.
        let mut tracker = PositionTracker::new(4);
        tracker.record(fix(0.0, 179.0));
        tracker.record(fix(0.0, -179.0));
        tracker.record(fix(0.0, 178.0));

        let average = tracker.current_position().unwrap();
        assert!(average.longitude().abs() > 178.0);
        assert!(average.latitude().abs() < 1e-9);
    }

    #[test]
    fn test_polar_cluster_stays_near_pole() {
        let mut tracker = PositionTracker::new(4);
        tracker.record(fix(89.5, 0.0));
        tracker.record(fix(89.5, 90.0));
        tracker.record(fix(89.5, 180.0));
        tracker.record(fix(89.5, -90.0));

        let average = tracker.current_position().unwrap();
        assert!(average.latitude() > 89.5);
    }
}
