//! Time-indexed scalar series and gap reconstruction
//!
//! A [TimeSeries] is a single physical variable sampled at irregular times,
//! with `NaN` marking the missing samples. [TimeSeries::reconstruct_gaps]
//! fills the interior gaps by time-weighted linear interpolation, producing a
//! synthetic series suitable for overlay plotting.

use chrono::{Duration, NaiveDateTime};
use itertools::Itertools;

/// A single variable sampled at (possibly irregular) ascending times
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    pub name: String,
    pub time: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
}
impl TimeSeries {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    pub fn push(&mut self, time: NaiveDateTime, value: f64) {
        self.time.push(time);
        self.values.push(value);
    }
    /// Splits the series into contiguous runs of valid samples
    ///
    /// Missing samples act as separators; plotting each run as its own line
    /// keeps the gaps visible instead of bridging them.
    pub fn segments(&self) -> Vec<Vec<(NaiveDateTime, f64)>> {
        let mut segments = vec![];
        let mut current: Vec<(NaiveDateTime, f64)> = vec![];
        for (&time, &value) in self.time.iter().zip(&self.values) {
            if value.is_nan() {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            } else {
                current.push((time, value));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
    /// Reconstructs the interior gaps of the series
    ///
    /// A gap run opens at the last valid sample before a missing stretch and
    /// closes at the first valid sample after it. Each closed run is emitted
    /// as its bounding samples plus time-weighted linearly interpolated values
    /// in between, followed by one sentinel `NaN` sample 1s past the run so
    /// that consecutive runs never draw as a single connected line.
    ///
    /// A run whose opening sample is itself missing (the series starts inside
    /// a gap) has no left bound and is skipped; a run still open when the
    /// series ends is never emitted.
    pub fn reconstruct_gaps(&self) -> TimeSeries {
        let mut reconstructed = TimeSeries::new(self.name.clone());
        let mut gap_start: Option<usize> = None;
        for (this, next) in (0..self.len()).tuple_windows() {
            if self.values[next].is_nan() {
                gap_start.get_or_insert(this);
                continue;
            }
            let Some(start) = gap_start.take() else {
                continue;
            };
            if self.values[start].is_nan() {
                continue;
            }
            let (t0, v0) = (self.time[start], self.values[start]);
            let (t1, v1) = (self.time[next], self.values[next]);
            let span = (t1 - t0).num_milliseconds() as f64;
            for k in start..=next {
                let value = if self.values[k].is_nan() {
                    let elapsed = (self.time[k] - t0).num_milliseconds() as f64;
                    v0 + (v1 - v0) * elapsed / span
                } else {
                    self.values[k]
                };
                reconstructed.push(self.time[k], value);
            }
            reconstructed.push(t1 + Duration::seconds(1), f64::NAN);
        }
        reconstructed
    }
}
