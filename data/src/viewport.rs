use crate::series::Series;
use crate::time::DAY_MS;

pub const MIN_DURATION_MS: i64 = 30 * DAY_MS;

/// Anchor for a series with no rows at all.
pub const EMPTY_ANCHOR_MS: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeRange {
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            start_ms: a.min(b),
            end_ms: a.max(b),
        }
    }

    pub fn span_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    pub fn center_ms(&self) -> i64 {
        self.start_ms + self.span_ms() / 2
    }

    fn shifted(self, delta_ms: i64) -> Self {
        Self {
            start_ms: self.start_ms.saturating_add(delta_ms),
            end_ms: self.end_ms.saturating_add(delta_ms),
        }
    }

    /// Widens a too-narrow range outward from its midpoint.
    pub fn at_least(self, min_span_ms: i64) -> Self {
        if self.span_ms() >= min_span_ms {
            return self;
        }
        let start_ms = self.center_ms() - min_span_ms / 2;
        Self {
            start_ms,
            end_ms: start_ms + min_span_ms,
        }
    }

    /// Slides (or shrinks) the range so it lies within `limits`.
    fn fit_within(self, limits: TimeRange) -> Self {
        if self.span_ms() >= limits.span_ms() {
            return limits;
        }
        if self.start_ms < limits.start_ms {
            self.shifted(limits.start_ms - self.start_ms)
        } else if self.end_ms > limits.end_ms {
            self.shifted(limits.end_ms - self.end_ms)
        } else {
            self
        }
    }
}

/// Visible time range of one chart. `None` until the first series arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Viewport {
    range: Option<TimeRange>,
    limits: Option<TimeRange>,
}

impl Viewport {
    pub fn current_range(&self) -> Option<TimeRange> {
        self.range
    }

    pub fn is_initialized(&self) -> bool {
        self.range.is_some()
    }

    /// Full, clamped extent of the series.
    pub fn full_extent(series: &Series) -> TimeRange {
        let (start, end) = series
            .extent()
            .unwrap_or((EMPTY_ANCHOR_MS, EMPTY_ANCHOR_MS));
        TimeRange::new(start, end).at_least(MIN_DURATION_MS)
    }

    /// Initializes to the series extent if no range has been set yet.
    pub fn initialize(&mut self, series: &Series) {
        if self.range.is_none() {
            self.reset(series);
        }
    }

    pub fn reset(&mut self, series: &Series) {
        let extent = Self::full_extent(series);
        self.limits = Some(extent);
        self.range = Some(extent);
    }

    /// Requests narrower than [`MIN_DURATION_MS`] are clamped, never rejected.
    pub fn set_range(&mut self, range: TimeRange) {
        self.range = Some(range.at_least(MIN_DURATION_MS));
    }

    pub fn pan(&mut self, delta_ms: i64) {
        let Some(range) = self.range else {
            return;
        };
        self.apply_gesture(range.shifted(delta_ms));
    }

    /// `factor < 1` zooms in. The anchor keeps its relative position.
    pub fn zoom(&mut self, factor: f64, anchor_ms: i64) {
        let Some(range) = self.range else {
            return;
        };
        if !factor.is_finite() || factor <= 0.0 {
            log::debug!("Ignoring zoom factor {factor}");
            return;
        }

        let span = range.span_ms().max(1) as f64;
        let anchor_ms = anchor_ms.clamp(range.start_ms, range.end_ms);
        let frac = (anchor_ms - range.start_ms) as f64 / span;

        let new_span = (span * factor).round() as i64;
        let start_ms = anchor_ms - (frac * new_span as f64).round() as i64;

        self.apply_gesture(TimeRange::new(start_ms, start_ms + new_span));
    }

    fn apply_gesture(&mut self, requested: TimeRange) {
        let mut range = requested.at_least(MIN_DURATION_MS);
        if let Some(limits) = self.limits {
            range = range.fit_within(limits);
        }
        self.range = Some(range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::date_to_ms;
    use chrono::NaiveDate;
    use feed::RawRecord;

    fn series_over(days: u32) -> Series {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let records: Vec<_> = (0..days)
            .map(|d| RawRecord::new(start + chrono::Days::new(d as u64)))
            .collect();
        Series::build(&records)
    }

    fn start_ms() -> i64 {
        date_to_ms(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
    }

    #[test]
    fn initializes_to_full_extent() {
        let series = series_over(90);
        let mut viewport = Viewport::default();
        assert_eq!(viewport.current_range(), None);

        viewport.initialize(&series);
        let range = viewport.current_range().unwrap();
        assert_eq!(range.start_ms, start_ms());
        assert_eq!(range.end_ms, start_ms() + 89 * DAY_MS);
    }

    #[test]
    fn initialize_keeps_existing_range() {
        let series = series_over(90);
        let mut viewport = Viewport::default();
        viewport.initialize(&series);
        viewport.set_range(TimeRange::new(start_ms(), start_ms() + 40 * DAY_MS));

        viewport.initialize(&series);
        assert_eq!(viewport.current_range().unwrap().span_ms(), 40 * DAY_MS);
    }

    #[test]
    fn narrow_request_is_clamped_around_midpoint() {
        let mut viewport = Viewport::default();
        let requested = TimeRange::new(start_ms(), start_ms() + 10 * DAY_MS);
        viewport.set_range(requested);

        let range = viewport.current_range().unwrap();
        assert_eq!(range.span_ms(), MIN_DURATION_MS);
        assert_eq!(range.center_ms(), requested.center_ms());
    }

    #[test]
    fn wide_request_is_kept() {
        let mut viewport = Viewport::default();
        let requested = TimeRange::new(start_ms(), start_ms() + 45 * DAY_MS);
        viewport.set_range(requested);
        assert_eq!(viewport.current_range(), Some(requested));
    }

    #[test]
    fn single_row_expands_around_its_date() {
        let series = series_over(1);
        let range = Viewport::full_extent(&series);
        assert_eq!(range.span_ms(), MIN_DURATION_MS);
        assert_eq!(range.center_ms(), start_ms());
    }

    #[test]
    fn empty_series_is_anchored_at_epoch() {
        let range = Viewport::full_extent(&Series::default());
        assert_eq!(range.span_ms(), MIN_DURATION_MS);
        assert_eq!(range.center_ms(), EMPTY_ANCHOR_MS);
    }

    #[test]
    fn pan_stays_inside_series_extent() {
        let series = series_over(120);
        let mut viewport = Viewport::default();
        viewport.initialize(&series);
        viewport.set_range(TimeRange::new(start_ms(), start_ms() + 40 * DAY_MS));

        viewport.pan(10 * DAY_MS);
        assert_eq!(
            viewport.current_range(),
            Some(TimeRange::new(start_ms() + 10 * DAY_MS, start_ms() + 50 * DAY_MS))
        );

        viewport.pan(-1_000 * DAY_MS);
        assert_eq!(
            viewport.current_range(),
            Some(TimeRange::new(start_ms(), start_ms() + 40 * DAY_MS))
        );
    }

    #[test]
    fn zoom_respects_minimum_and_extent() {
        let series = series_over(120);
        let mut viewport = Viewport::default();
        viewport.initialize(&series);
        let full = viewport.current_range().unwrap();

        viewport.zoom(0.01, full.center_ms());
        assert_eq!(viewport.current_range().unwrap().span_ms(), MIN_DURATION_MS);

        viewport.zoom(100.0, full.center_ms());
        assert_eq!(viewport.current_range(), Some(full));
    }

    #[test]
    fn zoom_keeps_anchor_position() {
        let series = series_over(200);
        let mut viewport = Viewport::default();
        viewport.initialize(&series);
        let before = viewport.current_range().unwrap();

        let anchor = before.start_ms + before.span_ms() / 4;
        viewport.zoom(0.5, anchor);
        let after = viewport.current_range().unwrap();

        assert_eq!(after.span_ms(), before.span_ms() / 2);
        let frac = (anchor - after.start_ms) as f64 / after.span_ms() as f64;
        assert!((frac - 0.25).abs() < 1e-6);
    }

    #[test]
    fn gestures_before_initialization_are_ignored() {
        let mut viewport = Viewport::default();
        viewport.pan(DAY_MS);
        viewport.zoom(0.5, 0);
        assert_eq!(viewport.current_range(), None);
    }
}
