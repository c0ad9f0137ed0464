pub mod panel;

use crate::series::Series;
use crate::tracker::{ChannelValues, Pointer, Tracker, values_at};
use crate::viewport::{TimeRange, Viewport};

use feed::Metric;
use iced_core::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];
}

/// One plotted metric: actual line, dashed model line and confidence band.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSpec {
    pub metric: Metric,
    pub label: String,
    pub projected_label: String,
    pub color: Color,
}

impl SideSpec {
    pub fn new(metric: Metric, label: impl Into<String>, color: Color) -> Self {
        let label = label.into();
        Self {
            metric,
            projected_label: format!("Projected {label}"),
            label,
            color,
        }
    }
}

/// Channel pairing of one dual-axis chart. Either side may be left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub left: Option<SideSpec>,
    pub right: Option<SideSpec>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            left: None,
            right: None,
        }
    }

    pub fn left(mut self, side: SideSpec) -> Self {
        self.left = Some(side);
        self
    }

    pub fn right(mut self, side: SideSpec) -> Self {
        self.right = Some(side);
        self
    }

    pub fn side(&self, side: Side) -> Option<&SideSpec> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        Side::ALL
            .iter()
            .filter_map(|&side| self.side(side).map(|s| s.metric))
            .collect()
    }

    pub fn scale(&self, side: Side, series: &Series) -> Option<AxisScale> {
        self.side(side)
            .map(|spec| AxisScale::for_metric(series, spec.metric))
    }

    /// Tracked-row values while tracking, `defaults` otherwise.
    pub fn legend(&self, state: &ChartState, series: &Series, defaults: &Defaults) -> Legend {
        let snapshot = state
            .tracker()
            .time_ms()
            .and_then(|t| values_at(series, t, &self.metrics()));

        let side_legend = |side: Side| {
            let spec = self.side(side)?;
            let values = match &snapshot {
                Some(snapshot) => snapshot.get(spec.metric).cloned().unwrap_or_default(),
                None => defaults.get(side).clone(),
            };
            Some(SideLegend {
                label: spec.label.clone(),
                projected_label: spec.projected_label.clone(),
                actual: values.actual_or_na().to_string(),
                modeled: values.modeled_or_na().to_string(),
                color: spec.color,
            })
        };

        Legend {
            left: side_legend(Side::Left),
            right: side_legend(Side::Right),
        }
    }
}

/// Linear value axis floored at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
}

impl AxisScale {
    pub fn for_metric(series: &Series, metric: Metric) -> Self {
        let max = [series.max_actual(metric), series.max_modeled(metric)]
            .into_iter()
            .flatten()
            .reduce(f64::max)
            .filter(|max| *max > 0.0)
            .unwrap_or(1.0);

        Self { min: 0.0, max }
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min).max(f64::EPSILON)
    }

    /// Fraction of the axis height from the bottom, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Idle,
    Tracking,
}

/// How strongly a metric's lines are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Highlighted,
    Dimmed,
}

/// Per-instance viewport, cursor and legend focus, changed only through the transitions below.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartState {
    viewport: Viewport,
    tracker: Tracker,
    highlight: Option<Metric>,
    selection: Option<Metric>,
}

impl ChartState {
    pub fn phase(&self) -> Phase {
        if !self.viewport.is_initialized() {
            Phase::Uninitialized
        } else if self.tracker.is_tracking() {
            Phase::Tracking
        } else {
            Phase::Idle
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn range(&self) -> Option<TimeRange> {
        self.viewport.current_range()
    }

    pub fn pointer(&self) -> Option<Pointer> {
        self.tracker.pointer()
    }

    pub fn highlight(&self) -> Option<Metric> {
        self.highlight
    }

    pub fn selection(&self) -> Option<Metric> {
        self.selection
    }

    /// A selection wins over a hover highlight and dims every other metric.
    pub fn emphasis(&self, metric: Metric) -> Emphasis {
        match (self.selection, self.highlight) {
            (Some(selected), _) if selected == metric => Emphasis::Highlighted,
            (Some(_), _) => Emphasis::Dimmed,
            (None, Some(hovered)) if hovered == metric => Emphasis::Highlighted,
            _ => Emphasis::Normal,
        }
    }

    /// Range the viewport would settle on after panning by `delta_ms`, clamping included.
    pub fn range_after_pan(&self, delta_ms: i64) -> Option<TimeRange> {
        let mut viewport = self.viewport.clone();
        viewport.pan(delta_ms);
        viewport.current_range()
    }

    pub fn initialize(&mut self, series: &Series) {
        self.viewport.initialize(series);
    }

    /// A new series replaces the old one wholesale. The selection is kept.
    pub fn reset(&mut self, series: &Series) {
        self.viewport.reset(series);
        self.tracker = Tracker::Idle;
        self.highlight = None;
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, time_ms: i64) {
        if self.phase() == Phase::Uninitialized {
            return;
        }
        self.tracker.on_pointer_move(x, y, time_ms);
    }

    pub fn tracker_changed(&mut self, time_ms: Option<i64>) {
        self.tracker.on_tracker_time_changed(time_ms);
    }

    /// The tracked time is a calendar time and survives pan/zoom.
    pub fn pan(&mut self, delta_ms: i64) {
        self.viewport.pan(delta_ms);
    }

    pub fn zoom(&mut self, factor: f64, anchor_ms: i64) {
        self.viewport.zoom(factor, anchor_ms);
    }

    pub fn reset_view(&mut self, series: &Series) {
        self.viewport.reset(series);
    }

    pub fn highlight_changed(&mut self, metric: Option<Metric>) {
        self.highlight = metric;
    }

    /// Selecting the selected metric again clears it.
    pub fn selection_toggled(&mut self, metric: Metric) {
        self.selection = (self.selection != Some(metric)).then_some(metric);
    }

    pub fn selection_cleared(&mut self) {
        self.selection = None;
    }
}

/// Caller-supplied values shown while nothing is tracked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub left: ChannelValues,
    pub right: ChannelValues,
}

impl Defaults {
    pub fn get(&self, side: Side) -> &ChannelValues {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideLegend {
    pub label: String,
    pub projected_label: String,
    pub actual: String,
    pub modeled: String,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    pub left: Option<SideLegend>,
    pub right: Option<SideLegend>,
}

impl Legend {
    pub fn get(&self, side: Side) -> Option<&SideLegend> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{DAY_MS, date_to_ms};
    use chrono::NaiveDate;
    use feed::{RawMetric, RawRecord};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 7, d).unwrap()
    }

    fn series() -> Series {
        Series::build(&[
            RawRecord::new(day(1))
                .with(Metric::Death, RawMetric::actual(100.0).with_model(150.0, 120.0, 180.0))
                .with(Metric::DeathIncrease, RawMetric::actual(8.0)),
            RawRecord::new(day(2))
                .with(Metric::Death, RawMetric::actual(108.0))
                .with(Metric::DeathIncrease, RawMetric::actual(0.0)),
        ])
    }

    fn spec() -> ChartSpec {
        ChartSpec::new("Deaths")
            .left(SideSpec::new(Metric::Death, "Total Deaths", Color::from_rgb(1.0, 0.0, 0.0)))
            .right(SideSpec::new(Metric::DeathIncrease, "Daily Deaths", Color::from_rgb(0.0, 0.0, 1.0)))
    }

    #[test]
    fn state_machine_transitions() {
        let series = series();
        let mut state = ChartState::default();
        assert_eq!(state.phase(), Phase::Uninitialized);

        state.pointer_moved(1.0, 1.0, date_to_ms(day(1)));
        assert_eq!(state.phase(), Phase::Uninitialized);

        state.initialize(&series);
        assert_eq!(state.phase(), Phase::Idle);

        state.pointer_moved(5.0, 6.0, date_to_ms(day(2)));
        assert_eq!(state.phase(), Phase::Tracking);

        state.zoom(0.5, date_to_ms(day(1)));
        state.pan(1_000);
        assert_eq!(state.phase(), Phase::Tracking);
        assert_eq!(state.tracker().time_ms(), Some(date_to_ms(day(2))));

        state.tracker_changed(None);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.pointer(), None);
    }

    #[test]
    fn selection_outweighs_highlight() {
        let mut state = ChartState::default();
        assert_eq!(state.emphasis(Metric::Death), Emphasis::Normal);

        state.highlight_changed(Some(Metric::DeathIncrease));
        assert_eq!(state.emphasis(Metric::DeathIncrease), Emphasis::Highlighted);
        assert_eq!(state.emphasis(Metric::Death), Emphasis::Normal);

        state.selection_toggled(Metric::Death);
        assert_eq!(state.selection(), Some(Metric::Death));
        assert_eq!(state.emphasis(Metric::Death), Emphasis::Highlighted);
        assert_eq!(state.emphasis(Metric::DeathIncrease), Emphasis::Dimmed);

        state.selection_toggled(Metric::DeathIncrease);
        assert_eq!(state.selection(), Some(Metric::DeathIncrease));

        state.selection_toggled(Metric::DeathIncrease);
        assert_eq!(state.selection(), None);

        state.selection_toggled(Metric::Death);
        state.selection_cleared();
        assert_eq!(state.selection(), None);
        assert_eq!(state.emphasis(Metric::DeathIncrease), Emphasis::Highlighted);
    }

    #[test]
    fn new_series_drops_highlight_keeps_selection() {
        let series = series();
        let mut state = ChartState::default();
        state.initialize(&series);
        state.highlight_changed(Some(Metric::Death));
        state.selection_toggled(Metric::DeathIncrease);

        state.reset(&series);
        assert_eq!(state.highlight(), None);
        assert_eq!(state.selection(), Some(Metric::DeathIncrease));
    }

    #[test]
    fn range_after_pan_matches_applied_pan() {
        let mut state = ChartState::default();
        assert_eq!(state.range_after_pan(DAY_MS), None);

        let records: Vec<_> = (0..90)
            .map(|d| {
                RawRecord::new(day(1) + chrono::Days::new(d))
                    .with(Metric::Death, RawMetric::actual(1.0))
            })
            .collect();
        let series = Series::build(&records);
        state.initialize(&series);
        state.zoom(0.5, date_to_ms(day(1)) + 45 * DAY_MS);
        let span = state.range().map(|r| r.span_ms());

        let expected = state.range_after_pan(-40 * DAY_MS);
        state.pan(-40 * DAY_MS);
        assert_eq!(state.range(), expected);

        // stops at the first row instead of moving the full forty days
        let range = state.range().unwrap();
        assert_eq!(range.start_ms, date_to_ms(day(1)));
        assert_eq!(Some(range.span_ms()), span);
    }

    #[test]
    fn reset_clears_tracking() {
        let series = series();
        let mut state = ChartState::default();
        state.initialize(&series);
        state.pointer_moved(5.0, 6.0, date_to_ms(day(2)));

        state.reset(&series);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn axis_scale_uses_larger_of_actual_and_model() {
        let series = series();
        let spec = spec();
        assert_eq!(spec.scale(Side::Left, &series), Some(AxisScale { min: 0.0, max: 150.0 }));
        assert_eq!(spec.scale(Side::Right, &series), Some(AxisScale { min: 0.0, max: 8.0 }));

        let empty = AxisScale::for_metric(&Series::default(), Metric::Death);
        assert_eq!(empty, AxisScale { min: 0.0, max: 1.0 });
        assert_eq!(empty.normalize(2.0), 1.0);
        assert_eq!(empty.normalize(-1.0), 0.0);
    }

    #[test]
    fn one_sided_chart_omits_other_side() {
        let spec = ChartSpec::new("Positive").left(SideSpec::new(
            Metric::PositiveIncrease,
            "Positive Increase",
            Color::BLACK,
        ));
        assert_eq!(spec.metrics(), vec![Metric::PositiveIncrease]);
        assert_eq!(spec.scale(Side::Right, &series()), None);

        let legend = spec.legend(&ChartState::default(), &series(), &Defaults::default());
        assert!(legend.left.is_some());
        assert!(legend.right.is_none());
    }

    #[test]
    fn legend_shows_defaults_until_tracking() {
        let series = series();
        let spec = spec();
        let mut state = ChartState::default();
        state.initialize(&series);

        let defaults = Defaults {
            left: ChannelValues::actual_only(Some(108.0)),
            right: ChannelValues::actual_only(Some(f64::NAN)),
        };

        let idle = spec.legend(&state, &series, &defaults);
        let left = idle.get(Side::Left).unwrap();
        assert_eq!(left.label, "Total Deaths");
        assert_eq!(left.projected_label, "Projected Total Deaths");
        assert_eq!(left.actual, "108");
        assert_eq!(left.modeled, "N/A");
        assert_eq!(idle.get(Side::Right).unwrap().actual, "N/A");

        state.pointer_moved(0.0, 0.0, date_to_ms(day(1)));
        let tracking = spec.legend(&state, &series, &defaults);
        assert_eq!(tracking.get(Side::Left).unwrap().actual, "100");
        assert_eq!(tracking.get(Side::Left).unwrap().modeled, "150");
        assert_eq!(tracking.get(Side::Right).unwrap().actual, "8");

        state.pointer_moved(0.0, 0.0, date_to_ms(day(2)));
        let tracking = spec.legend(&state, &series, &defaults);
        assert_eq!(tracking.get(Side::Right).unwrap().actual, "0");
    }
}
