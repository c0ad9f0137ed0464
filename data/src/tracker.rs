use crate::format;
use crate::series::{Channel, Series};

use chrono::NaiveDate;
use feed::Metric;

/// Last known pointer position inside the plot, in local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

/// Cursor state of one chart. Pixel coordinates exist exactly when a time is tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Tracker {
    #[default]
    Idle,
    Tracking { time_ms: i64, pointer: Pointer },
}

impl Tracker {
    pub fn on_pointer_move(&mut self, x: f32, y: f32, time_ms: i64) {
        *self = Tracker::Tracking {
            time_ms,
            pointer: Pointer { x, y },
        };
    }

    /// `None` means the pointer left the surface: time and position clear together.
    /// A time without any known pointer position is ignored.
    pub fn on_tracker_time_changed(&mut self, time_ms: Option<i64>) {
        match (time_ms, self) {
            (None, tracker) => *tracker = Tracker::Idle,
            (Some(new_time), Tracker::Tracking { time_ms, .. }) => *time_ms = new_time,
            (Some(_), Tracker::Idle) => {}
        }
    }

    pub fn time_ms(&self) -> Option<i64> {
        match self {
            Tracker::Tracking { time_ms, .. } => Some(*time_ms),
            Tracker::Idle => None,
        }
    }

    pub fn pointer(&self) -> Option<Pointer> {
        match self {
            Tracker::Tracking { pointer, .. } => Some(*pointer),
            Tracker::Idle => None,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, Tracker::Tracking { .. })
    }
}

/// Pre-formatted legend values of one channel; `None` is an absent datum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelValues {
    pub actual: Option<String>,
    pub modeled: Option<String>,
}

impl ChannelValues {
    pub fn from_channel(channel: &Channel) -> Self {
        Self {
            actual: channel.actual.map(format::thousands),
            modeled: channel.modeled.map(format::rounded_thousands),
        }
    }

    pub fn actual_only(actual: Option<f64>) -> Self {
        Self {
            actual: actual.filter(|v| v.is_finite()).map(format::thousands),
            modeled: None,
        }
    }

    pub fn actual_or_na(&self) -> &str {
        format::or_na(self.actual.as_deref())
    }

    pub fn modeled_or_na(&self) -> &str {
        format::or_na(self.modeled.as_deref())
    }
}

/// Values of the requested channels at the row selected for a tracked time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub index: usize,
    pub date: NaiveDate,
    pub values: Vec<(Metric, ChannelValues)>,
}

impl Snapshot {
    pub fn get(&self, metric: Metric) -> Option<&ChannelValues> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, values)| values)
    }
}

pub fn values_at(series: &Series, time_ms: i64, metrics: &[Metric]) -> Option<Snapshot> {
    let index = series.bisect(time_ms)?;
    let row = series.at(index)?;

    Some(Snapshot {
        index,
        date: row.date,
        values: metrics
            .iter()
            .map(|&metric| (metric, ChannelValues::from_channel(row.channel(metric))))
            .collect(),
    })
}
