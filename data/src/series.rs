use crate::time::date_to_ms;

use chrono::NaiveDate;
use enum_map::EnumMap;
use feed::{Metric, RawRecord};

/// Band descriptor in the `(lower, _, _, upper)` layout band rendering consumes.
/// The two interior slots are always absent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Band([Option<f64>; 4]);

impl Band {
    /// Collapses to an empty band unless both bounds are known.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Self([Some(lower), None, None, Some(upper)]),
            _ => Self([None; 4]),
        }
    }

    pub fn as_tuple(&self) -> &[Option<f64>; 4] {
        &self.0
    }

    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self.0 {
            [Some(lower), _, _, Some(upper)] => Some((lower, upper)),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.bounds().is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Channel {
    pub actual: Option<f64>,
    pub modeled: Option<f64>,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub date: NaiveDate,
    pub time_ms: i64,
    pub channels: EnumMap<Metric, Channel>,
}

impl Row {
    pub fn channel(&self, metric: Metric) -> &Channel {
        &self.channels[metric]
    }
}

/// Uniform multi-channel series, one row per raw record in input order.
///
/// Records are expected to arrive sorted by date; the ordered search in
/// [`Series::bisect`] relies on it and nothing here re-sorts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    rows: Vec<Row>,
}

impl Series {
    pub fn build(records: &[RawRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| Row {
                date: record.date,
                time_ms: date_to_ms(record.date),
                channels: EnumMap::from_fn(|metric| {
                    let raw = record.metric(metric);
                    Channel {
                        actual: raw.actual,
                        modeled: raw.modeled,
                        band: Band::new(raw.pct05, raw.pct95),
                    }
                }),
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn at(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Earliest to latest row time, or `None` for an empty series.
    pub fn extent(&self) -> Option<(i64, i64)> {
        let min = self.rows.iter().map(|row| row.time_ms).min()?;
        let max = self.rows.iter().map(|row| row.time_ms).max()?;
        Some((min, max))
    }

    /// Index of the last row at or before `time_ms`; the first row when
    /// `time_ms` precedes the series.
    pub fn bisect(&self, time_ms: i64) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        let after = self.rows.partition_point(|row| row.time_ms <= time_ms);
        Some(after.saturating_sub(1))
    }

    pub fn max_of(&self, metric: Metric, value: impl Fn(&Channel) -> Option<f64>) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|row| value(row.channel(metric)))
            .filter(|v| v.is_finite())
            .reduce(f64::max)
    }

    pub fn max_actual(&self, metric: Metric) -> Option<f64> {
        self.max_of(metric, |ch| ch.actual)
    }

    pub fn max_modeled(&self, metric: Metric) -> Option<f64> {
        self.max_of(metric, |ch| ch.modeled)
    }
}

pub fn build(records: &[RawRecord]) -> Series {
    Series::build(records)
}
