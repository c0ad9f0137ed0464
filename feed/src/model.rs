use crate::value_to_f64;

use chrono::NaiveDate;
use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a JSON array of records, got {0}")]
    NotArray(&'static str),
}

/// Tracked per-date metrics, in the order the payload lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Metric {
    Death,
    DeathIncrease,
    InIcuCurrently,
    HospitalizedCurrently,
    PositiveIncrease,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Death,
        Metric::DeathIncrease,
        Metric::InIcuCurrently,
        Metric::HospitalizedCurrently,
        Metric::PositiveIncrease,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Death => "death",
            Metric::DeathIncrease => "deathIncrease",
            Metric::InIcuCurrently => "inIcuCurrently",
            Metric::HospitalizedCurrently => "hospitalizedCurrently",
            Metric::PositiveIncrease => "positiveIncrease",
        }
    }

    pub fn model_key(self) -> &'static str {
        match self {
            Metric::Death => "model_death",
            Metric::DeathIncrease => "model_deathIncrease",
            Metric::InIcuCurrently => "model_inIcuCurrently",
            Metric::HospitalizedCurrently => "model_hospitalizedCurrently",
            Metric::PositiveIncrease => "model_positiveIncrease",
        }
    }

    /// Lower (5th percentile) band bound.
    pub fn pct05_key(self) -> &'static str {
        match self {
            Metric::Death => "model_death_pct05",
            Metric::DeathIncrease => "model_deathIncrease_pct05",
            Metric::InIcuCurrently => "model_inIcuCurrently_pct05",
            Metric::HospitalizedCurrently => "model_hospitalizedCurrently_pct05",
            Metric::PositiveIncrease => "model_positiveIncrease_pct05",
        }
    }

    /// Upper (95th percentile) band bound.
    pub fn pct95_key(self) -> &'static str {
        match self {
            Metric::Death => "model_death_pct95",
            Metric::DeathIncrease => "model_deathIncrease_pct95",
            Metric::InIcuCurrently => "model_inIcuCurrently_pct95",
            Metric::HospitalizedCurrently => "model_hospitalizedCurrently_pct95",
            Metric::PositiveIncrease => "model_positiveIncrease_pct95",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawMetric {
    pub actual: Option<f64>,
    pub modeled: Option<f64>,
    pub pct05: Option<f64>,
    pub pct95: Option<f64>,
}

impl RawMetric {
    pub fn actual(value: f64) -> Self {
        Self {
            actual: Some(value),
            ..Self::default()
        }
    }

    pub fn with_model(mut self, modeled: f64, pct05: f64, pct95: f64) -> Self {
        self.modeled = Some(modeled);
        self.pct05 = Some(pct05);
        self.pct95 = Some(pct95);
        self
    }
}

/// One calendar day of a region's payload. Immutable once decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub metrics: EnumMap<Metric, RawMetric>,
}

impl RawRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            metrics: EnumMap::default(),
        }
    }

    pub fn with(mut self, metric: Metric, values: RawMetric) -> Self {
        self.metrics[metric] = values;
        self
    }

    pub fn metric(&self, metric: Metric) -> &RawMetric {
        &self.metrics[metric]
    }

    /// Returns `None` when the object carries no usable date.
    pub fn from_object(map: &Map<String, Value>) -> Option<Self> {
        let date = map.get("date").and_then(parse_date)?;

        let field = |key: &str| map.get(key).and_then(value_to_f64);

        let mut record = Self::new(date);
        for metric in Metric::ALL {
            record.metrics[metric] = RawMetric {
                actual: field(metric.key()),
                modeled: field(metric.model_key()),
                pct05: field(metric.pct05_key()),
                pct95: field(metric.pct95_key()),
            };
        }
        Some(record)
    }
}

fn parse_date(val: &Value) -> Option<NaiveDate> {
    match val {
        Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y%m%d"))
            .ok(),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| NaiveDate::parse_from_str(&n.to_string(), "%Y%m%d").ok()),
        _ => None,
    }
}

/// Decodes a region payload. Elements that are not objects or lack a date are skipped.
pub fn parse_records(json: &str) -> Result<Vec<RawRecord>, DecodeError> {
    let value: Value = serde_json::from_str(json)?;

    let Value::Array(elements) = value else {
        return Err(DecodeError::NotArray(json_kind(&value)));
    };

    let mut records = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        match element.as_object().and_then(RawRecord::from_object) {
            Some(record) => records.push(record),
            None => log::warn!("Skipping record {index}: missing or invalid date"),
        }
    }

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Entry of the region list, e.g. `{"value": "NY", "label": "New York"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub value: String,
    pub label: String,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub fn parse_regions(json: &str) -> Result<Vec<Region>, DecodeError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn decodes_actual_model_and_band_fields() {
        let json = r#"[{
            "date": "2020-04-01",
            "death": 10,
            "model_death": 11.6,
            "model_death_pct05": 9.0,
            "model_death_pct95": 14.0,
            "deathIncrease": 2
        }]"#;

        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, day(2020, 4, 1));

        let death = records[0].metric(Metric::Death);
        assert_eq!(death.actual, Some(10.0));
        assert_eq!(death.modeled, Some(11.6));
        assert_eq!(death.pct05, Some(9.0));
        assert_eq!(death.pct95, Some(14.0));

        let increase = records[0].metric(Metric::DeathIncrease);
        assert_eq!(increase.actual, Some(2.0));
        assert_eq!(increase.modeled, None);
        assert_eq!(records[0].metric(Metric::InIcuCurrently), &RawMetric::default());
    }

    #[test]
    fn malformed_fields_decode_as_absent() {
        let json = r#"[{
            "date": "2020-04-01",
            "death": "n/a",
            "deathIncrease": "7",
            "inIcuCurrently": true,
            "hospitalizedCurrently": null,
            "positiveIncrease": {"value": 3}
        }]"#;

        let records = parse_records(json).unwrap();
        let r = &records[0];
        assert_eq!(r.metric(Metric::Death).actual, None);
        assert_eq!(r.metric(Metric::DeathIncrease).actual, Some(7.0));
        assert_eq!(r.metric(Metric::InIcuCurrently).actual, None);
        assert_eq!(r.metric(Metric::HospitalizedCurrently).actual, None);
        assert_eq!(r.metric(Metric::PositiveIncrease).actual, None);
    }

    #[test]
    fn zero_is_kept() {
        let records = parse_records(r#"[{"date": "2020-01-03", "deathIncrease": 0}]"#).unwrap();
        assert_eq!(records[0].metric(Metric::DeathIncrease).actual, Some(0.0));
    }

    #[test]
    fn records_without_date_are_skipped() {
        let json = r#"[
            {"date": "2020-01-01", "death": 1},
            {"death": 2},
            {"date": "yesterday", "death": 3},
            42,
            {"date": 20200104, "death": 4}
        ]"#;

        let records = parse_records(json).unwrap();
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2020, 1, 1), day(2020, 1, 4)]);
    }

    #[test]
    fn non_array_payload_is_an_error() {
        assert!(matches!(
            parse_records(r#"{"error": true}"#),
            Err(DecodeError::NotArray("an object"))
        ));
        assert!(matches!(parse_records("not json"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn region_list_decodes_and_displays_label() {
        let regions =
            parse_regions(r#"[{"value":"US","label":"United States"},{"value":"NY","label":"New York"}]"#)
                .unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].value, "NY");
        assert_eq!(regions[1].to_string(), "New York");
    }
}
