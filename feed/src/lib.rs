pub mod adapter;
pub mod model;

pub use adapter::{FetchError, fetch_region, fetch_regions};
pub use model::{DecodeError, Metric, RawMetric, RawRecord, Region, parse_records, parse_regions};

use serde_json::Value;

/// Numeric fields can be either a JSON number or a numeric string; anything else is absent.
pub(crate) fn value_to_f64(val: &Value) -> Option<f64> {
    match val {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}
