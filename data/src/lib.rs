pub mod chart;
pub mod config;
pub mod format;
pub mod latest;
pub mod load;
pub mod region;
pub mod series;
pub mod time;
pub mod tracker;
pub mod viewport;

pub use chart::{ChartSpec, ChartState, Emphasis, Phase, Side, SideSpec};
pub use config::Config;
pub use feed::{Metric, RawMetric, RawRecord, Region};
pub use latest::LatestStatus;
pub use series::{Band, Channel, Row, Series};
pub use tracker::{ChannelValues, Snapshot, Tracker};
pub use viewport::{TimeRange, Viewport};

use std::path::PathBuf;

const APP_DIR: &str = "cv19-chart";

pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let base = if let Ok(path) = std::env::var("CV19_CHART_DATA_PATH") {
        PathBuf::from(path)
    } else {
        dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    };

    if let Some(path_name) = path_name {
        base.join(path_name)
    } else {
        base
    }
}
