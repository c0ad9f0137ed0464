use super::{ChartSpec, Defaults, SideSpec};
use crate::format;
use crate::latest::LatestStatus;
use crate::series::Series;
use crate::tracker::ChannelValues;

use feed::Metric;
use iced_core::Color;

const RED: Color = Color::from_rgb(0.86, 0.08, 0.08);
const BLUE: Color = Color::from_rgb(0.16, 0.36, 0.85);
const GREEN: Color = Color::from_rgb(0.18, 0.62, 0.3);
const PURPLE: Color = Color::from_rgb(0.55, 0.3, 0.75);
const ORANGE: Color = Color::from_rgb(0.95, 0.55, 0.1);

/// The three pairings shown for every region.
pub fn panel_specs() -> [ChartSpec; 3] {
    [
        ChartSpec::new("Deaths")
            .left(SideSpec::new(Metric::Death, "Total Deaths", RED))
            .right(SideSpec::new(Metric::DeathIncrease, "Daily Deaths", BLUE)),
        ChartSpec::new("Positive Tests").left(SideSpec::new(
            Metric::PositiveIncrease,
            "Daily Positive Tests",
            GREEN,
        )),
        ChartSpec::new("Hospital Load")
            .left(SideSpec::new(
                Metric::HospitalizedCurrently,
                "Hospitalized",
                PURPLE,
            ))
            .right(SideSpec::new(Metric::InIcuCurrently, "In ICU", ORANGE)),
    ]
}

/// Cumulative deaths default to the series maximum, status metrics to their latest report.
pub fn default_value(metric: Metric, series: &Series, latest: &LatestStatus) -> Option<f64> {
    match metric {
        Metric::Death => series.max_actual(Metric::Death),
        other => latest.get(other),
    }
}

pub fn defaults(spec: &ChartSpec, series: &Series, latest: &LatestStatus) -> Defaults {
    let values = |side: Option<&SideSpec>| {
        side.map(|s| ChannelValues::actual_only(default_value(s.metric, series, latest)))
            .unwrap_or_default()
    };

    Defaults {
        left: values(spec.left.as_ref()),
        right: values(spec.right.as_ref()),
    }
}

/// `"<label> - <total deaths> (<latest increase> new)"`
pub fn panel_title(label: &str, series: &Series, latest: &LatestStatus) -> String {
    format!(
        "{label} - {} ({} new)",
        format::display(series.max_actual(Metric::Death)),
        format::display(latest.death_increase),
    )
}
