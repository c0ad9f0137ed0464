use super::PanelError;
use crate::widget::chart::dual_axis::{ChartEvent, DualAxisChart};

use data::chart::panel::{defaults, panel_specs, panel_title};
use data::chart::{ChartSpec, ChartState};
use data::load::Loaded;
use data::{LatestStatus, RawRecord, Series};

use iced::{
    Element, Length, padding,
    widget::{center, column, container, text},
};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Chart(usize, ChartEvent),
}

/// The three linked-by-data charts of one region. Each keeps its own viewport and cursor.
pub struct ChartPanel {
    specs: [ChartSpec; 3],
    charts: [ChartState; 3],
    series: Arc<Series>,
    latest: LatestStatus,
    label: String,
    status: Loaded,
    version: u64,
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartPanel {
    pub fn new() -> Self {
        Self {
            specs: panel_specs(),
            charts: Default::default(),
            series: Arc::new(Series::default()),
            latest: LatestStatus::default(),
            label: String::new(),
            status: Loaded::Loading,
            version: 0,
        }
    }

    pub fn status(&self) -> &Loaded {
        &self.status
    }

    pub fn charts(&self) -> &[ChartState; 3] {
        &self.charts
    }

    pub fn set_loading(&mut self, label: &str) {
        self.label = label.to_string();
        self.status = Loaded::Loading;
        self.invalidate();
    }

    /// Replaces the series wholesale; every chart starts over at the full extent.
    pub fn set_data(&mut self, label: &str, records: &[RawRecord]) {
        let series = Series::build(records);
        self.latest = LatestStatus::extract(records);

        for chart in &mut self.charts {
            chart.reset(&series);
        }

        log::info!("Loaded {} rows for {label}", series.len());

        self.series = Arc::new(series);
        self.label = label.to_string();
        self.status = Loaded::Ready;
        self.invalidate();
    }

    pub fn fail(&mut self, error: PanelError) {
        log::error!("{error}");
        self.status = Loaded::Failed(error.to_string());
        self.invalidate();
    }

    pub fn title(&self) -> String {
        panel_title(&self.label, &self.series, &self.latest)
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::Chart(index, event) => {
                let Some(chart) = self.charts.get_mut(index) else {
                    return;
                };
                // the widget clears its own overlay for cursor-only changes
                match event {
                    ChartEvent::PointerMoved { x, y, time_ms } => {
                        chart.pointer_moved(x, y, time_ms);
                        return;
                    }
                    ChartEvent::TrackerCleared => {
                        chart.tracker_changed(None);
                        return;
                    }
                    ChartEvent::Panned(delta_ms) => chart.pan(delta_ms),
                    ChartEvent::Zoomed { factor, anchor_ms } => chart.zoom(factor, anchor_ms),
                    ChartEvent::ResetView => chart.reset_view(&self.series),
                    ChartEvent::Highlighted(metric) => chart.highlight_changed(metric),
                    ChartEvent::SelectionToggled(metric) => chart.selection_toggled(metric),
                    ChartEvent::SelectionCleared => chart.selection_cleared(),
                }
                self.invalidate();
            }
        }
    }

    fn invalidate(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.status {
            Loaded::Loading => center(text("Loading...").size(16)).into(),
            Loaded::Failed(reason) => center(text(reason.as_str()).size(16)).into(),
            Loaded::Ready => {
                let charts = self.specs.iter().zip(&self.charts).enumerate().map(
                    |(index, (spec, state))| -> Element<'_, Message> {
                        let defaults = defaults(spec, &self.series, &self.latest);
                        let legend = spec.legend(state, &self.series, &defaults);
                        let chart: Element<'_, ChartEvent> =
                            DualAxisChart::new(spec, &self.series, state, legend)
                                .version(self.version)
                                .into();

                        column![
                            text(spec.title.as_str()).size(14),
                            chart.map(move |event| Message::Chart(index, event)),
                        ]
                        .spacing(4)
                        .height(Length::Fill)
                        .into()
                    },
                );

                container(
                    column![text(self.title()).size(18)]
                        .extend(charts)
                        .spacing(12)
                        .height(Length::Fill),
                )
                .padding(padding::left(8).right(8).bottom(8))
                .into()
            }
        }
    }
}
