use crate::style;

use data::Series;
use data::Metric;
use data::chart::{AxisScale, ChartSpec, ChartState, Legend, Side, SideLegend};
use data::format;
use data::series::{Channel, Row};
use data::viewport::{TimeRange, Viewport};

use iced::advanced::widget::tree::{self, Tree};
use iced::advanced::{self, Clipboard, Layout, Shell, Widget, layout, renderer};
use iced::theme::palette::Extended;
use iced::widget::canvas;
use iced::{Color, Element, Event, Length, Point, Rectangle, Renderer, Size, Theme, Vector, mouse, window};
use iced_core::renderer::Quad;

const Y_AXIS_GUTTER: f32 = 56.0; // px, each side
const X_AXIS_HEIGHT: f32 = 24.0;

const MIN_X_TICK_PX: f64 = 80.0;
const TEXT_SIZE: f32 = 12.0;
const MIN_Y_TICK_PX: f32 = TEXT_SIZE * 3.0;

const ZOOM_STEP_PCT: f64 = 0.05; // 5% per scroll "line"
const PIXELS_PER_LINE: f32 = 40.0;

const LEGEND_PADDING: f32 = 4.0;
const LEGEND_LINE_H: f32 = TEXT_SIZE + 6.0;

const CHAR_W: f32 = TEXT_SIZE * 0.64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartEvent {
    /// Plot-local pointer position and the time under it.
    PointerMoved { x: f32, y: f32, time_ms: i64 },
    TrackerCleared,
    Panned(i64),
    Zoomed { factor: f64, anchor_ms: i64 },
    ResetView,
    /// Legend entry under the pointer, if any.
    Highlighted(Option<Metric>),
    SelectionToggled(Metric),
    SelectionCleared,
}

struct State {
    plot_cache: canvas::Cache,
    left_axis_cache: canvas::Cache,
    right_axis_cache: canvas::Cache,
    x_axis_cache: canvas::Cache,
    overlay_cache: canvas::Cache,
    is_panning: bool,
    dragged: bool,
    last_cursor: Option<Point>,
    last_cache_rev: u64,
    previous_click: Option<iced_core::mouse::Click>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            plot_cache: canvas::Cache::new(),
            left_axis_cache: canvas::Cache::new(),
            right_axis_cache: canvas::Cache::new(),
            x_axis_cache: canvas::Cache::new(),
            overlay_cache: canvas::Cache::new(),
            is_panning: false,
            dragged: false,
            last_cursor: None,
            last_cache_rev: 0,
            previous_click: None,
        }
    }
}

impl State {
    fn clear_all_caches(&mut self) {
        self.plot_cache.clear();
        self.left_axis_cache.clear();
        self.right_axis_cache.clear();
        self.x_axis_cache.clear();
        self.overlay_cache.clear();
    }
}

/// Two value axes over one shared time axis.
///
/// Viewport and cursor live in the caller's [`ChartState`]; the widget only
/// reads them and reports gestures as [`ChartEvent`]s.
pub struct DualAxisChart<'a> {
    spec: &'a ChartSpec,
    series: &'a Series,
    state: &'a ChartState,
    legend: Legend,
    version: u64,
}

impl<'a> DualAxisChart<'a> {
    pub fn new(
        spec: &'a ChartSpec,
        series: &'a Series,
        state: &'a ChartState,
        legend: Legend,
    ) -> Self {
        Self {
            spec,
            series,
            state,
            legend,
            version: 0,
        }
    }

    pub fn version(mut self, rev: u64) -> Self {
        self.version = rev;
        self
    }

    /// Falls back to the full extent until the caller initializes the viewport.
    fn range(&self) -> TimeRange {
        self.state
            .range()
            .unwrap_or_else(|| Viewport::full_extent(self.series))
    }

    fn context(&self, layout: Layout<'_>) -> PlotContext {
        PlotContext {
            regions: Regions::from_layout(layout),
            range: self.range(),
            left: self.spec.scale(Side::Left, self.series),
            right: self.spec.scale(Side::Right, self.series),
        }
    }

    /// Rows covering the range, plus one neighbour on each side so lines reach the edges.
    fn visible_rows(&self, range: TimeRange) -> &'a [Row] {
        let rows = self.series.rows();
        let (Some(first), Some(last)) = (
            self.series.bisect(range.start_ms),
            self.series.bisect(range.end_ms),
        ) else {
            return &[];
        };
        let last = (last + 1).min(rows.len() - 1);
        &rows[first..=last]
    }

    fn legend_box(&self, side: Side, legend: &SideLegend, plot_rect: Rectangle) -> Rectangle {
        let lines = legend_lines(legend);
        let max_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let width = ((max_chars as f32) * CHAR_W + LEGEND_PADDING * 2.0)
            .min((plot_rect.width * 0.5 - 8.0).max(0.0));
        let height = (lines.len() as f32) * LEGEND_LINE_H + LEGEND_PADDING * 2.0;

        let x = match side {
            Side::Left => plot_rect.x + 4.0,
            Side::Right => plot_rect.x + plot_rect.width - 4.0 - width,
        };

        Rectangle {
            x,
            y: plot_rect.y + 4.0,
            width,
            height,
        }
    }

    /// Metric whose legend entry contains the root-local point.
    fn legend_at(&self, ctx: &PlotContext, p: Point) -> Option<Metric> {
        let plot_rect = ctx.plot_rect();
        Side::ALL.into_iter().find_map(|side| {
            let legend = self.legend.get(side)?;
            let spec = self.spec.side(side)?;
            self.legend_box(side, legend, plot_rect)
                .contains(p)
                .then_some(spec.metric)
        })
    }
}

impl<'a, M> Widget<M, Theme, Renderer> for DualAxisChart<'a>
where
    M: Clone + 'static + From<ChartEvent>,
{
    fn tag(&self) -> tree::Tag {
        tree::Tag::of::<State>()
    }

    fn state(&self) -> tree::State {
        tree::State::new(State::default())
    }

    fn size(&self) -> Size<Length> {
        Size {
            width: Length::Fill,
            height: Length::Fill,
        }
    }

    fn layout(
        &mut self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        // [ left_axis, plot, right_axis ] over a full-width x_axis
        let size = limits.resolve(Length::Fill, Length::Fill, Size::ZERO);

        let gutter_w = Y_AXIS_GUTTER.min(size.width / 4.0);
        let x_axis_h = X_AXIS_HEIGHT.min(size.height);
        let plot_w = (size.width - 2.0 * gutter_w).max(0.0);
        let plot_h = (size.height - x_axis_h).max(0.0);

        layout::Node::with_children(
            size,
            vec![
                layout::Node::new(Size::new(gutter_w, plot_h)),
                layout::Node::new(Size::new(plot_w, plot_h)).move_to(Point::new(gutter_w, 0.0)),
                layout::Node::new(Size::new(gutter_w, plot_h))
                    .move_to(Point::new(gutter_w + plot_w, 0.0)),
                layout::Node::new(Size::new(size.width, x_axis_h))
                    .move_to(Point::new(0.0, plot_h)),
            ],
        )
    }

    fn update(
        &mut self,
        tree: &mut Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, M>,
        _viewport: &Rectangle,
    ) {
        if shell.is_event_captured() {
            return;
        }

        match event {
            Event::Mouse(mouse_event) => {
                let state = tree.state.downcast_mut::<State>();
                let ctx = self.context(layout);
                let is_tracking = self.state.tracker().is_tracking();

                let Some(cursor_pos) = cursor.position_in(layout.bounds()) else {
                    state.is_panning = false;
                    state.dragged = false;
                    state.last_cursor = None;
                    if is_tracking {
                        shell.publish(M::from(ChartEvent::TrackerCleared));
                        state.overlay_cache.clear();
                    }
                    if self.state.highlight().is_some() {
                        shell.publish(M::from(ChartEvent::Highlighted(None)));
                        state.clear_all_caches();
                    }
                    return;
                };

                let zone = ctx.regions.hit_test(cursor_pos);

                match mouse_event {
                    mouse::Event::WheelScrolled { delta } => {
                        if zone != HitZone::Plot {
                            return;
                        }

                        let lines = match delta {
                            mouse::ScrollDelta::Lines { y, .. } => *y,
                            mouse::ScrollDelta::Pixels { y, .. } => *y / PIXELS_PER_LINE,
                        };
                        if lines == 0.0 {
                            return;
                        }

                        // scrolling up zooms in
                        let factor = (1.0 - ZOOM_STEP_PCT).powf(f64::from(lines));
                        let anchor_ms = ctx.time_at(cursor_pos.x - ctx.regions.plot.x);

                        shell.publish(M::from(ChartEvent::Zoomed { factor, anchor_ms }));
                        state.clear_all_caches();
                    }
                    mouse::Event::ButtonPressed(mouse::Button::Left) => {
                        if let Some(global_pos) = cursor.position() {
                            let new_click = iced_core::mouse::Click::new(
                                global_pos,
                                mouse::Button::Left,
                                state.previous_click,
                            );

                            if zone == HitZone::XAxis
                                && new_click.kind() == iced_core::mouse::click::Kind::Double
                            {
                                shell.publish(M::from(ChartEvent::ResetView));
                                state.clear_all_caches();
                                state.previous_click = Some(new_click);
                                return;
                            }

                            state.previous_click = Some(new_click);
                        } else {
                            state.previous_click = None;
                        }

                        if let Some(metric) = self.legend_at(&ctx, cursor_pos) {
                            shell.publish(M::from(ChartEvent::SelectionToggled(metric)));
                            state.clear_all_caches();
                            return;
                        }

                        if zone == HitZone::Plot {
                            state.is_panning = true;
                            state.dragged = false;
                            state.last_cursor = Some(cursor_pos);
                        }
                    }
                    mouse::Event::ButtonReleased(mouse::Button::Left) => {
                        // a click on the plot background, not the end of a drag
                        if state.is_panning && !state.dragged && self.state.selection().is_some() {
                            shell.publish(M::from(ChartEvent::SelectionCleared));
                            state.clear_all_caches();
                        }
                        state.is_panning = false;
                        state.dragged = false;
                        state.last_cursor = None;
                    }
                    mouse::Event::CursorMoved { .. } => {
                        let hovered = self.legend_at(&ctx, cursor_pos);
                        if hovered != self.state.highlight() {
                            shell.publish(M::from(ChartEvent::Highlighted(hovered)));
                            state.clear_all_caches();
                        }

                        let mut range = ctx.range;
                        if state.is_panning {
                            let prev = state.last_cursor.unwrap_or(cursor_pos);
                            let dx_px = cursor_pos.x - prev.x;

                            if dx_px.abs() > 0.0 {
                                let px_per_ms = ctx.px_per_ms().max(f64::EPSILON);
                                let delta_ms = -(f64::from(dx_px) / px_per_ms).round() as i64;

                                shell.publish(M::from(ChartEvent::Panned(delta_ms)));
                                state.clear_all_caches();
                                state.dragged = true;

                                if let Some(panned) = self.state.range_after_pan(delta_ms) {
                                    range = panned;
                                }
                            }
                            state.last_cursor = Some(cursor_pos);
                        }

                        if zone == HitZone::Plot {
                            let plot = ctx.plot_rect();
                            let x = cursor_pos.x - plot.x;
                            let y = cursor_pos.y - plot.y;

                            // the pan above lands before this event does
                            let time_ms = PlotContext { range, ..ctx }.time_at(x);

                            shell.publish(M::from(ChartEvent::PointerMoved { x, y, time_ms }));
                            state.overlay_cache.clear();
                        } else if is_tracking {
                            shell.publish(M::from(ChartEvent::TrackerCleared));
                            state.overlay_cache.clear();
                        }
                    }
                    mouse::Event::CursorLeft => {
                        state.is_panning = false;
                        state.dragged = false;
                        state.last_cursor = None;
                        if is_tracking {
                            shell.publish(M::from(ChartEvent::TrackerCleared));
                            state.overlay_cache.clear();
                        }
                        if self.state.highlight().is_some() {
                            shell.publish(M::from(ChartEvent::Highlighted(None)));
                            state.clear_all_caches();
                        }
                    }
                    _ => {}
                }
            }
            Event::Window(window::Event::RedrawRequested(_)) => {
                let state = tree.state.downcast_mut::<State>();

                if state.last_cache_rev != self.version {
                    state.clear_all_caches();
                    state.last_cache_rev = self.version;
                }
            }
            _ => {}
        }
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use advanced::Renderer as _;

        let state = tree.state.downcast_ref::<State>();
        let ctx = self.context(layout);

        let bounds = layout.bounds();
        let palette = theme.extended_palette();

        renderer.with_translation(Vector::new(bounds.x, bounds.y), |r| {
            let plot_rect = ctx.plot_rect();

            let plot_geom = state.plot_cache.draw(r, plot_rect.size(), |frame| {
                self.fill_plot(frame, &ctx);
            });

            let splitter_color = palette.background.strong.color.scale_alpha(0.25);
            for edge in [
                Rectangle {
                    x: plot_rect.x,
                    y: plot_rect.y + plot_rect.height,
                    width: plot_rect.width,
                    height: 1.0,
                },
                Rectangle {
                    x: plot_rect.x,
                    y: plot_rect.y,
                    width: 1.0,
                    height: plot_rect.height,
                },
                Rectangle {
                    x: plot_rect.x + plot_rect.width,
                    y: plot_rect.y,
                    width: 1.0,
                    height: plot_rect.height,
                },
            ] {
                r.fill_quad(
                    Quad {
                        bounds: edge,
                        snap: true,
                        ..Default::default()
                    },
                    splitter_color,
                );
            }

            let left_rect = ctx.regions.left_axis;
            let left_geom = state.left_axis_cache.draw(r, left_rect.size(), |frame| {
                self.fill_value_axis(frame, &ctx, Side::Left);
            });

            let right_rect = ctx.regions.right_axis;
            let right_geom = state.right_axis_cache.draw(r, right_rect.size(), |frame| {
                self.fill_value_axis(frame, &ctx, Side::Right);
            });

            let x_rect = ctx.regions.x_axis;
            let x_geom = state.x_axis_cache.draw(r, x_rect.size(), |frame| {
                self.fill_x_axis_labels(frame, &ctx, palette);
            });

            let overlay_geom = state.overlay_cache.draw(r, bounds.size(), |frame| {
                self.fill_crosshair(frame, &ctx, palette);
                self.fill_legends(frame, &ctx, palette);
            });

            r.with_layer(plot_rect, |r| {
                r.with_translation(Vector::new(plot_rect.x, plot_rect.y), |r| {
                    use iced::advanced::graphics::geometry::Renderer as _;
                    r.draw_geometry(plot_geom);
                });
            });
            r.with_translation(Vector::new(left_rect.x, left_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(left_geom);
            });
            r.with_translation(Vector::new(right_rect.x, right_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(right_geom);
            });
            r.with_translation(Vector::new(x_rect.x, x_rect.y), |r| {
                use iced::advanced::graphics::geometry::Renderer as _;
                r.draw_geometry(x_geom);
            });

            r.with_layer(
                Rectangle {
                    x: 0.0,
                    y: 0.0,
                    width: bounds.width,
                    height: bounds.height,
                },
                |r| {
                    use iced::advanced::graphics::geometry::Renderer as _;
                    r.draw_geometry(overlay_geom);
                },
            );
        });
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: Layout<'_>,
        cursor: advanced::mouse::Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> advanced::mouse::Interaction {
        let Some(cursor_in_layout) = cursor.position_in(layout.bounds()) else {
            return advanced::mouse::Interaction::default();
        };

        let state = tree.state.downcast_ref::<State>();
        if state.is_panning {
            return advanced::mouse::Interaction::Grabbing;
        }

        let ctx = self.context(layout);
        if self.legend_at(&ctx, cursor_in_layout).is_some() {
            return advanced::mouse::Interaction::Pointer;
        }

        match ctx.regions.hit_test(cursor_in_layout) {
            HitZone::Plot => advanced::mouse::Interaction::Crosshair,
            HitZone::XAxis => advanced::mouse::Interaction::Pointer,
            _ => advanced::mouse::Interaction::default(),
        }
    }
}

impl<'a> DualAxisChart<'a> {
    fn fill_plot(&self, frame: &mut canvas::Frame, ctx: &PlotContext) {
        let rows = self.visible_rows(ctx.range);
        if rows.is_empty() {
            return;
        }

        for side in Side::ALL {
            let (Some(spec), Some(scale)) = (self.spec.side(side), ctx.scale(side)) else {
                continue;
            };
            let metric = spec.metric;
            let emphasis = self.state.emphasis(metric);

            self.fill_band(
                frame,
                ctx,
                scale,
                rows,
                |row| row.channel(metric),
                style::band_fill(spec.color, emphasis),
            );
            stroke_channel(
                frame,
                ctx,
                scale,
                rows,
                |row| row.channel(metric).modeled,
                style::projected_line(spec.color, emphasis),
            );
            stroke_channel(
                frame,
                ctx,
                scale,
                rows,
                |row| row.channel(metric).actual,
                style::actual_line(spec.color, emphasis),
            );
        }
    }

    /// One filled polygon per contiguous run of rows carrying both bounds.
    fn fill_band(
        &self,
        frame: &mut canvas::Frame,
        ctx: &PlotContext,
        scale: &AxisScale,
        rows: &[Row],
        channel: impl Fn(&Row) -> &Channel,
        fill: Color,
    ) {
        let mut run: Vec<(f32, f32, f32)> = Vec::new();

        let mut flush = |run: &mut Vec<(f32, f32, f32)>| {
            if run.len() >= 2 {
                let path = canvas::Path::new(|b| {
                    let (x0, _, hi0) = run[0];
                    b.move_to(Point::new(x0, hi0));
                    for (x, _, hi) in run.iter().skip(1) {
                        b.line_to(Point::new(*x, *hi));
                    }
                    for (x, lo, _) in run.iter().rev() {
                        b.line_to(Point::new(*x, *lo));
                    }
                    b.close();
                });
                frame.fill(&path, fill);
            }
            run.clear();
        };

        for row in rows {
            match channel(row).band.bounds() {
                Some((lower, upper)) => run.push((
                    ctx.map_x(row.time_ms),
                    ctx.map_y(scale, lower),
                    ctx.map_y(scale, upper),
                )),
                None => flush(&mut run),
            }
        }
        flush(&mut run);
    }

    fn fill_value_axis(&self, frame: &mut canvas::Frame, ctx: &PlotContext, side: Side) {
        let (Some(spec), Some(scale)) = (self.spec.side(side), ctx.scale(side)) else {
            return;
        };

        let plot = ctx.plot_rect();
        let gutter_w = match side {
            Side::Left => ctx.regions.left_axis.width,
            Side::Right => ctx.regions.right_axis.width,
        };
        let target = (plot.height / MIN_Y_TICK_PX).floor() as usize;
        let (ticks, _) = super::ticks(scale.min, scale.max, target);

        let (x, align_x) = match side {
            Side::Left => (gutter_w - 4.0, iced::Alignment::End),
            Side::Right => (4.0, iced::Alignment::Start),
        };

        let half_txt = TEXT_SIZE * 0.5;
        for tick in ticks {
            let y_local = ctx
                .map_y(scale, tick)
                .clamp(half_txt, (plot.height - half_txt).max(half_txt));

            frame.fill_text(canvas::Text {
                content: format::si(tick),
                position: Point::new(x, y_local),
                color: spec.color,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: align_x.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });
        }
    }

    fn fill_x_axis_labels(&self, frame: &mut canvas::Frame, ctx: &PlotContext, palette: &Extended) {
        let (ticks, step_ms) = super::time_ticks(
            ctx.range.start_ms,
            ctx.range.end_ms,
            ctx.px_per_ms(),
            MIN_X_TICK_PX,
        );

        let baseline_to_text = 4.0;
        let y_center_local = baseline_to_text + 2.0 + TEXT_SIZE * 0.5;

        let plot_rect = ctx.plot_rect();

        let mut last_right = f32::NEG_INFINITY;
        for t in ticks {
            let x_local = plot_rect.x + ctx.map_x(t).clamp(0.0, plot_rect.width);

            let label = format::time_label(t, step_ms);

            let est_w = (label.len() as f32) * CHAR_W + 8.0;
            let left = x_local - est_w * 0.5;
            let right = x_local + est_w * 0.5;

            if left <= last_right {
                continue;
            }

            frame.fill_text(canvas::Text {
                content: label,
                position: Point::new(x_local, y_center_local),
                color: palette.background.base.text,
                size: TEXT_SIZE.into(),
                font: style::MONO,
                align_x: iced::Alignment::Center.into(),
                align_y: iced::Alignment::Center.into(),
                ..Default::default()
            });

            last_right = right;
        }
    }

    /// Drawn at the last reported pointer position, not the live cursor.
    fn fill_crosshair(&self, frame: &mut canvas::Frame, ctx: &PlotContext, palette: &Extended) {
        let (Some(pointer), Some(time_ms)) =
            (self.state.pointer(), self.state.tracker().time_ms())
        else {
            return;
        };
        let plot_rect = ctx.plot_rect();

        let cx = plot_rect.x + pointer.x.clamp(0.0, plot_rect.width);
        let cy = plot_rect.y + pointer.y.clamp(0.0, plot_rect.height);

        let stroke = style::dashed_line(palette);

        // Vertical
        let mut b = canvas::path::Builder::new();
        b.move_to(Point::new(cx, plot_rect.y));
        b.line_to(Point::new(cx, plot_rect.y + plot_rect.height));
        frame.stroke(&b.build(), stroke);

        // Horizontal
        let mut b = canvas::path::Builder::new();
        b.move_to(Point::new(plot_rect.x, cy));
        b.line_to(Point::new(plot_rect.x + plot_rect.width, cy));
        frame.stroke(&b.build(), stroke);

        let time_str = format::crosshair_label(time_ms);

        let text_col = palette.secondary.base.text;
        let bg_col = palette.secondary.base.color;

        let est_w = (time_str.len() as f32) * (TEXT_SIZE * 0.67) + 12.0;
        let label_w = est_w.clamp(100.0, 240.0);
        let label_h = TEXT_SIZE + 6.0;

        let time_x = cx.clamp(
            plot_rect.x + label_w * 0.5,
            (plot_rect.x + plot_rect.width - label_w * 0.5).max(plot_rect.x + label_w * 0.5),
        );
        let time_y = plot_rect.y + plot_rect.height + 2.0 + label_h * 0.5;

        frame.fill_rectangle(
            Point::new(time_x - label_w * 0.5, time_y - label_h * 0.5),
            Size::new(label_w, label_h),
            bg_col,
        );
        frame.fill_text(canvas::Text {
            content: time_str,
            position: Point::new(time_x, time_y),
            color: text_col,
            size: TEXT_SIZE.into(),
            font: style::MONO,
            align_x: iced::Alignment::Center.into(),
            align_y: iced::Alignment::Center.into(),
            ..Default::default()
        });
    }

    /// Left legend in the top-left plot corner, right legend in the top-right.
    fn fill_legends(&self, frame: &mut canvas::Frame, ctx: &PlotContext, palette: &Extended) {
        let plot_rect = ctx.plot_rect();

        for side in Side::ALL {
            let (Some(legend), Some(spec)) = (self.legend.get(side), self.spec.side(side)) else {
                continue;
            };
            let emphasis = self.state.emphasis(spec.metric);

            let bg = self.legend_box(side, legend, plot_rect);
            let bg_alpha = if self.state.highlight() == Some(spec.metric) {
                1.0
            } else {
                0.9
            };
            frame.fill_rectangle(
                bg.position(),
                bg.size(),
                palette.background.weakest.color.scale_alpha(bg_alpha),
            );

            let mut y = bg.y + LEGEND_PADDING + LEGEND_LINE_H * 0.5;
            for line in legend_lines(legend) {
                frame.fill_text(canvas::Text {
                    content: line,
                    position: Point::new(bg.x + LEGEND_PADDING, y),
                    color: style::emphasized(legend.color, emphasis),
                    size: TEXT_SIZE.into(),
                    font: style::MONO,
                    align_x: iced::Alignment::Start.into(),
                    align_y: iced::Alignment::Center.into(),
                    ..Default::default()
                });
                y += LEGEND_LINE_H;
            }
        }
    }
}

fn legend_lines(legend: &SideLegend) -> [String; 2] {
    [
        format!("{}: {}", legend.label, legend.actual),
        format!("{}: {}", legend.projected_label, legend.modeled),
    ]
}

/// Absent values lift the pen; each present run becomes one polyline.
fn stroke_channel(
    frame: &mut canvas::Frame,
    ctx: &PlotContext,
    scale: &AxisScale,
    rows: &[Row],
    value: impl Fn(&Row) -> Option<f64>,
    stroke: canvas::Stroke<'_>,
) {
    let mut builder = canvas::path::Builder::new();
    let mut pen_down = false;

    for row in rows {
        match value(row).filter(|v| v.is_finite()) {
            Some(v) => {
                let point = Point::new(ctx.map_x(row.time_ms), ctx.map_y(scale, v));
                if pen_down {
                    builder.line_to(point);
                } else {
                    builder.move_to(point);
                }
                pen_down = true;
            }
            None => pen_down = false,
        }
    }

    frame.stroke(&builder.build(), stroke);
}

impl<'a, M> From<DualAxisChart<'a>> for Element<'a, M, Theme, Renderer>
where
    M: Clone + 'a + 'static + From<ChartEvent>,
{
    fn from(chart: DualAxisChart<'a>) -> Self {
        Element::new(chart)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HitZone {
    Plot,
    XAxis,
    YAxis,
    Outside,
}

#[derive(Debug, Clone, Copy)]
struct Regions {
    left_axis: Rectangle,
    plot: Rectangle,
    right_axis: Rectangle,
    x_axis: Rectangle,
}

impl Regions {
    fn from_layout(root: Layout<'_>) -> Self {
        let root_bounds = root.bounds();

        let to_local = |r: Rectangle| Rectangle {
            x: r.x - root_bounds.x,
            y: r.y - root_bounds.y,
            width: r.width,
            height: r.height,
        };

        // root.children = [ left_axis, plot, right_axis, x_axis ]
        Regions {
            left_axis: to_local(root.child(0).bounds()),
            plot: to_local(root.child(1).bounds()),
            right_axis: to_local(root.child(2).bounds()),
            x_axis: to_local(root.child(3).bounds()),
        }
    }

    fn hit_test(&self, p: Point) -> HitZone {
        if self.plot.contains(p) {
            HitZone::Plot
        } else if self.x_axis.contains(p) {
            HitZone::XAxis
        } else if self.left_axis.contains(p) || self.right_axis.contains(p) {
            HitZone::YAxis
        } else {
            HitZone::Outside
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotContext {
    regions: Regions,
    range: TimeRange,
    left: Option<AxisScale>,
    right: Option<AxisScale>,
}

impl PlotContext {
    fn plot_rect(&self) -> Rectangle {
        self.regions.plot
    }

    fn scale(&self, side: Side) -> Option<&AxisScale> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    fn px_per_ms(&self) -> f64 {
        f64::from(self.regions.plot.width) / self.range.span_ms().max(1) as f64
    }

    /// Plot-local x of a time.
    fn map_x(&self, time_ms: i64) -> f32 {
        ((time_ms - self.range.start_ms) as f64 * self.px_per_ms()) as f32
    }

    /// Time under a plot-local x, clamped to the visible range.
    fn time_at(&self, x: f32) -> i64 {
        let width = self.regions.plot.width.max(1.0);
        let frac = f64::from((x / width).clamp(0.0, 1.0));
        self.range.start_ms + (frac * self.range.span_ms() as f64).round() as i64
    }

    fn map_y(&self, scale: &AxisScale, value: f64) -> f32 {
        let height = self.plot_rect().height;
        height - scale.normalize(value) as f32 * height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::chart::{Defaults, SideSpec};
    use data::time::DAY_MS;

    fn ctx(width: f32, height: f32, range: TimeRange) -> PlotContext {
        let plot = Rectangle {
            x: Y_AXIS_GUTTER,
            y: 0.0,
            width,
            height,
        };
        PlotContext {
            regions: Regions {
                left_axis: Rectangle::new(Point::ORIGIN, Size::new(Y_AXIS_GUTTER, height)),
                plot,
                right_axis: Rectangle::new(
                    Point::new(Y_AXIS_GUTTER + width, 0.0),
                    Size::new(Y_AXIS_GUTTER, height),
                ),
                x_axis: Rectangle::new(
                    Point::new(0.0, height),
                    Size::new(width + 2.0 * Y_AXIS_GUTTER, X_AXIS_HEIGHT),
                ),
            },
            range,
            left: Some(AxisScale { min: 0.0, max: 100.0 }),
            right: None,
        }
    }

    #[test]
    fn pointer_x_maps_to_time_and_back() {
        let range = TimeRange::new(0, 30 * DAY_MS);
        let ctx = ctx(300.0, 100.0, range);

        assert_eq!(ctx.time_at(0.0), 0);
        assert_eq!(ctx.time_at(150.0), 15 * DAY_MS);
        assert_eq!(ctx.time_at(1_000.0), 30 * DAY_MS);
        assert_eq!(ctx.map_x(10 * DAY_MS), 100.0);
    }

    #[test]
    fn values_map_bottom_up() {
        let ctx = ctx(300.0, 100.0, TimeRange::new(0, 30 * DAY_MS));
        let scale = ctx.scale(Side::Left).copied().unwrap();
        assert_eq!(ctx.map_y(&scale, 0.0), 100.0);
        assert_eq!(ctx.map_y(&scale, 100.0), 0.0);
        assert_eq!(ctx.map_y(&scale, 25.0), 75.0);
        assert!(ctx.scale(Side::Right).is_none());
    }

    #[test]
    fn hit_zones_follow_regions() {
        let ctx = ctx(300.0, 100.0, TimeRange::new(0, 30 * DAY_MS));
        let regions = ctx.regions;
        assert_eq!(regions.hit_test(Point::new(Y_AXIS_GUTTER + 10.0, 50.0)), HitZone::Plot);
        assert_eq!(regions.hit_test(Point::new(10.0, 50.0)), HitZone::YAxis);
        assert_eq!(regions.hit_test(Point::new(10.0, 110.0)), HitZone::XAxis);
        assert_eq!(regions.hit_test(Point::new(-1.0, -1.0)), HitZone::Outside);
    }

    #[test]
    fn pointer_time_follows_panned_range() {
        let ctx = ctx(300.0, 100.0, TimeRange::new(0, 30 * DAY_MS));
        let panned = PlotContext {
            range: TimeRange::new(10 * DAY_MS, 40 * DAY_MS),
            ..ctx
        };
        assert_eq!(ctx.time_at(150.0), 15 * DAY_MS);
        assert_eq!(panned.time_at(150.0), 25 * DAY_MS);
    }

    #[test]
    fn legend_entries_map_to_their_metric() {
        let spec = ChartSpec::new("Deaths")
            .left(SideSpec::new(Metric::Death, "Total Deaths", Color::BLACK))
            .right(SideSpec::new(Metric::DeathIncrease, "Daily Deaths", Color::WHITE));
        let series = Series::default();
        let state = ChartState::default();
        let legend = spec.legend(&state, &series, &Defaults::default());
        let chart = DualAxisChart::new(&spec, &series, &state, legend);

        let ctx = ctx(600.0, 200.0, TimeRange::new(0, 30 * DAY_MS));
        let plot = ctx.plot_rect();

        assert_eq!(
            chart.legend_at(&ctx, Point::new(plot.x + 8.0, plot.y + 8.0)),
            Some(Metric::Death)
        );
        assert_eq!(
            chart.legend_at(&ctx, Point::new(plot.x + plot.width - 8.0, plot.y + 8.0)),
            Some(Metric::DeathIncrease)
        );
        assert_eq!(
            chart.legend_at(&ctx, Point::new(plot.x + plot.width * 0.5, plot.y + 80.0)),
            None
        );
    }

    #[test]
    fn legend_shows_both_channels() {
        let legend = SideLegend {
            label: "Total Deaths".to_string(),
            projected_label: "Projected Total Deaths".to_string(),
            actual: "1,200".to_string(),
            modeled: "N/A".to_string(),
            color: Color::BLACK,
        };
        assert_eq!(
            legend_lines(&legend),
            [
                "Total Deaths: 1,200".to_string(),
                "Projected Total Deaths: N/A".to_string()
            ]
        );
    }
}
