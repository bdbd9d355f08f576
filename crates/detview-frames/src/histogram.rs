//! Histogram of the current event's hit values.

use detview_core::data::{EventRecord, ScalingRange};
use detview_core::render::Surface;
use detview_core::widget::{Area, WidgetId};
use detview_core::{ConfigTable, Frame, FrameBase, FrameResult, Space, UiContext};
use detview_widgets::{MapArea, PersistButton};
use kurbo::{Point, Rect};
use std::any::Any;

/// Fraction of the frame reserved for the axes and their labels.
pub const AXIS_MARGIN: f64 = 0.1;

/// Bins outside the domain: one underflow, one overflow and a margin bin on
/// each side of the value bins.
const EXTRA_BINS: usize = 4;

/// Upper bound on value bins; wider domains are compressed.
const MAX_VALUE_BINS: usize = 500;

/// Lower edge of the y axis in log mode.
const LOG_FLOOR: f64 = 0.1;

const TICK_COUNT: u32 = 10;

const LOG_Y_KEY: &str = "logY";
const DOMAIN_MIN_KEY: &str = "domainMin";
const DOMAIN_MAX_KEY: &str = "domainMax";

/// Default hit value domain.
pub const DEFAULT_DOMAIN: ScalingRange = ScalingRange { min: 0.0, max: 100.0 };

/// A tick on one of the axes: position along the axis as a fraction of the
/// plot, and its label.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

pub struct Histogram {
    base: FrameBase,
    log_y_button: Option<WidgetId>,
    overflow_button: Option<WidgetId>,
    map: Option<WidgetId>,
    log_y: bool,
    overflow: bool,
    domain: ScalingRange,
    values: Vec<f64>,
    cursor: Option<Point>,
}

impl Histogram {
    pub const NAME: &'static str = "Histogram";

    pub fn create(base: FrameBase) -> Box<dyn Frame> {
        Box::new(Self {
            base,
            log_y_button: None,
            overflow_button: None,
            map: None,
            log_y: false,
            overflow: false,
            domain: DEFAULT_DOMAIN,
            values: Vec::new(),
            cursor: None,
        })
    }

    pub fn log_y(&self) -> bool {
        self.log_y
    }

    pub fn overflow(&self) -> bool {
        self.overflow
    }

    pub fn domain(&self) -> ScalingRange {
        self.domain
    }

    /// Change the value domain. Takes effect with the next event.
    pub fn set_domain(&mut self, domain: ScalingRange) {
        self.domain = domain;
    }

    /// Bin contents, including the overflow and margin bins.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Pointer position over the plot, as a fraction of the plot.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Bin holding `value`. Values at or beyond the domain edges land in the
    /// first or last bin.
    pub fn calculate_bin(&self, value: f64) -> usize {
        let last = self.values.len().saturating_sub(1);
        if value <= self.domain.min {
            0
        } else if value >= self.domain.max {
            last
        } else {
            let inner = self.values.len().saturating_sub(EXTRA_BINS) as f64;
            let bin = (self.domain.fraction(value) * inner) as usize + 2;
            bin.min(last)
        }
    }

    /// Fill the bins from an event's hits.
    pub fn calculate_histogram(&mut self, record: &EventRecord) {
        let span = self.domain.span().max(0.0) as usize;
        let compression = if span + EXTRA_BINS < MAX_VALUE_BINS {
            1
        } else {
            (span + EXTRA_BINS) / MAX_VALUE_BINS
        };
        self.values = vec![0.0; span / compression + EXTRA_BINS];
        for &hit in &record.hits {
            let bin = self.calculate_bin(hit);
            self.values[bin] += 1.0;
        }
    }

    /// Displayed y range. Overflow bins only count when they are shown.
    pub fn y_range(&self) -> (f64, f64) {
        let shown = if self.overflow || self.values.len() < 2 {
            &self.values[..]
        } else {
            &self.values[1..self.values.len() - 1]
        };
        let max = shown.iter().copied().fold(0.0, f64::max);
        if self.log_y { (LOG_FLOOR, max) } else { (0.0, max) }
    }

    /// Bar height as a fraction of the frame.
    pub fn scale_y(&self, value: f64) -> f64 {
        let (_, max) = self.y_range();
        if self.log_y && value > 0.0 && max > 1.0 {
            value.log10() / (max.log10() - LOG_FLOOR.log10()) * (1.0 - AXIS_MARGIN)
        } else if max > 0.0 {
            value / max * (1.0 - AXIS_MARGIN)
        } else {
            0.0
        }
    }

    /// Ticks on multiples of the largest power of ten below the axis maximum.
    pub fn x_ticks(&self) -> Vec<Tick> {
        let len = self.values.len();
        if len == 0 {
            return Vec::new();
        }
        tick_values(self.domain.min, self.domain.max)
            .map(|value| Tick {
                position: self.calculate_bin(value) as f64 / len as f64,
                label: format_value(value),
            })
            .collect()
    }

    pub fn y_ticks(&self) -> Vec<Tick> {
        let (min, max) = self.y_range();
        tick_values(min, max)
            .map(|value| Tick {
                position: self.scale_y(value),
                label: format_value(value),
            })
            .collect()
    }

    /// Readout for the pointer position: the value under it and its bin count.
    pub fn readout(&self) -> Option<String> {
        let cursor = self.cursor?;
        if self.values.is_empty() || cursor.x <= 0.0 || cursor.x >= 1.0 {
            return None;
        }
        let bin = ((cursor.x * self.values.len() as f64) as usize).min(self.values.len() - 1);
        Some(format!(
            "({}, {})",
            format_value(self.domain.value_at(cursor.x)),
            format_value(self.values[bin])
        ))
    }

    fn draw_bars(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let (_, max) = self.y_range();
        if self.values.is_empty() || max <= 0.0 {
            return;
        }
        let len = self.values.len();
        let bar_width = (1.0 - AXIS_MARGIN) / len as f64;
        let color = area.palette().data;
        for (bin, &value) in self.values.iter().enumerate() {
            if !self.overflow && (bin == 0 || bin == len - 1) {
                continue;
            }
            let height = self.scale_y(value);
            if height <= 0.0 {
                continue;
            }
            let x = bin as f64 / len as f64 * (1.0 - AXIS_MARGIN) + AXIS_MARGIN;
            let bottom = 1.0 - AXIS_MARGIN;
            surface.fill_rect(
                area.sub_rect(Rect::new(x, bottom - height, x + bar_width, bottom)),
                color,
            );
        }
    }

    fn draw_axes(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let palette = area.palette();
        let bounds = area.absolute();
        let origin = area.sub_rect(Rect::new(AXIS_MARGIN, 0.0, 1.0, 1.0 - AXIS_MARGIN));
        // One pixel lines along the bottom and left of the plot
        surface.fill_rect(Rect::new(origin.x0, origin.y1, origin.x1, origin.y1 + 1.0), palette.aspect);
        surface.fill_rect(Rect::new(origin.x0 - 1.0, origin.y0, origin.x0, origin.y1), palette.aspect);

        let label_height = AXIS_MARGIN / 2.0 * bounds.height();
        for tick in self.x_ticks() {
            let x = AXIS_MARGIN + tick.position * (1.0 - AXIS_MARGIN);
            let at = area.sub_rect(Rect::new(x, 1.0 - AXIS_MARGIN, x, 1.0 - AXIS_MARGIN));
            surface.fill_rect(Rect::new(at.x0, at.y0, at.x0 + 1.0, at.y0 + label_height / 3.0), palette.aspect);
            let text = Rect::new(at.x0, at.y0, at.x0 + (1.0 - AXIS_MARGIN) / 10.0 * bounds.width(), at.y0 + label_height);
            surface.draw_text(text, &tick.label, palette.text);
        }
        for tick in self.y_ticks() {
            let y = 1.0 - AXIS_MARGIN - tick.position;
            let at = area.sub_rect(Rect::new(AXIS_MARGIN, y, AXIS_MARGIN, y));
            surface.fill_rect(Rect::new(at.x0 - label_height / 3.0, at.y0, at.x0, at.y0 + 1.0), palette.aspect);
            let text = Rect::new(bounds.x0, at.y0 - label_height, at.x0, at.y0);
            surface.draw_text(text, &tick.label, palette.text);
        }
    }
}

/// Multiples of the largest power of ten not above `max`, inside `min..=max`.
fn tick_values(min: f64, max: f64) -> impl Iterator<Item = f64> {
    let step = if max > 0.0 { 10f64.powi(max.log10().floor() as i32) } else { 0.0 };
    (0..TICK_COUNT)
        .map(move |tick| step * f64::from(tick))
        .filter(move |&value| step > 0.0 && value >= min && value <= max)
}

fn format_value(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value.round())
    } else {
        format!("{value:.2}")
    }
}

impl Frame for Histogram {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &FrameBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FrameBase {
        &mut self.base
    }

    fn aspect_ratio(&self) -> f64 {
        0.75
    }

    fn pre_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> FrameResult<()> {
        if let Some(config) = config {
            self.log_y = config.get_bool(LOG_Y_KEY).unwrap_or(false);
            if let (Ok(min), Ok(max)) = (config.get_d(DOMAIN_MIN_KEY), config.get_d(DOMAIN_MAX_KEY)) {
                self.domain = ScalingRange::new(min, max);
            }
        }
        // Overflow always starts hidden
        self.overflow = false;

        // The plot goes in first so the toggles stay on top of it
        let gui = self.base.gui_mut();
        self.map = Some(gui.new_widget(
            ctx,
            Rect::new(AXIS_MARGIN, 0.0, 1.0, 1.0 - AXIS_MARGIN),
            Space::Local,
            MapArea::new(),
        )?);
        self.log_y_button = Some(gui.new_widget(
            ctx,
            Rect::new(0.8, 0.0, 1.0, 0.05),
            Space::Local,
            PersistButton::new("Log Y").on(self.log_y),
        )?);
        self.overflow_button = Some(gui.new_widget(
            ctx,
            Rect::new(0.8, 0.05, 1.0, 0.1),
            Space::Local,
            PersistButton::new("Overflow"),
        )?);
        Ok(())
    }

    fn event_loop(&mut self, _ctx: &mut UiContext) {
        while let Some(event) = self.base.pop_event() {
            let Some(widget) = event.widget else {
                continue;
            };
            let Some(button) = self.base.gui().widget::<PersistButton>(widget) else {
                continue;
            };
            if Some(widget) == self.log_y_button {
                self.log_y = button.is_on();
            } else if Some(widget) == self.overflow_button {
                self.overflow = button.is_on();
            }
        }
        // The map clears itself on lost focus without reporting it
        self.cursor = self
            .map
            .and_then(|id| self.base.gui().widget::<MapArea>(id))
            .and_then(MapArea::position);
    }

    fn process_event(&mut self, record: &EventRecord) {
        self.calculate_histogram(record);
    }

    fn render2d(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        let area = Area::new(ctx, self.base.rect());
        self.draw_bars(surface, &area);
        self.draw_axes(surface, &area);
        if let Some(readout) = self.readout() {
            let text = area.sub_rect(Rect::new(AXIS_MARGIN, 1.0 - AXIS_MARGIN / 2.0, 1.0, 1.0));
            surface.draw_text(text, &readout, area.palette().text);
        }
    }

    fn save_configuration(&self, config: &mut ConfigTable) {
        config.set_bool(LOG_Y_KEY, self.log_y);
        config.set_d(DOMAIN_MIN_KEY, self.domain.min);
        config.set_d(DOMAIN_MAX_KEY, self.domain.max);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
