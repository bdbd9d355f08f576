//! Text summary of the current event.

use detview_core::data::EventRecord;
use detview_core::widget::WidgetId;
use detview_core::{ConfigTable, Frame, FrameBase, FrameResult, Space, UiContext};
use detview_widgets::Label;
use kurbo::Rect;
use std::any::Any;

/// Text rows available to the summary.
const ROWS: usize = 8;

const PLACEHOLDER: &str = "No event";

/// Format a number as `0x` followed by upper case hex digits.
pub fn to_hex_string(number: u32) -> String {
    format!("0x{number:X}")
}

/// All 32 bits of a number, most significant first, in groups of four.
pub fn to_byte_string(number: u32) -> String {
    let bits = format!("{number:032b}");
    bits.as_bytes()
        .chunks(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Summary lines for an event.
pub fn describe(record: &EventRecord) -> Vec<String> {
    let mut lines = vec![
        "EV:".to_string(),
        format!("  GTID: {}", record.gtid),
        format!("  Trigger Word: {}", to_hex_string(record.trigger_word)),
        format!("  Trigger Bits: {}", to_byte_string(record.trigger_word)),
        format!("  Nhit (Cal): {}", record.hit_count()),
        format!("  Nhit (UnCal): {}", record.uncalibrated_hits),
    ];
    if let Some(mc_hits) = record.mc_hits {
        lines.push("MC:".to_string());
        lines.push(format!("  Nhit: {mc_hits}"));
    }
    lines
}

/// Shows the GTID, trigger word and hit counts of the current event.
pub struct EventInfo {
    base: FrameBase,
    rows: Vec<WidgetId>,
}

impl EventInfo {
    pub const NAME: &'static str = "EventInfo";

    pub fn create(base: FrameBase) -> Box<dyn Frame> {
        Box::new(Self {
            base,
            rows: Vec::with_capacity(ROWS),
        })
    }

    /// Text currently shown, one entry per non-empty row.
    pub fn lines(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|&id| self.base.gui().widget::<Label>(id))
            .map(Label::text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn show(&mut self, lines: &[String]) {
        for (row, &id) in self.rows.iter().enumerate() {
            if let Some(label) = self.base.gui_mut().widget_mut::<Label>(id) {
                label.set_text(lines.get(row).map(String::as_str).unwrap_or_default());
            }
        }
    }
}

impl Frame for EventInfo {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &FrameBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FrameBase {
        &mut self.base
    }

    fn pre_initialise(&mut self, ctx: &mut UiContext, _config: Option<&ConfigTable>) -> FrameResult<()> {
        let height = 1.0 / ROWS as f64;
        for row in 0..ROWS {
            let top = row as f64 * height;
            let id = self.base.gui_mut().new_widget(
                ctx,
                Rect::new(0.0, top, 1.0, top + height),
                Space::Local,
                Label::default(),
            )?;
            self.rows.push(id);
        }
        self.show(&[PLACEHOLDER.to_string()]);
        Ok(())
    }

    fn event_loop(&mut self, _ctx: &mut UiContext) {
        // Labels report nothing worth acting on
        while self.base.pop_event().is_some() {}
    }

    fn process_event(&mut self, record: &EventRecord) {
        let lines = describe(record);
        if lines.len() > self.rows.len() {
            log::debug!("Event summary truncated to {} rows", self.rows.len());
        }
        self.show(&lines);
    }

    fn save_configuration(&self, _config: &mut ConfigTable) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
