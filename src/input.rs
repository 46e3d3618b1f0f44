use chrono::NaiveDate;
use egui::{Response, RichText, TextEdit, Ui};
use serde::{Deserialize, Serialize};

use crate::selection::{RangeEnd, RangeSelection};

const INPUT_WIDTH: f32 = 110.0;

/// In-progress text of the two inputs, kept between frames while the
/// user is typing.
#[derive(Clone, Default, Serialize, Deserialize)]
pub(crate) struct EditBuffers {
    pub start: String,
    pub end: String,
}

pub(crate) struct InputsOutput {
    pub response: Response,
    /// The user interacted with an input in a way that should open the
    /// calendar dialog.
    pub open_requested: bool,
}

/// The two date text inputs reflecting the current range.
///
/// Pure view over the selection snapshot: clicking or focusing an input
/// engages that endpoint, committing typed text turns into a manual
/// edit, and everything else is left to the state machine.
pub(crate) struct DateRangeInputs<'a> {
    pub selection: &'a mut RangeSelection,
    pub buffers: &'a mut EditBuffers,
    pub start_placeholder: &'a str,
    pub end_placeholder: &'a str,
    pub format: &'a str,
    pub enabled: bool,
}

impl DateRangeInputs<'_> {
    pub fn show(&mut self, ui: &mut Ui) -> InputsOutput {
        let mut open_requested = false;
        let inner = ui.horizontal(|ui| {
            let icon = ui.label(RichText::new("📆"));
            let start = self.date_input(ui, RangeEnd::From, &mut open_requested);
            let arrow = ui.label(RichText::new("→").weak());
            let end = self.date_input(ui, RangeEnd::To, &mut open_requested);
            icon.union(start).union(arrow).union(end)
        });
        InputsOutput {
            response: inner.inner,
            open_requested,
        }
    }

    fn date_input(&mut self, ui: &mut Ui, end: RangeEnd, open_requested: &mut bool) -> Response {
        let placeholder = match end {
            RangeEnd::From => self.start_placeholder,
            RangeEnd::To => self.end_placeholder,
        };
        let response = {
            let buffer = match end {
                RangeEnd::From => &mut self.buffers.start,
                RangeEnd::To => &mut self.buffers.end,
            };
            ui.add_enabled(
                self.enabled,
                TextEdit::singleline(buffer)
                    .hint_text(placeholder)
                    .desired_width(INPUT_WIDTH),
            )
        };

        if response.gained_focus() || response.clicked() {
            *open_requested = true;
            self.selection.engage(end);
        }

        if response.lost_focus() {
            let committed = self.endpoint(end);
            let text = match end {
                RangeEnd::From => self.buffers.start.clone(),
                RangeEnd::To => self.buffers.end.clone(),
            };
            match parse_entry(&text, self.format) {
                Some(value) if value != committed => self.selection.manual_edit(end, value),
                Some(_) => {}
                None => log::trace!("ignoring unparsable date entry {text:?}"),
            }
        }

        // While the input is not being edited it mirrors the committed
        // endpoint (which also restores the text after a rejected edit).
        if !response.has_focus() {
            let committed_text = self
                .endpoint(end)
                .map(|day| day.format(self.format).to_string())
                .unwrap_or_default();
            let buffer = match end {
                RangeEnd::From => &mut self.buffers.start,
                RangeEnd::To => &mut self.buffers.end,
            };
            if *buffer != committed_text {
                *buffer = committed_text;
            }
        }

        if self.selection.focus() == Some(end.into()) {
            let stroke = ui.visuals().selection.stroke;
            ui.painter()
                .hline(response.rect.x_range(), response.rect.bottom() + 1.0, stroke);
        }

        response
    }

    fn endpoint(&self, end: RangeEnd) -> Option<NaiveDate> {
        let range = self.selection.range();
        match end {
            RangeEnd::From => range.from,
            RangeEnd::To => range.to,
        }
    }
}

/// `None` means the text is not a date; `Some(None)` means the user
/// cleared the input.
fn parse_entry(text: &str, format: &str) -> Option<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Some(None);
    }
    NaiveDate::parse_from_str(text, format)
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_entry_accepts_the_display_format() {
        assert_eq!(
            parse_entry("Mar 10, 2024", "%b %d, %Y"),
            Some(Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()))
        );
    }

    #[test]
    fn parse_entry_falls_back_to_iso() {
        assert_eq!(
            parse_entry("2024-03-10", "%b %d, %Y"),
            Some(Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()))
        );
    }

    #[test]
    fn parse_entry_empty_clears() {
        assert_eq!(parse_entry("   ", "%b %d, %Y"), Some(None));
    }

    #[test]
    fn parse_entry_rejects_garbage() {
        assert_eq!(parse_entry("not a date", "%b %d, %Y"), None);
        assert_eq!(parse_entry("2024-13-40", "%b %d, %Y"), None);
    }
}
