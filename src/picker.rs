use chrono::NaiveDate;
use egui::{Area, Frame, Key, Order, Response, Ui, Widget};
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, WeekStart};
use crate::input::{DateRangeInputs, EditBuffers};
use crate::popup::{DateRangePopup, DisplayedMonth};
use crate::selection::{RangeSelection, SelectionEvent};

const MONTH_WIDTH: f32 = 280.0;

/// Per-instance widget state, persisted in egui memory between frames.
#[derive(Clone, Default, Serialize, Deserialize)]
struct PickerState {
    open: bool,
    selection: RangeSelection,
    display: DisplayedMonth,
    buffers: EditBuffers,
}

/// Shows a pair of date inputs, and opens a popover calendar for picking
/// a start/end date range.
///
/// The selected range is owned by the caller; the widget keeps its own
/// transient state (active endpoint, hover preview, displayed month) in
/// egui memory.
///
/// ```
/// # egui::__run_test_ui(|ui| {
/// # let mut range = egui_daterange::DateRange::default();
/// ui.add(egui_daterange::DateRangePicker::new(&mut range));
/// # });
/// ```
#[must_use = "You should put this widget in a ui with `ui.add(widget);`"]
pub struct DateRangePicker<'a> {
    selection: &'a mut DateRange,
    id_salt: Option<&'a str>,
    start_placeholder: String,
    end_placeholder: String,
    disabled: bool,
    week_start: WeekStart,
    months_shown: u8,
    calendar_week: bool,
    highlight_weekends: bool,
    format: String,
    #[allow(clippy::type_complexity)]
    on_change: Option<Box<dyn FnMut(Option<NaiveDate>, Option<NaiveDate>) + 'a>>,
    on_focus: Option<Box<dyn FnMut(&str) + 'a>>,
}

impl<'a> DateRangePicker<'a> {
    pub fn new(selection: &'a mut DateRange) -> Self {
        Self {
            selection,
            id_salt: None,
            start_placeholder: "Start date".to_owned(),
            end_placeholder: "End date".to_owned(),
            disabled: false,
            week_start: WeekStart::default(),
            months_shown: 2,
            calendar_week: false,
            highlight_weekends: true,
            format: "%b %d, %Y".to_owned(),
            on_change: None,
            on_focus: None,
        }
    }

    /// Add id source.
    /// Must be set if multiple date range pickers are in the same Ui.
    #[inline]
    pub fn id_salt(mut self, id_salt: &'a str) -> Self {
        self.id_salt = Some(id_salt);
        self
    }

    /// Hint text of the empty start input. (Default: "Start date")
    #[inline]
    pub fn start_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.start_placeholder = placeholder.into();
        self
    }

    /// Hint text of the empty end input. (Default: "End date")
    #[inline]
    pub fn end_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.end_placeholder = placeholder.into();
        self
    }

    /// Ignore all interaction and keep the dialog closed. (Default: false)
    #[inline]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// First day of the week in the calendar grid. (Default: Monday)
    #[inline]
    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Number of months shown side by side, 1 or 2. (Default: 2)
    #[inline]
    pub fn months_shown(mut self, months: u8) -> Self {
        self.months_shown = months;
        self
    }

    /// Show the week number column. (Default: false)
    #[inline]
    pub fn calendar_week(mut self, week: bool) -> Self {
        self.calendar_week = week;
        self
    }

    /// Highlight weekend days. (Default: true)
    #[inline]
    pub fn highlight_weekends(mut self, highlight_weekends: bool) -> Self {
        self.highlight_weekends = highlight_weekends;
        self
    }

    /// Change the format shown in the inputs. (Default: %b %d, %Y)
    /// See [`chrono::format::strftime`] for valid formats.
    #[inline]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Called with the committed `(from, to)` pair on every range change.
    #[inline]
    pub fn on_change(
        mut self,
        on_change: impl FnMut(Option<NaiveDate>, Option<NaiveDate>) + 'a,
    ) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Called with "Start Date", "End Date" or "" whenever the active
    /// endpoint changes.
    #[inline]
    pub fn on_focus(mut self, on_focus: impl FnMut(&str) + 'a) -> Self {
        self.on_focus = Some(Box::new(on_focus));
        self
    }
}

impl Widget for DateRangePicker<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let id = ui.make_persistent_id(self.id_salt);
        let mut state: PickerState = ui
            .data_mut(|data| data.get_persisted(id))
            .unwrap_or_default();

        if !state.selection.is_initialized() {
            state.selection.seed(self.selection.from, self.selection.to);
        } else if state.selection.range() != *self.selection {
            // The host mutated the range between frames.
            state.selection.adopt(*self.selection);
        }
        if self.disabled {
            state.open = false;
            state.display.setup = false;
        }

        let inputs_output = DateRangeInputs {
            selection: &mut state.selection,
            buffers: &mut state.buffers,
            start_placeholder: &self.start_placeholder,
            end_placeholder: &self.end_placeholder,
            format: &self.format,
            enabled: !self.disabled,
        }
        .show(ui);
        let mut response = inputs_output.response;

        if inputs_output.open_requested && !self.disabled {
            state.open = true;
        }

        if state.open {
            let months = u32::from(self.months_shown.clamp(1, 2));
            let width = MONTH_WIDTH * months as f32 + 16.0;
            let mut pos = response.rect.left_bottom();
            pos.y += ui.spacing().item_spacing.y;
            if pos.x + width > ui.clip_rect().right() {
                pos.x = (ui.clip_rect().right() - width).max(ui.clip_rect().left());
            }

            let area_response = Area::new(id.with("popup"))
                .order(Order::Foreground)
                .fixed_pos(pos)
                .show(ui.ctx(), |ui| {
                    Frame::popup(ui.style())
                        .show(ui, |ui| {
                            ui.set_min_width(width);
                            ui.set_max_width(width);

                            DateRangePopup {
                                selection: &mut state.selection,
                                display: &mut state.display,
                                week_start: self.week_start,
                                months_shown: months,
                                calendar_week: self.calendar_week,
                                highlight_weekends: self.highlight_weekends,
                            }
                            .draw(ui)
                        })
                        .inner
                });

            let done = area_response.inner;
            let dismissed = ui.input(|i| i.key_pressed(Key::Escape))
                || (!inputs_output.open_requested
                    && area_response.response.clicked_elsewhere());
            if done || dismissed {
                state.open = false;
                state.display.setup = false;
                state.selection.set_hover(None);
            }
        }

        let committed = state.selection.range();
        if committed != *self.selection {
            *self.selection = committed;
            response.mark_changed();
        }
        for event in state.selection.drain_events() {
            match event {
                SelectionEvent::RangeChanged { from, to } => {
                    if let Some(on_change) = &mut self.on_change {
                        on_change(from, to);
                    }
                }
                SelectionEvent::FocusChanged { label } => {
                    if let Some(on_focus) = &mut self.on_focus {
                        on_focus(label);
                    }
                }
            }
        }

        ui.data_mut(|data| data.insert_persisted(id, state));
        response
    }
}
