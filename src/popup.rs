use chrono::{Datelike, NaiveDate};
use egui::{Align, Button, Color32, Direction, Layout, Response, RichText, Ui, Vec2};
use egui_extras::{Column, Size, StripBuilder, TableBuilder};
use serde::{Deserialize, Serialize};

use crate::calendar::{
    self, endpoint_of, in_range, month_grid, month_name, DateRange, WeekStart, WEEKS_PER_GRID,
};
use crate::log_or_panic;
use crate::selection::RangeSelection;

const ROW_HEIGHT: f32 = 20.0;
const SPACING: f32 = 2.0;

/// The month currently shown in the dialog, stepped by the navigation
/// arrows independently of the selection.
#[derive(Clone, Default, Serialize, Deserialize)]
pub(crate) struct DisplayedMonth {
    pub year: i32,
    pub month: u32,
    pub setup: bool,
}

pub(crate) struct DateRangePopup<'a> {
    pub selection: &'a mut RangeSelection,
    pub display: &'a mut DisplayedMonth,
    pub week_start: WeekStart,
    pub months_shown: u32,
    pub calendar_week: bool,
    pub highlight_weekends: bool,
}

impl DateRangePopup<'_> {
    /// Returns `true` when the dialog asked to be closed.
    pub fn draw(&mut self, ui: &mut Ui) -> bool {
        if !self.display.setup {
            let anchor = self.selection.range().from.unwrap_or_else(calendar::today);
            self.display.year = anchor.year();
            self.display.month = anchor.month();
            self.display.setup = true;
        }

        let mut close = false;
        let mut hovered_day = None;
        let grid_height = (SPACING + ROW_HEIGHT) * (WEEKS_PER_GRID as f32 + 1.0);
        ui.spacing_mut().item_spacing = Vec2::splat(SPACING);
        StripBuilder::new(ui)
            .clip(false)
            .size(Size::exact(ROW_HEIGHT))
            .size(Size::exact(grid_height))
            .size(Size::exact(ROW_HEIGHT))
            .vertical(|mut strip| {
                strip.strip(|builder| {
                    builder
                        .size(Size::exact(ROW_HEIGHT))
                        .sizes(Size::remainder(), self.months_shown as usize)
                        .size(Size::exact(ROW_HEIGHT))
                        .horizontal(|mut strip| {
                            strip.cell(|ui| {
                                ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                                    if ui.button("<").on_hover_text("show previous month").clicked()
                                    {
                                        let (year, month) = calendar::previous_month(
                                            self.display.year,
                                            self.display.month,
                                        );
                                        self.display.year = year;
                                        self.display.month = month;
                                    }
                                });
                            });
                            for page in 0..self.months_shown {
                                let (year, month) =
                                    nth_month(self.display.year, self.display.month, page);
                                strip.cell(|ui| {
                                    ui.with_layout(
                                        Layout::centered_and_justified(Direction::TopDown),
                                        |ui| {
                                            ui.label(
                                                RichText::new(format!(
                                                    "{} {year}",
                                                    month_name(month)
                                                ))
                                                .strong(),
                                            );
                                        },
                                    );
                                });
                            }
                            strip.cell(|ui| {
                                ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                                    if ui.button(">").on_hover_text("show next month").clicked() {
                                        let (year, month) = calendar::next_month(
                                            self.display.year,
                                            self.display.month,
                                        );
                                        self.display.year = year;
                                        self.display.month = month;
                                    }
                                });
                            });
                        });
                });

                strip.strip(|builder| {
                    builder
                        .sizes(Size::remainder(), self.months_shown as usize)
                        .horizontal(|mut strip| {
                            for page in 0..self.months_shown {
                                let (year, month) =
                                    nth_month(self.display.year, self.display.month, page);
                                strip.cell(|ui| {
                                    ui.push_id(page, |ui| {
                                        if let Some(day) = self.month_table(ui, year, month) {
                                            hovered_day = Some(day);
                                        }
                                    });
                                });
                            }
                        });
                });

                strip.strip(|builder| {
                    builder.sizes(Size::remainder(), 3).horizontal(|mut strip| {
                        strip.cell(|ui| {
                            ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                                if ui.button("Reset").clicked() {
                                    self.selection.reset();
                                }
                            });
                        });
                        strip.empty();
                        strip.cell(|ui| {
                            ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                                if ui.button("Done").clicked() {
                                    close = true;
                                }
                            });
                        });
                    });
                });
            });

        self.selection.set_hover(hovered_day);
        if close {
            self.display.setup = false;
        }
        close
    }

    /// One month grid. Returns the day under the pointer, if any.
    fn month_table(&mut self, ui: &mut Ui, year: i32, month: u32) -> Option<NaiveDate> {
        let weeks = match month_grid(year, month, self.week_start) {
            Ok(weeks) => weeks,
            Err(err) => {
                log_or_panic!("date range popup asked for an impossible month: {}", err);
                return None;
            }
        };
        let today = calendar::today();
        let range = self.selection.range();
        let preview = preview_range(self.selection);
        let mut hovered = None;

        ui.spacing_mut().item_spacing = Vec2::new(1.0, SPACING);
        TableBuilder::new(ui)
            .vscroll(false)
            .columns(Column::remainder(), if self.calendar_week { 8 } else { 7 })
            .header(ROW_HEIGHT, |mut header| {
                if self.calendar_week {
                    header.col(|ui| {
                        ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
                            ui.label("Wk");
                        });
                    });
                }
                for name in self.week_start.day_names() {
                    header.col(|ui| {
                        ui.with_layout(Layout::centered_and_justified(Direction::TopDown), |ui| {
                            ui.label(name);
                        });
                    });
                }
            })
            .body(|mut body| {
                for week in &weeks {
                    body.row(ROW_HEIGHT, |mut row| {
                        if self.calendar_week {
                            row.col(|ui| {
                                ui.label(week.number.to_string());
                            });
                        }
                        for &day in &week.days {
                            row.col(|ui| {
                                ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                                    let response =
                                        self.day_button(ui, day, month, today, &range, preview);
                                    if response.hovered() {
                                        hovered = Some(day);
                                    }
                                    if response.clicked() {
                                        self.selection.pick(day);
                                    }
                                });
                            });
                        }
                    });
                }
            });

        hovered
    }

    fn day_button(
        &self,
        ui: &mut Ui,
        day: NaiveDate,
        month: u32,
        today: NaiveDate,
        range: &DateRange,
        preview: Option<(NaiveDate, NaiveDate)>,
    ) -> Response {
        let endpoint = endpoint_of(day, range);
        let in_committed = in_range(day, range);
        let in_preview = preview.is_some_and(|(lo, hi)| lo <= day && day <= hi);

        let selection_fill = ui.visuals().selection.bg_fill;
        let fill = if endpoint.is_some() {
            selection_fill
        } else if in_committed {
            selection_fill.gamma_multiply(0.4)
        } else if in_preview {
            selection_fill.gamma_multiply(0.2)
        } else if self.highlight_weekends && calendar::is_weekend(day) {
            if ui.visuals().dark_mode {
                Color32::DARK_RED
            } else {
                Color32::LIGHT_RED
            }
        } else {
            ui.visuals().extreme_bg_color
        };

        let mut text_color = if endpoint.is_some() {
            ui.visuals().selection.stroke.color
        } else {
            ui.visuals().widgets.inactive.text_color()
        };
        if day.month() != month {
            text_color = text_color.linear_multiply(0.5);
        }

        let response = ui.add(
            Button::new(RichText::new(day.day().to_string()).color(text_color)).fill(fill),
        );

        if day == today {
            // Encircle today's date
            let stroke = ui.visuals().widgets.inactive.fg_stroke;
            ui.painter()
                .circle_stroke(response.rect.center(), 8.0, stroke);
        }

        response
    }
}

/// The preview of the range under construction: from the committed start
/// up to the hovered day, while the end is still open.
fn preview_range(selection: &RangeSelection) -> Option<(NaiveDate, NaiveDate)> {
    let range = selection.range();
    let from = range.from?;
    if range.to.is_some() {
        return None;
    }
    let hover = selection.hover()?;
    (hover > from).then_some((from, hover))
}

fn nth_month(year: i32, month: u32, offset: u32) -> (i32, u32) {
    (0..offset).fold((year, month), |(year, month), _| {
        calendar::next_month(year, month)
    })
}
