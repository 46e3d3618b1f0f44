//! A date-range picker widget for [`egui`](https://github.com/emilk/egui):
//! a pair of date inputs plus a popover calendar dialog for selecting a
//! start/end date range, with hover preview of the range under
//! construction.
//!
//! ```
//! # egui::__run_test_ui(|ui| {
//! let mut range = egui_daterange::DateRange::default();
//! ui.add(
//!     egui_daterange::DateRangePicker::new(&mut range)
//!         .id_salt("travel_dates")
//!         .on_change(|from, to| log::info!("picked {from:?} .. {to:?}")),
//! );
//! # });
//! ```

#![forbid(unsafe_code)]

mod calendar;
mod input;
mod picker;
mod popup;
mod selection;

pub use crate::calendar::{
    endpoint_of, in_range, is_weekend, month_grid, truncate_to_day, CalendarError, DateRange,
    Endpoint, Week, WeekStart, WEEKS_PER_GRID,
};
pub use crate::picker::DateRangePicker;
pub use crate::selection::{ActiveEnd, RangeEnd, RangeSelection, SelectionEvent};

// ---------------------------------------------------------------------------

/// Panic in debug builds, log otherwise.
macro_rules! log_or_panic {
    ($fmt: literal) => {$crate::log_or_panic!($fmt,)};
    ($fmt: literal, $($arg: tt)*) => {{
        if cfg!(debug_assertions) {
            panic!($fmt, $($arg)*);
        } else {
            log::error!($fmt, $($arg)*);
        }
    }};
}
pub(crate) use log_or_panic;
