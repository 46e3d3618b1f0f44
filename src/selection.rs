use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::DateRange;

/// Which endpoint the next calendar pick will set.
///
/// `None` means the range is closed (both endpoints resolved) until the
/// user re-engages one of the inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveEnd {
    From,
    #[default]
    To,
    None,
}

impl ActiveEnd {
    /// Human-readable label of the endpoint, as reported to the host.
    pub fn label(self) -> &'static str {
        match self {
            Self::From => "Start Date",
            Self::To => "End Date",
            Self::None => "",
        }
    }
}

/// One of the two range endpoints, as an event parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    From,
    To,
}

impl From<RangeEnd> for ActiveEnd {
    fn from(end: RangeEnd) -> Self {
        match end {
            RangeEnd::From => Self::From,
            RangeEnd::To => Self::To,
        }
    }
}

/// Host notification produced by a selection transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    /// `from` or `to` changed.
    RangeChanged {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    /// The active endpoint changed; `label` is [`ActiveEnd::label`].
    FocusChanged { label: &'static str },
}

/// The range-selection state machine.
///
/// Owns the pending `(from, to, active end)` tuple plus the transient
/// hover day, and turns pick/hover/reset/edit events into normalized
/// range updates. Every transition that changes the range or the active
/// endpoint queues a [`SelectionEvent`] for the host; events are only
/// queued once the machine has been seeded, so the initial state never
/// produces a notification.
///
/// The machine starts with the end field nominally active, but a pick on
/// an empty range always starts the range: the first click sets `from`
/// no matter which input the focus flag points at.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RangeSelection {
    range: DateRange,
    active: ActiveEnd,
    /// Whether `active` has been confirmed by an interaction yet. Until
    /// then the nominal `To` default is just a resting state and is not
    /// reported as a focus.
    engaged: bool,
    hover: Option<NaiveDate>,
    initialized: bool,
    #[serde(skip)]
    outbox: Vec<SelectionEvent>,
}

impl RangeSelection {
    /// Install the initial range without queueing notifications.
    pub fn seed(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.range = DateRange::new(from, to);
        self.initialized = true;
    }

    /// Adopt a range the host changed out from under the widget, silently.
    pub fn adopt(&mut self, range: DateRange) {
        self.range = range;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn active_end(&self) -> ActiveEnd {
        self.active
    }

    /// The endpoint currently reported as focused, if any interaction has
    /// engaged one yet.
    pub fn focus(&self) -> Option<ActiveEnd> {
        self.engaged.then_some(self.active)
    }

    pub fn hover(&self) -> Option<NaiveDate> {
        self.hover
    }

    /// Record the day under the pointer, verbatim. Purely a presentation
    /// hint for range preview; never touches the range or the active end.
    pub fn set_hover(&mut self, day: Option<NaiveDate>) {
        self.hover = day;
    }

    /// The user picked a day in the calendar.
    pub fn pick(&mut self, day: NaiveDate) {
        let (old_range, old_focus) = (self.range, self.focus());
        self.engaged = true;

        let starts_range = self.range.from.is_none()
            || self.active == ActiveEnd::From
            || self.range.from.is_some_and(|from| day < from);
        if starts_range {
            self.range.from = Some(day);
            // The old end is no longer consistent with the new start.
            if self.range.to.is_some_and(|to| day > to) {
                self.range.to = None;
            }
            self.active = ActiveEnd::To;
        } else {
            self.range.to = Some(day);
            self.active = ActiveEnd::None;
        }

        self.finish(old_range, old_focus);
    }

    /// The user clicked or focused one of the two inputs.
    ///
    /// Engaging the end input while no start exists is ignored: there is
    /// nothing for an end date to attach to yet.
    pub fn engage(&mut self, end: RangeEnd) {
        if end == RangeEnd::To && self.range.from.is_none() {
            return;
        }
        let (old_range, old_focus) = (self.range, self.focus());
        self.engaged = true;
        self.active = end.into();
        self.finish(old_range, old_focus);
    }

    /// The user typed a date directly into an input. `None` clears the
    /// endpoint.
    pub fn manual_edit(&mut self, end: RangeEnd, value: Option<NaiveDate>) {
        let (old_range, old_focus) = (self.range, self.focus());
        self.engaged = true;
        match end {
            RangeEnd::From => {
                self.range.from = value;
                if let (Some(value), Some(to)) = (value, self.range.to) {
                    if value > to {
                        self.range.to = None;
                    }
                }
                self.active = ActiveEnd::From;
            }
            RangeEnd::To => {
                self.range.to = value;
                self.active = ActiveEnd::To;
            }
        }
        self.finish(old_range, old_focus);
    }

    /// Clear the whole selection and aim the next pick at the start.
    pub fn reset(&mut self) {
        let (old_range, old_focus) = (self.range, self.focus());
        self.engaged = true;
        self.range = DateRange::default();
        self.hover = None;
        self.active = ActiveEnd::From;
        self.finish(old_range, old_focus);
    }

    /// Take the notifications queued by transitions since the last drain.
    pub fn drain_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn finish(&mut self, old_range: DateRange, old_focus: Option<ActiveEnd>) {
        if !self.initialized {
            return;
        }
        if self.range != old_range {
            self.outbox.push(SelectionEvent::RangeChanged {
                from: self.range.from,
                to: self.range.to,
            });
        }
        if self.focus() != old_focus {
            self.outbox.push(SelectionEvent::FocusChanged {
                label: self.active.label(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn seeded() -> RangeSelection {
        let mut selection = RangeSelection::default();
        selection.seed(None, None);
        selection
    }

    #[test]
    fn seeding_queues_nothing() {
        let mut selection = RangeSelection::default();
        selection.seed(Some(day(10)), Some(day(20)));
        assert!(selection.drain_events().is_empty());
        assert_eq!(selection.range().from, Some(day(10)));
        assert_eq!(selection.range().to, Some(day(20)));
    }

    #[test]
    fn transitions_before_seeding_stay_silent() {
        let mut selection = RangeSelection::default();
        selection.pick(day(10));
        assert!(selection.drain_events().is_empty());
        // State still moved; only the notification was suppressed.
        assert_eq!(selection.range().from, Some(day(10)));
    }

    #[test]
    fn first_pick_starts_the_range() {
        let mut selection = seeded();
        selection.pick(day(10));
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), None));
        assert_eq!(selection.active_end(), ActiveEnd::To);
        assert_eq!(
            selection.drain_events(),
            vec![
                SelectionEvent::RangeChanged {
                    from: Some(day(10)),
                    to: None,
                },
                SelectionEvent::FocusChanged { label: "End Date" },
            ]
        );
    }

    #[test]
    fn ordered_picks_close_the_range() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), Some(day(20))));
        assert_eq!(selection.active_end(), ActiveEnd::None);
        assert_eq!(
            selection.drain_events().last(),
            Some(&SelectionEvent::FocusChanged { label: "" })
        );
    }

    #[test]
    fn pick_before_the_start_becomes_the_new_start() {
        let mut selection = seeded();
        selection.pick(day(20));
        selection.pick(day(5));
        // The second pick precedes the first, so it replaces the start;
        // nothing has been picked for the end yet.
        assert_eq!(selection.range(), DateRange::new(Some(day(5)), None));
        assert_eq!(selection.active_end(), ActiveEnd::To);
    }

    #[test]
    fn earlier_start_keeps_a_consistent_end() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.pick(day(5));
        // New start precedes the old end, which therefore survives.
        assert_eq!(selection.range(), DateRange::new(Some(day(5)), Some(day(20))));
        assert_eq!(selection.active_end(), ActiveEnd::To);
    }

    #[test]
    fn start_past_the_end_clears_the_end() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.engage(RangeEnd::From);
        selection.drain_events();
        selection.pick(day(25));
        assert_eq!(selection.range(), DateRange::new(Some(day(25)), None));
        assert_eq!(selection.active_end(), ActiveEnd::To);
        assert_eq!(
            selection.drain_events(),
            vec![
                SelectionEvent::RangeChanged {
                    from: Some(day(25)),
                    to: None,
                },
                SelectionEvent::FocusChanged { label: "End Date" },
            ]
        );
    }

    #[test]
    fn single_day_range() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(10));
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), Some(day(10))));
        assert_eq!(selection.active_end(), ActiveEnd::None);
    }

    #[test]
    fn hover_never_mutates_the_selection() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.drain_events();

        selection.set_hover(Some(day(15)));
        assert_eq!(selection.hover(), Some(day(15)));
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), None));
        assert_eq!(selection.active_end(), ActiveEnd::To);
        assert!(selection.drain_events().is_empty());

        selection.set_hover(None);
        assert_eq!(selection.hover(), None);
        assert!(selection.drain_events().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.set_hover(Some(day(15)));
        selection.drain_events();

        selection.reset();
        assert_eq!(selection.range(), DateRange::default());
        assert_eq!(selection.hover(), None);
        assert_eq!(selection.active_end(), ActiveEnd::From);
        assert_eq!(
            selection.drain_events(),
            vec![
                SelectionEvent::RangeChanged {
                    from: None,
                    to: None,
                },
                SelectionEvent::FocusChanged {
                    label: "Start Date",
                },
            ]
        );
    }

    #[test]
    fn engaging_the_end_requires_a_start() {
        let mut selection = seeded();
        selection.engage(RangeEnd::To);
        assert_eq!(selection.focus(), None);
        assert!(selection.drain_events().is_empty());

        selection.pick(day(10));
        selection.drain_events();
        selection.engage(RangeEnd::To);
        // Already aimed at the end; no duplicate notification.
        assert!(selection.drain_events().is_empty());
    }

    #[test]
    fn engaging_the_start_reports_focus() {
        let mut selection = seeded();
        selection.engage(RangeEnd::From);
        assert_eq!(selection.active_end(), ActiveEnd::From);
        assert_eq!(
            selection.drain_events(),
            vec![SelectionEvent::FocusChanged {
                label: "Start Date",
            }]
        );
    }

    #[test]
    fn pick_with_the_start_engaged_replaces_the_start() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.engage(RangeEnd::From);
        selection.drain_events();
        selection.pick(day(12));
        assert_eq!(selection.range(), DateRange::new(Some(day(12)), None));
        assert_eq!(selection.active_end(), ActiveEnd::To);
    }

    #[test]
    fn manual_start_edit_clears_a_passed_end() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.drain_events();

        selection.manual_edit(RangeEnd::From, Some(day(25)));
        assert_eq!(selection.range(), DateRange::new(Some(day(25)), None));
        assert_eq!(selection.active_end(), ActiveEnd::From);

        let events = selection.drain_events();
        assert_eq!(
            events,
            vec![
                SelectionEvent::RangeChanged {
                    from: Some(day(25)),
                    to: None,
                },
                SelectionEvent::FocusChanged {
                    label: "Start Date",
                },
            ]
        );
    }

    #[test]
    fn manual_start_edit_keeps_a_later_end() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.manual_edit(RangeEnd::From, Some(day(15)));
        assert_eq!(selection.range(), DateRange::new(Some(day(15)), Some(day(20))));
    }

    #[test]
    fn manual_end_edit_sets_the_end() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.drain_events();
        selection.manual_edit(RangeEnd::To, Some(day(20)));
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), Some(day(20))));
        assert_eq!(selection.active_end(), ActiveEnd::To);
    }

    #[test]
    fn manual_edit_can_clear_an_endpoint() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.pick(day(20));
        selection.manual_edit(RangeEnd::To, None);
        assert_eq!(selection.range(), DateRange::new(Some(day(10)), None));
    }

    #[test]
    fn adopting_an_external_range_is_silent() {
        let mut selection = seeded();
        selection.pick(day(10));
        selection.drain_events();
        selection.adopt(DateRange::new(Some(day(1)), Some(day(2))));
        assert_eq!(selection.range(), DateRange::new(Some(day(1)), Some(day(2))));
        assert!(selection.drain_events().is_empty());
    }
}
