use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use egui::accesskit::Role;
use egui_daterange::{DateRange, DateRangePicker};
use egui_kittest::kittest::{by, Queryable as _};
use egui_kittest::Harness;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn picking_two_days_commits_the_range() {
    // Seed the start so the dialog opens on March 2024 no matter when
    // the test runs.
    let range = Rc::new(RefCell::new(DateRange::new(Some(day(1)), None)));
    let changes: Rc<RefCell<Vec<(Option<NaiveDate>, Option<NaiveDate>)>>> =
        Rc::new(RefCell::new(Vec::new()));
    let focuses: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

    let mut harness = Harness::new_ui({
        let range = Rc::clone(&range);
        let changes = Rc::clone(&changes);
        let focuses = Rc::clone(&focuses);
        move |ui| {
            let mut selection = *range.borrow();
            ui.add(
                DateRangePicker::new(&mut selection)
                    .id_salt("picker")
                    .months_shown(1)
                    .on_change(|from, to| changes.borrow_mut().push((from, to)))
                    .on_focus(|label| focuses.borrow_mut().push(label.to_owned())),
            );
            *range.borrow_mut() = selection;
        }
    });

    // Engaging the start input opens the calendar dialog.
    harness
        .get_all(by().predicate(|node| node.role() == Role::TextInput))
        .next()
        .unwrap()
        .simulate_click();
    harness.run();

    harness.get_by_label("10").click();
    harness.run();
    harness.get_by_label("20").click();
    harness.run();

    assert_eq!(*range.borrow(), DateRange::new(Some(day(10)), Some(day(20))));
    assert_eq!(
        *changes.borrow(),
        vec![(Some(day(10)), None), (Some(day(10)), Some(day(20)))]
    );
    assert_eq!(*focuses.borrow(), vec!["Start Date", "End Date", ""]);
}

#[test]
fn reset_clears_the_committed_range() {
    let range = Rc::new(RefCell::new(DateRange::new(Some(day(10)), Some(day(20)))));

    let mut harness = Harness::new_ui({
        let range = Rc::clone(&range);
        move |ui| {
            let mut selection = *range.borrow();
            ui.add(
                DateRangePicker::new(&mut selection)
                    .id_salt("picker")
                    .months_shown(1),
            );
            *range.borrow_mut() = selection;
        }
    });

    harness
        .get_all(by().predicate(|node| node.role() == Role::TextInput))
        .next()
        .unwrap()
        .simulate_click();
    harness.run();

    harness.get_by_label("Reset").click();
    harness.run();

    assert_eq!(*range.borrow(), DateRange::default());
}

#[test]
fn disabled_picker_ignores_interaction() {
    let range = Rc::new(RefCell::new(DateRange::default()));

    let mut harness = Harness::new_ui({
        let range = Rc::clone(&range);
        move |ui| {
            let mut selection = *range.borrow();
            ui.add(
                DateRangePicker::new(&mut selection)
                    .id_salt("picker")
                    .disabled(true),
            );
            *range.borrow_mut() = selection;
        }
    });

    if let Some(input) = harness
        .query_all(by().predicate(|node| node.role() == Role::TextInput))
        .next()
    {
        input.click();
    }
    harness.run();

    // The dialog never opened and the range is untouched.
    assert!(harness.query_by_label("Reset").is_none());
    assert_eq!(*range.borrow(), DateRange::default());
}
