//! Property: after any sequence of visibility notifications the active
//! section is the last one that was at or above its threshold.

use folio_core::sections::{ScrollSpy, VisibilityEvent};
use folio_protocol::{HOME_SECTION, SectionId, SectionSpec};
use proptest::prelude::*;

const SECTIONS: [(&str, f64); 4] = [
    ("home", 0.5),
    ("story", 0.3),
    ("journey", 0.3),
    ("skills", 0.3),
];

fn spy() -> ScrollSpy {
    ScrollSpy::with_sections(SECTIONS.iter().map(|(name, threshold)| {
        SectionSpec::with_threshold(SectionId::new(name).expect("valid id"), *threshold)
    }))
}

fn events() -> impl Strategy<Value = Vec<(usize, f64)>> {
    prop::collection::vec((0..SECTIONS.len(), 0.0..=1.0f64), 0..64)
}

proptest! {
    #[test]
    fn last_in_view_report_wins(events in events()) {
        let mut spy = spy();
        let mut expected = HOME_SECTION;
        for (section, fraction) in &events {
            let (name, threshold) = SECTIONS[*section];
            if *fraction >= threshold {
                expected = name;
            }
            let id = SectionId::new(name).expect("valid id");
            spy.notify(&VisibilityEvent::new(id, *fraction));
        }
        prop_assert_eq!(spy.active().as_str(), expected);
    }

    #[test]
    fn repeating_a_report_changes_nothing(section in 0..SECTIONS.len(), fraction in 0.5..=1.0f64) {
        let mut spy = spy();
        let id = SectionId::new(SECTIONS[section].0).expect("valid id");
        spy.notify(&VisibilityEvent::new(id.clone(), fraction));
        let before = spy.active().clone();
        prop_assert!(!spy.notify(&VisibilityEvent::new(id, fraction)));
        prop_assert_eq!(spy.active(), &before);
    }
}
