use folio_protocol::{Rect, SectionId, SectionSpec};

use super::VisibilityEvent;
use crate::capability::CapabilityError;

pub type VisibilityListener = Box<dyn FnMut(VisibilityEvent)>;

/// Handle returned by [`VisibilitySource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

/// Region-visibility capability.
///
/// Implementations notify the listener once after subscribing and then every
/// time the region crosses its section's threshold in either direction, the way
/// a browser `IntersectionObserver` does.
pub trait VisibilitySource {
    fn subscribe(
        &mut self,
        spec: &SectionSpec,
        listener: VisibilityListener,
    ) -> Result<Subscription, CapabilityError>;

    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Fraction of `region` that lies inside `viewport`.
///
/// Degenerate regions count as invisible.
pub fn visible_fraction(region: &Rect, viewport: &Rect) -> f64 {
    let area = region.area();
    if area <= 0.0 {
        return 0.0;
    }
    region
        .intersect(viewport)
        .map_or(0.0, |overlap| (overlap.area() / area).clamp(0.0, 1.0))
}

struct Observed {
    subscription: Subscription,
    spec: SectionSpec,
    listener: VisibilityListener,
    last_in_view: Option<bool>,
}

/// Visibility source for hosts that lay sections out themselves (egui,
/// terminal). The host calls [`LayoutVisibility::update`] once per frame with
/// the current section rectangles.
#[derive(Default)]
pub struct LayoutVisibility {
    next_id: u64,
    observed: Vec<Observed>,
}

impl LayoutVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Recompute visibility and notify on first sight and on threshold
    /// crossings. Sections `layout` cannot place are skipped this frame.
    pub fn update(&mut self, layout: impl Fn(&SectionId) -> Option<Rect>, viewport: &Rect) {
        for entry in &mut self.observed {
            let Some(region) = layout(&entry.spec.id) else {
                continue;
            };
            let fraction = visible_fraction(&region, viewport);
            let in_view = entry.spec.is_in_view(fraction);
            if entry.last_in_view == Some(in_view) {
                continue;
            }
            entry.last_in_view = Some(in_view);
            (entry.listener)(VisibilityEvent::new(entry.spec.id.clone(), fraction));
        }
    }
}

impl VisibilitySource for LayoutVisibility {
    fn subscribe(
        &mut self,
        spec: &SectionSpec,
        listener: VisibilityListener,
    ) -> Result<Subscription, CapabilityError> {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.observed.push(Observed {
            subscription,
            spec: spec.clone(),
            listener,
            last_in_view: None,
        });
        Ok(subscription)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.observed.retain(|o| o.subscription != subscription);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::sections::ScrollSpy;

    /// Three stacked 1000-unit sections.
    fn layout(id: &SectionId) -> Option<Rect> {
        let top = match id.as_str() {
            "home" => 0.0,
            "story" => 1000.0,
            "journey" => 2000.0,
            _ => return None,
        };
        Some(Rect::new(0.0, top, 800.0, 1000.0))
    }

    fn viewport_at(scroll: f64) -> Rect {
        Rect::new(0.0, scroll, 800.0, 600.0)
    }

    #[test]
    fn fraction_of_partially_visible_region() {
        let region = Rect::new(0.0, 1000.0, 800.0, 1000.0);
        assert_eq!(visible_fraction(&region, &viewport_at(700.0)), 0.3);
        assert_eq!(visible_fraction(&region, &viewport_at(0.0)), 0.0);
        assert_eq!(
            visible_fraction(&Rect::new(0.0, 0.0, 0.0, 0.0), &viewport_at(0.0)),
            0.0
        );
    }

    #[test]
    fn notifies_once_then_only_on_crossings() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut source = LayoutVisibility::new();
        let sink = Rc::clone(&seen);
        source
            .subscribe(
                &SectionSpec::new(SectionId::new("story").unwrap()),
                Box::new(move |e: VisibilityEvent| sink.borrow_mut().push(e.visible_fraction)),
            )
            .unwrap();

        source.update(layout, &viewport_at(0.0));
        source.update(layout, &viewport_at(100.0));
        source.update(layout, &viewport_at(800.0));
        source.update(layout, &viewport_at(900.0));
        source.update(layout, &viewport_at(2400.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], 0.0);
        assert!(seen[1] >= 0.3);
        assert!(seen[2] < 0.3);
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let count = Rc::new(RefCell::new(0));
        let mut source = LayoutVisibility::new();
        let sink = Rc::clone(&count);
        let sub = source
            .subscribe(
                &SectionSpec::new(SectionId::home()),
                Box::new(move |_: VisibilityEvent| *sink.borrow_mut() += 1),
            )
            .unwrap();
        source.unsubscribe(sub);
        source.update(layout, &viewport_at(0.0));
        assert_eq!(*count.borrow(), 0);
        assert!(source.is_empty());
    }

    #[test]
    fn drives_scroll_spy_through_attach() {
        let spy = Rc::new(RefCell::new(ScrollSpy::new()));
        let mut source = LayoutVisibility::new();
        for name in ["home", "story", "journey"] {
            let spec = SectionSpec::new(SectionId::new(name).unwrap());
            assert!(ScrollSpy::attach(&spy, &mut source, spec).is_some());
        }

        source.update(layout, &viewport_at(1100.0));
        assert_eq!(spy.borrow().active(), "story");

        // Gap below the last section: nothing is in view, "journey" sticks.
        source.update(layout, &viewport_at(2200.0));
        assert_eq!(spy.borrow().active(), "journey");
        source.update(layout, &viewport_at(3500.0));
        assert_eq!(spy.borrow().active(), "journey");
    }
}
