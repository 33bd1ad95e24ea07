//! Active-section tracking.
//!
//! Each mounted section owns a [`SectionTracker`] that turns visibility
//! notifications into reports. Reports land in the page's single
//! [`ActiveSection`], last write wins. Nothing ever reports "left view": when
//! the user scrolls into a gap the previous id sticks.

mod visibility;

use std::cell::RefCell;
use std::rc::Rc;

use folio_protocol::{HERO_THRESHOLD, HOME_SECTION, SectionId, SectionSpec};
use thiserror::Error;

use crate::config::SiteConfig;

pub use visibility::{
    LayoutVisibility, Subscription, VisibilityListener, VisibilitySource, visible_fraction,
};

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("section {0:?} is already mounted")]
    AlreadyMounted(SectionId),
}

/// One notification from the region-visibility collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub section: SectionId,
    /// Fraction of the section's area currently on screen, in `[0, 1]`.
    pub visible_fraction: f64,
}

impl VisibilityEvent {
    pub fn new(section: SectionId, visible_fraction: f64) -> Self {
        Self {
            section,
            visible_fraction,
        }
    }
}

/// The id of the section the navigation bar highlights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActiveSection {
    current: SectionId,
}

impl ActiveSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &SectionId {
        &self.current
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.current == id
    }

    /// Record a report. Returns whether the active id changed; repeating the
    /// current id is a no-op.
    pub fn report(&mut self, id: &SectionId) -> bool {
        if self.current == *id {
            return false;
        }
        log::debug!("active section: {} -> {}", self.current, id);
        self.current = id.clone();
        true
    }
}

/// Per-section reduction of visibility notifications to reports.
#[derive(Debug, Clone)]
pub struct SectionTracker {
    spec: SectionSpec,
    in_view: bool,
}

impl SectionTracker {
    pub fn new(spec: SectionSpec) -> Self {
        Self {
            spec,
            in_view: false,
        }
    }

    pub fn spec(&self) -> &SectionSpec {
        &self.spec
    }

    pub fn id(&self) -> &SectionId {
        &self.spec.id
    }

    pub fn is_in_view(&self) -> bool {
        self.in_view
    }

    /// Feed one notification. `report` runs iff the region is at or above
    /// its threshold right now. Returns the new in-view state.
    pub fn observe(&mut self, visible_fraction: f64, report: impl FnOnce(&SectionId)) -> bool {
        self.in_view = self.spec.is_in_view(visible_fraction);
        if self.in_view {
            report(&self.spec.id);
        }
        self.in_view
    }
}

/// Owns the active-section state and the trackers of every mounted section.
#[derive(Debug, Default)]
pub struct ScrollSpy {
    active: ActiveSection,
    trackers: Vec<SectionTracker>,
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// A spy with one tracker per section in `specs`. Duplicates are skipped.
    pub fn with_sections(specs: impl IntoIterator<Item = SectionSpec>) -> Self {
        let mut spy = Self::new();
        for spec in specs {
            if let Err(e) = spy.mount(spec) {
                log::warn!("{e}");
            }
        }
        spy
    }

    pub fn active(&self) -> &SectionId {
        self.active.current()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.is_active(id)
    }

    pub fn mount(&mut self, spec: SectionSpec) -> Result<(), SectionError> {
        if self.is_mounted(spec.id.as_str()) {
            return Err(SectionError::AlreadyMounted(spec.id));
        }
        log::debug!("mounted section {} (threshold {})", spec.id, spec.threshold);
        self.trackers.push(SectionTracker::new(spec));
        Ok(())
    }

    /// Drop a section's tracker. The active id is left alone even if it
    /// names the unmounted section.
    pub fn unmount(&mut self, id: &str) -> bool {
        let before = self.trackers.len();
        self.trackers.retain(|t| t.id() != id);
        before != self.trackers.len()
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.trackers.iter().any(|t| t.id() == id)
    }

    pub fn sections(&self) -> impl Iterator<Item = &SectionSpec> {
        self.trackers.iter().map(SectionTracker::spec)
    }

    /// Apply one notification. Returns whether the active id changed.
    pub fn notify(&mut self, event: &VisibilityEvent) -> bool {
        let Some(tracker) = self
            .trackers
            .iter_mut()
            .find(|t| *t.id() == event.section)
        else {
            log::debug!("visibility for unmounted section {}", event.section);
            return false;
        };
        let active = &mut self.active;
        let mut changed = false;
        tracker.observe(event.visible_fraction, |id| changed = active.report(id));
        changed
    }

    /// Apply notifications in arrival order.
    pub fn notify_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a VisibilityEvent>,
    ) -> bool {
        events
            .into_iter()
            .fold(false, |changed, event| self.notify(event) || changed)
    }

    /// Mount `spec` and subscribe it to `source`, routing notifications back
    /// into `spy`.
    ///
    /// If the source cannot observe, the section stays mounted but never
    /// reports, so the page keeps its initial active id.
    pub fn attach(
        spy: &Rc<RefCell<ScrollSpy>>,
        source: &mut dyn VisibilitySource,
        spec: SectionSpec,
    ) -> Option<Subscription> {
        if let Err(e) = spy.borrow_mut().mount(spec.clone()) {
            log::warn!("{e}");
            return None;
        }
        let target = Rc::clone(spy);
        let listener: VisibilityListener =
            Box::new(move |event: VisibilityEvent| match target.try_borrow_mut() {
                Ok(mut spy) => {
                    spy.notify(&event);
                }
                Err(_) => log::warn!("dropped re-entrant visibility report for {}", event.section),
            });
        match source.subscribe(&spec, listener) {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                log::warn!("section {} will not be tracked: {e}", spec.id);
                None
            }
        }
    }

    /// Undo [`ScrollSpy::attach`].
    pub fn detach(
        spy: &Rc<RefCell<ScrollSpy>>,
        source: &mut dyn VisibilitySource,
        subscription: Subscription,
        id: &str,
    ) {
        source.unsubscribe(subscription);
        spy.borrow_mut().unmount(id);
    }
}

/// The tracked sections of a page, in page order.
///
/// Every nav item is tracked. The hero asks for a larger share of itself to
/// be visible because it is a full-screen region.
pub fn page_sections(config: &SiteConfig) -> Vec<SectionSpec> {
    config
        .nav_items
        .iter()
        .map(|item| {
            if item.id == HOME_SECTION {
                SectionSpec::with_threshold(item.id.clone(), HERO_THRESHOLD)
            } else {
                SectionSpec::new(item.id.clone())
            }
        })
        .collect()
}
