//! Jumping between sections.
//!
//! Two behaviors coexist on the page. Nav bar clicks go through
//! [`SmoothScrollNavigator`], which leaves room for the fixed nav bar. The
//! hero's "next" affordance uses [`jump_to`], a native jump with no
//! compensation.

use std::time::Duration;

use folio_protocol::{ScrollBehavior, ScrollTarget, SectionId};

/// Height of the fixed navigation bar, in page units.
pub const NAVBAR_OFFSET: f64 = 80.0;

/// Section the hero's scroll cue jumps to.
pub const HERO_NEXT_SECTION: &str = "story";

/// The scroll primitive of a host page.
pub trait ScrollHost {
    /// Top edge of a mounted region relative to the viewport (what a
    /// bounding-rect query returns), or `None` if no region has that id.
    fn region_top(&self, id: &str) -> Option<f64>;

    /// Current vertical scroll offset of the document.
    fn scroll_offset(&self) -> f64;

    /// Scroll the document to `top`. Fire-and-forget.
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Bring a region's top edge to the top of the viewport. Returns `false`
    /// if the region does not exist.
    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothScrollNavigator {
    offset: f64,
}

impl Default for SmoothScrollNavigator {
    fn default() -> Self {
        Self {
            offset: NAVBAR_OFFSET,
        }
    }
}

impl SmoothScrollNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: f64) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Where [`Self::scroll_to`] would go: region top plus current scroll,
    /// minus the nav bar. Not clamped; hosts clamp to their scroll range.
    pub fn target(&self, host: &dyn ScrollHost, id: &SectionId) -> Option<ScrollTarget> {
        let top = host.region_top(id.as_str())?;
        Some(ScrollTarget {
            section: id.clone(),
            top: top + host.scroll_offset() - self.offset,
            behavior: ScrollBehavior::Smooth,
        })
    }

    /// Smooth-scroll to a section. Unknown ids are a silent no-op.
    pub fn scroll_to(&self, host: &mut dyn ScrollHost, id: &SectionId) {
        match self.target(host, id) {
            Some(target) => {
                log::debug!("scrolling to {} at {}", target.section, target.top);
                host.scroll_to(target.top, target.behavior);
            }
            None => log::debug!("no mounted section {id}, not scrolling"),
        }
    }
}

/// Native jump used by the hero. No nav bar compensation.
pub fn jump_to(host: &mut dyn ScrollHost, id: &str) {
    if !host.scroll_into_view(id, ScrollBehavior::Smooth) {
        log::debug!("no mounted section {id}, not jumping");
    }
}

/// Eased scroll for hosts without a native smooth-scroll primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl ScrollAnimation {
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(450);

    pub fn new(from: f64, to: f64) -> Self {
        Self::with_duration(from, to, Self::DEFAULT_DURATION)
    }

    pub fn with_duration(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` and return the offset for this frame.
    pub fn step(&mut self, dt: Duration) -> f64 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        if self.duration.is_zero() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // Ease-out cubic.
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }
}
