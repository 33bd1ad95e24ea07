use std::time::Duration;

use folio_core::scroll::{ScrollAnimation, ScrollHost};
use folio_protocol::{Rect, ScrollBehavior, SectionId};

/// Scroll state of the page's single `ScrollArea`, in content coordinates.
///
/// Section rectangles are re-recorded every frame while the sections are
/// laid out; scroll requests are applied on the next frame.
#[derive(Debug, Default)]
pub struct PageScroll {
    offset: f64,
    viewport: Rect,
    content_height: f64,
    regions: Vec<(SectionId, Rect)>,
    animation: Option<ScrollAnimation>,
    jump: Option<f64>,
}

impl PageScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset to force onto the scroll area this frame, if a scroll is in
    /// progress.
    pub fn begin_frame(&mut self, dt: Duration) -> Option<f64> {
        if let Some(top) = self.jump.take() {
            self.animation = None;
            self.offset = top;
            return Some(top);
        }
        let animation = self.animation.as_mut()?;
        self.offset = animation.step(dt);
        if animation.is_finished() {
            self.animation = None;
        }
        Some(self.offset)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.jump.is_some()
    }

    pub fn clear_regions(&mut self) {
        self.regions.clear();
    }

    pub fn record_region(&mut self, id: SectionId, rect: Rect) {
        self.regions.push((id, rect));
    }

    /// Sync with what the scroll area actually showed.
    pub fn end_frame(
        &mut self,
        offset: f64,
        viewport_width: f64,
        viewport_height: f64,
        content_height: f64,
    ) {
        if !self.is_animating() {
            self.offset = offset;
        }
        self.content_height = content_height;
        self.viewport = Rect::new(0.0, self.offset, viewport_width, viewport_height);
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, rect)| *rect)
    }

    fn max_offset(&self) -> f64 {
        (self.content_height - self.viewport.h).max(0.0)
    }
}

impl ScrollHost for PageScroll {
    fn region_top(&self, id: &str) -> Option<f64> {
        self.rect(id).map(|rect| rect.top() - self.offset)
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.clamp(0.0, self.max_offset());
        match behavior {
            ScrollBehavior::Smooth => {
                self.jump = None;
                self.animation = Some(ScrollAnimation::new(self.offset, top));
            }
            ScrollBehavior::Instant => self.jump = Some(top),
        }
    }

    fn scroll_into_view(&mut self, id: &str, behavior: ScrollBehavior) -> bool {
        let Some(rect) = self.rect(id) else {
            return false;
        };
        self.scroll_to(rect.top(), behavior);
        true
    }
}
