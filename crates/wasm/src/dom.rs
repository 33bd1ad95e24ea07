//! Browser implementations of the core capability traits.

use std::rc::Rc;

use folio_core::CapabilityError;
use folio_core::ScrollHost;
use folio_core::sections::{Subscription, VisibilityEvent, VisibilityListener, VisibilitySource};
use folio_core::theme::ColorSchemeSource;
use folio_protocol::{ScrollBehavior, SectionSpec};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryList, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

pub const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn window() -> Result<Window, CapabilityError> {
    web_sys::window().ok_or(CapabilityError::Unavailable("window"))
}

fn document() -> Result<Document, CapabilityError> {
    window()?
        .document()
        .ok_or(CapabilityError::Unavailable("document"))
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn behavior(behavior: ScrollBehavior) -> web_sys::ScrollBehavior {
    match behavior {
        ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
    }
}

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

struct Observed {
    subscription: Subscription,
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

/// One `IntersectionObserver` per section, with the section's threshold.
/// `after_batch` runs once per observer callback, after every entry has
/// been delivered.
pub struct DomVisibility {
    observed: Vec<Observed>,
    next_id: u64,
    after_batch: Rc<dyn Fn()>,
}

impl DomVisibility {
    pub fn new(after_batch: Rc<dyn Fn()>) -> Self {
        Self {
            observed: Vec::new(),
            next_id: 0,
            after_batch,
        }
    }

    pub fn disconnect_all(&mut self) {
        for observed in self.observed.drain(..) {
            observed.observer.disconnect();
        }
    }
}

impl VisibilitySource for DomVisibility {
    fn subscribe(
        &mut self,
        spec: &SectionSpec,
        mut listener: VisibilityListener,
    ) -> Result<Subscription, CapabilityError> {
        let element = document()?
            .get_element_by_id(spec.id.as_str())
            .ok_or_else(|| {
                CapabilityError::failed("section lookup", format!("no element #{}", spec.id))
            })?;

        let id = spec.id.clone();
        let after_batch = Rc::clone(&self.after_batch);
        let callback: ObserverCallback = Closure::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    listener(VisibilityEvent::new(id.clone(), entry.intersection_ratio()));
                }
                after_batch();
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(spec.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| CapabilityError::failed("IntersectionObserver", js_reason(&e)))?;
        observer.observe(&element);

        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.observed.push(Observed {
            subscription,
            observer,
            _callback: callback,
        });
        Ok(subscription)
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.observed.retain(|observed| {
            if observed.subscription == subscription {
                observed.observer.disconnect();
                false
            } else {
                true
            }
        });
    }
}

impl Drop for DomVisibility {
    fn drop(&mut self) {
        self.disconnect_all();
    }
}

/// The document scroll: bounding rects, `window.scrollTo`, `scrollIntoView`.
pub struct WindowScroll {
    window: Window,
    document: Document,
}

impl WindowScroll {
    pub fn new() -> Result<Self, CapabilityError> {
        let window = window()?;
        let document = window
            .document()
            .ok_or(CapabilityError::Unavailable("document"))?;
        Ok(Self { window, document })
    }
}

impl ScrollHost for WindowScroll {
    fn region_top(&self, id: &str) -> Option<f64> {
        self.document
            .get_element_by_id(id)
            .map(|element| element.get_bounding_client_rect().top())
    }

    fn scroll_offset(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, scroll: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(behavior(scroll));
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_into_view(&mut self, id: &str, scroll: ScrollBehavior) -> bool {
        let Some(element) = self.document.get_element_by_id(id) else {
            return false;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(behavior(scroll));
        options.set_block(ScrollLogicalPosition::Start);
        element.scroll_into_view_with_scroll_into_view_options(&options);
        true
    }
}

/// `matchMedia("(prefers-color-scheme: dark)")`.
pub struct MediaScheme;

impl MediaScheme {
    pub fn query() -> Result<MediaQueryList, CapabilityError> {
        window()?
            .match_media(DARK_QUERY)
            .map_err(|e| CapabilityError::failed("matchMedia", js_reason(&e)))?
            .ok_or(CapabilityError::Unavailable("matchMedia"))
    }
}

impl ColorSchemeSource for MediaScheme {
    fn prefers_dark(&self) -> Result<bool, CapabilityError> {
        Ok(Self::query()?.matches())
    }
}

/// Reflect the mode on `<html data-theme="...">` for the stylesheet.
pub fn apply_theme_attribute(mode: &str) {
    let root = document().ok().and_then(|d| d.document_element());
    match root {
        Some(root) => {
            if let Err(e) = root.set_attribute("data-theme", mode) {
                log::warn!("could not set data-theme: {}", js_reason(&e));
            }
        }
        None => log::warn!("no document element to theme"),
    }
}

/// `setTimeout` for a one-shot callback. The closure frees itself after
/// running.
pub fn set_timeout(millis: i32, f: Box<dyn FnOnce()>) -> Result<(), CapabilityError> {
    let window = window()?;
    let callback = Closure::once_into_js(move || f());
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        .map(|_handle| ())
        .map_err(|e| CapabilityError::failed("setTimeout", js_reason(&e)))
}
