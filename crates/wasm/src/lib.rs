mod dom;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_core::CapabilityError;
use folio_core::contact::{
    ContactForm, ContactMessage, ContactSubmitter, Field, NOTICE_AUTO_HIDE, SIMULATED_LATENCY,
    SimulatedSubmitter, SubmitOutcome, SubmitStep,
};
use folio_core::nav::NavBar;
use folio_core::scroll::{HERO_NEXT_SECTION, jump_to};
use folio_core::sections::{ScrollSpy, Subscription, page_sections};
use folio_core::theme::LocalStorage;
use folio_core::{SiteConfig, SmoothScrollNavigator, ThemeController, timeline};
use folio_protocol::{SectionId, Severity};
use serde_json::json;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MediaQueryList, MediaQueryListEvent};

use crate::dom::{DomVisibility, MediaScheme, WindowScroll};

type Callback = Rc<RefCell<Option<js_sys::Function>>>;
type SharedTheme = Rc<RefCell<ThemeController<LocalStorage>>>;
type MediaListener = Closure<dyn FnMut(MediaQueryListEvent)>;

fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn emit(callback: &Callback, value: &str) {
    if let Some(f) = callback.borrow().as_ref() {
        if let Err(e) = f.call1(&JsValue::NULL, &JsValue::from_str(value)) {
            log::error!("page callback threw: {e:?}");
        }
    }
}

fn install_logging() {
    console_error_panic_hook::set_once();
    // A second page in the same module finds the logger already set.
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

fn parse_field(name: &str) -> Result<Field, JsError> {
    match name {
        "name" => Ok(Field::Name),
        "email" => Ok(Field::Email),
        "message" => Ok(Field::Message),
        _ => Err(JsError::new(&format!("unknown contact field: {name}"))),
    }
}

fn field_key(field: Field) -> &'static str {
    match field {
        Field::Name => "name",
        Field::Email => "email",
        Field::Message => "message",
    }
}

/// One page's worth of state, bound to the current document.
///
/// The page markup renders every section with its id; this handle decides
/// which nav item is highlighted, which theme is active and where clicks
/// scroll to. Dropping it (`free()` from JS) disconnects every observer and
/// listener.
#[wasm_bindgen]
pub struct FolioPage {
    config: SiteConfig,
    nav: NavBar,
    navigator: SmoothScrollNavigator,
    spy: Rc<RefCell<ScrollSpy>>,
    visibility: DomVisibility,
    subscriptions: Vec<(Subscription, SectionId)>,
    theme: SharedTheme,
    media: Option<(MediaQueryList, MediaListener)>,
    contact: Rc<RefCell<ContactForm>>,
    submitter: Rc<RefCell<SimulatedSubmitter>>,
    /// Bumped on every new notice so a stale auto-hide timer does nothing.
    notice_generation: Rc<Cell<u64>>,
    on_active: Callback,
    on_theme: Callback,
    on_contact: Callback,
}

#[wasm_bindgen]
impl FolioPage {
    /// Build a page from the bundled content, or from `site_json` when given.
    #[wasm_bindgen(constructor)]
    pub fn new(site_json: Option<String>) -> Result<FolioPage, JsError> {
        install_logging();

        let config = match site_json {
            Some(json) => SiteConfig::from_json(&json),
            None => SiteConfig::builtin(),
        }
        .map_err(to_js_error)?;

        let theme = ThemeController::resolve(LocalStorage, &MediaScheme);
        dom::apply_theme_attribute(theme.mode().as_str());
        let theme = Rc::new(RefCell::new(theme));

        let spy = Rc::new(RefCell::new(ScrollSpy::new()));
        let on_active: Callback = Rc::new(RefCell::new(None));
        let last_active = RefCell::new(spy.borrow().active().clone());
        let after_batch = {
            let spy = Rc::clone(&spy);
            let on_active = Rc::clone(&on_active);
            Rc::new(move || {
                let Ok(spy) = spy.try_borrow() else {
                    return;
                };
                let active = spy.active();
                if *last_active.borrow() != *active {
                    *last_active.borrow_mut() = active.clone();
                    emit(&on_active, active.as_str());
                }
            })
        };

        let mut page = FolioPage {
            nav: NavBar::from_config(&config),
            config,
            navigator: SmoothScrollNavigator::new(),
            spy,
            visibility: DomVisibility::new(after_batch),
            subscriptions: Vec::new(),
            theme,
            media: None,
            contact: Rc::new(RefCell::new(ContactForm::new())),
            submitter: Rc::new(RefCell::new(SimulatedSubmitter::new())),
            notice_generation: Rc::new(Cell::new(0)),
            on_active,
            on_theme: Rc::new(RefCell::new(None)),
            on_contact: Rc::new(RefCell::new(None)),
        };
        page.listen_for_scheme_changes();
        Ok(page)
    }

    /// Start observing every tracked section present in the document.
    /// Returns how many are observed. Safe to call again after the markup
    /// changes.
    pub fn observe_sections(&mut self) -> usize {
        self.disconnect_sections();
        for spec in page_sections(&self.config) {
            let id = spec.id.clone();
            if let Some(subscription) = ScrollSpy::attach(&self.spy, &mut self.visibility, spec) {
                self.subscriptions.push((subscription, id));
            }
        }
        log::info!("observing {} sections", self.subscriptions.len());
        self.subscriptions.len()
    }

    pub fn active_section(&self) -> String {
        self.spy.borrow().active().to_string()
    }

    /// `callback(id)` whenever the highlighted section changes.
    pub fn on_active_change(&self, callback: Option<js_sys::Function>) {
        *self.on_active.borrow_mut() = callback;
    }

    /// Nav items with their highlight state, as JSON
    /// `[{ "id", "label", "highlighted" }]`.
    pub fn nav_items(&self) -> Result<String, JsError> {
        let spy = self.spy.borrow();
        let entries: Vec<_> = self.nav.entries(spy.active()).collect();
        serde_json::to_string(&entries).map_err(to_js_error)
    }

    pub fn is_drawer_open(&self) -> bool {
        self.nav.is_drawer_open()
    }

    pub fn set_drawer_open(&mut self, open: bool) {
        if open {
            self.nav.open_drawer();
        } else {
            self.nav.close_drawer();
        }
    }

    /// Nav item click: smooth-scroll so the section clears the fixed nav
    /// bar. Unknown ids do not scroll. The drawer closes either way.
    pub fn scroll_to_section(&mut self, id: &str) {
        match WindowScroll::new() {
            Ok(mut host) => self.nav.select_raw(id, &mut host, &self.navigator),
            Err(e) => {
                self.nav.close_drawer();
                log::warn!("cannot scroll: {e}");
            }
        }
    }

    /// The hero's scroll-down affordance: a native jump to the story.
    pub fn scroll_to_next(&self) {
        match WindowScroll::new() {
            Ok(mut host) => jump_to(&mut host, HERO_NEXT_SECTION),
            Err(e) => log::warn!("cannot scroll: {e}"),
        }
    }

    pub fn theme(&self) -> String {
        self.theme.borrow().mode().as_str().to_string()
    }

    pub fn is_dark(&self) -> bool {
        self.theme.borrow().is_dark()
    }

    /// Tooltip for the theme toggle.
    pub fn theme_toggle_label(&self) -> String {
        self.theme.borrow().mode().toggle_label().to_string()
    }

    /// Flip the theme and remember the choice. Returns the new mode.
    pub fn toggle_theme(&self) -> String {
        let mode = self.theme.borrow_mut().toggle();
        dom::apply_theme_attribute(mode.as_str());
        emit(&self.on_theme, mode.as_str());
        mode.as_str().to_string()
    }

    /// Forget the stored choice and follow the OS again.
    pub fn follow_system_theme(&self) -> String {
        let mode = self.theme.borrow_mut().follow_system(&MediaScheme);
        dom::apply_theme_attribute(mode.as_str());
        emit(&self.on_theme, mode.as_str());
        mode.as_str().to_string()
    }

    /// `callback(mode)` whenever the theme changes, by toggle or OS.
    pub fn on_theme_change(&self, callback: Option<js_sys::Function>) {
        *self.on_theme.borrow_mut() = callback;
    }

    /// The site content as JSON.
    pub fn site(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.config).map_err(to_js_error)
    }

    /// Journey rows with their tone, as JSON.
    pub fn journey(&self) -> Result<String, JsError> {
        serde_json::to_string(&timeline::journey(&self.config)).map_err(to_js_error)
    }

    /// Hero call-to-action links resolved against the contact details.
    pub fn hero_links(&self) -> Result<String, JsError> {
        let hero = &self.config.hero;
        let links: Vec<_> = [&hero.cta.primary, &hero.cta.secondary]
            .into_iter()
            .map(|cta| json!({ "text": cta.text, "href": cta.href(&self.config.contact) }))
            .collect();
        serde_json::to_string(&links).map_err(to_js_error)
    }

    pub fn set_contact_field(&self, field: &str, value: &str) -> Result<(), JsError> {
        let field = parse_field(field)?;
        self.contact.borrow_mut().set(field, value);
        emit(&self.on_contact, "edit");
        Ok(())
    }

    /// The hidden anti-bot field. Humans never see it.
    pub fn set_honeypot(&self, value: &str) {
        self.contact.borrow_mut().set_honeypot(value);
    }

    /// Form state as JSON: field values, inline errors, the sending flag and
    /// the current notice.
    pub fn contact_state(&self) -> Result<String, JsError> {
        let form = self.contact.borrow();
        let data = form.data();
        let errors: serde_json::Map<_, _> = form
            .errors()
            .iter()
            .map(|(field, message)| (field_key(field).to_string(), json!(message)))
            .collect();
        let notice = form.notice().map(|notice| {
            json!({
                "message": notice.message,
                "severity": match notice.severity {
                    Severity::Success => "success",
                    Severity::Error => "error",
                },
            })
        });
        let state = json!({
            "name": data.name,
            "email": data.email,
            "message": data.message,
            "errors": errors,
            "submitting": form.is_submitting(),
            "notice": notice,
        });
        serde_json::to_string(&state).map_err(to_js_error)
    }

    /// `callback(reason)` whenever the form state changes.
    pub fn on_contact_change(&self, callback: Option<js_sys::Function>) {
        *self.on_contact.borrow_mut() = callback;
    }

    /// Submit the form. Returns `"sending"`, `"invalid"`, `"busy"` or
    /// `"ignored"`; a sending form completes after the simulated latency.
    pub fn submit_contact(&self) -> String {
        let step = self.contact.borrow_mut().begin_submit();
        let message = match step {
            SubmitStep::Send(message) => message,
            SubmitStep::Stopped(outcome) => {
                emit(&self.on_contact, "submit");
                return match outcome {
                    SubmitOutcome::Invalid => "invalid",
                    SubmitOutcome::Busy => "busy",
                    _ => "ignored",
                }
                .to_string();
            }
        };
        emit(&self.on_contact, "sending");
        self.outbox().send_later(message);
        "sending".to_string()
    }

    pub fn dismiss_notice(&self) {
        self.contact.borrow_mut().dismiss_notice();
        self.notice_generation.set(self.notice_generation.get() + 1);
        emit(&self.on_contact, "notice-hidden");
    }
}

impl FolioPage {
    fn outbox(&self) -> Outbox {
        Outbox {
            contact: Rc::clone(&self.contact),
            submitter: Rc::clone(&self.submitter),
            generation: Rc::clone(&self.notice_generation),
            on_contact: Rc::clone(&self.on_contact),
            timer: dom::set_timeout,
        }
    }

    fn listen_for_scheme_changes(&mut self) {
        let query = match MediaScheme::query() {
            Ok(query) => query,
            Err(e) => {
                log::warn!("not following OS theme changes: {e}");
                return;
            }
        };
        let theme = Rc::clone(&self.theme);
        let on_theme = Rc::clone(&self.on_theme);
        let listener: MediaListener = Closure::new(move |event: MediaQueryListEvent| {
            let Ok(mut theme) = theme.try_borrow_mut() else {
                return;
            };
            if theme.on_system_change(event.matches()) {
                let mode = theme.mode();
                drop(theme);
                dom::apply_theme_attribute(mode.as_str());
                emit(&on_theme, mode.as_str());
            }
        });
        match query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref()) {
            Ok(()) => self.media = Some((query, listener)),
            Err(e) => log::warn!("matchMedia change listener rejected: {e:?}"),
        }
    }

    fn disconnect_sections(&mut self) {
        for (subscription, id) in self.subscriptions.drain(..) {
            ScrollSpy::detach(&self.spy, &mut self.visibility, subscription, id.as_str());
        }
        let mut spy = self.spy.borrow_mut();
        let stale: Vec<SectionId> = spy.sections().map(|spec| spec.id.clone()).collect();
        for id in stale {
            spy.unmount(id.as_str());
        }
    }
}

type Timer = fn(i32, Box<dyn FnOnce()>) -> Result<(), CapabilityError>;

/// The form state a pending send completes into.
#[derive(Clone)]
struct Outbox {
    contact: Rc<RefCell<ContactForm>>,
    submitter: Rc<RefCell<SimulatedSubmitter>>,
    generation: Rc<Cell<u64>>,
    on_contact: Callback,
    timer: Timer,
}

impl Outbox {
    /// Deliver `message` after the simulated latency. Without a timer the
    /// send completes at once so the form never stays locked.
    fn send_later(&self, message: ContactMessage) {
        let outbox = self.clone();
        let pending = message.clone();
        let scheduled = (self.timer)(
            millis(SIMULATED_LATENCY),
            Box::new(move || outbox.deliver(&pending)),
        );
        if let Err(e) = scheduled {
            log::warn!("no timer for the send delay, completing now: {e}");
            self.deliver(&message);
        }
    }

    fn deliver(&self, message: &ContactMessage) {
        let result = self.submitter.borrow_mut().submit(message);
        self.contact.borrow_mut().finish_submit(result);
        let current = self.generation.get() + 1;
        self.generation.set(current);
        emit(&self.on_contact, "result");

        let outbox = self.clone();
        let hide = Box::new(move || {
            if outbox.generation.get() == current {
                outbox.contact.borrow_mut().dismiss_notice();
                emit(&outbox.on_contact, "notice-hidden");
            }
        });
        if let Err(e) = (self.timer)(millis(NOTICE_AUTO_HIDE), hide) {
            log::warn!("notice stays until dismissed: {e}");
        }
    }
}

fn millis(duration: std::time::Duration) -> i32 {
    i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
}

impl Drop for FolioPage {
    fn drop(&mut self) {
        self.disconnect_sections();
        if let Some((query, listener)) = self.media.take() {
            let callback = listener.as_ref().unchecked_ref();
            if let Err(e) = query.remove_event_listener_with_callback("change", callback) {
                log::warn!("could not remove matchMedia listener: {e:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::contact::SUCCESS_MESSAGE;

    #[test]
    fn contact_fields_map_both_ways() {
        for field in Field::ALL {
            assert_eq!(parse_field(field_key(field)).ok(), Some(field));
        }
    }

    fn no_timer(_millis: i32, _f: Box<dyn FnOnce()>) -> Result<(), CapabilityError> {
        Err(CapabilityError::Unavailable("setTimeout"))
    }

    #[test]
    fn send_completes_at_once_without_a_timer() {
        let outbox = Outbox {
            contact: Rc::new(RefCell::new(ContactForm::new())),
            submitter: Rc::new(RefCell::new(SimulatedSubmitter::new())),
            generation: Rc::new(Cell::new(0)),
            on_contact: Rc::new(RefCell::new(None)),
            timer: no_timer,
        };
        let step = {
            let mut form = outbox.contact.borrow_mut();
            form.set(Field::Name, "Ada");
            form.set(Field::Email, "ada@example.com");
            form.set(Field::Message, "Looking forward to working together.");
            form.begin_submit()
        };
        let SubmitStep::Send(message) = step else {
            panic!("a valid form sends");
        };
        assert!(outbox.contact.borrow().is_submitting());

        outbox.send_later(message);

        let form = outbox.contact.borrow();
        assert!(!form.is_submitting());
        assert_eq!(form.notice().map(|n| n.message), Some(SUCCESS_MESSAGE));
        assert!(form.data().name.is_empty());
        assert_eq!(outbox.submitter.borrow().sent().len(), 1);
        assert_eq!(outbox.generation.get(), 1);
    }

    #[test]
    fn durations_fit_set_timeout() {
        assert_eq!(millis(SIMULATED_LATENCY), 1000);
        assert_eq!(millis(NOTICE_AUTO_HIDE), 6000);
    }
}
