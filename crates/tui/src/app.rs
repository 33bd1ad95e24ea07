use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use folio_core::contact::{
    ContactForm, ContactMessage, ContactSubmitter, Field, NOTICE_AUTO_HIDE, Notice,
    SIMULATED_LATENCY, SimulatedSubmitter, SubmitStep,
};
use folio_core::nav::{NavBar, NavEntry};
use folio_core::scroll::{HERO_NEXT_SECTION, ScrollAnimation, jump_to};
use folio_core::sections::{LayoutVisibility, ScrollSpy, page_sections};
use folio_core::theme::{ColorSchemeSource, SchemeWatcher};
use folio_core::{PreferenceStore, ScrollHost, SiteConfig, SmoothScrollNavigator, ThemeController};
use folio_protocol::{Rect, ScrollBehavior, SectionId, ThemeMode};

use crate::document::{self, Document, FormView};

/// The nav bar has its own row, so headings only need one row of air.
const NAV_CLEARANCE_ROWS: f64 = 1.0;

/// Document scroll in rows.
#[derive(Debug, Default)]
struct PageView {
    scroll: f64,
    rows: f64,
    doc_rows: f64,
    regions: Vec<(SectionId, Rect)>,
    animation: Option<ScrollAnimation>,
}

impl PageView {
    fn max_scroll(&self) -> f64 {
        (self.doc_rows - self.rows).max(0.0)
    }

    fn rect(&self, id: &str) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, rect)| *rect)
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll, 1.0, self.rows)
    }

    fn step(&mut self, dt: Duration) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        self.scroll = animation.step(dt).round();
        if animation.is_finished() {
            self.animation = None;
        }
    }

    fn scroll_by(&mut self, rows: f64) {
        self.animation = None;
        self.scroll = (self.scroll + rows).clamp(0.0, self.max_scroll());
    }
}

impl ScrollHost for PageView {
    fn region_top(&self, id: &str) -> Option<f64> {
        self.rect(id).map(|rect| rect.top() - self.scroll)
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let top = top.clamp(0.0, self.max_scroll());
        match behavior {
            ScrollBehavior::Smooth => self.animation = Some(ScrollAnimation::new(self.scroll, top)),
            ScrollBehavior::Instant => {
                self.animation = None;
                self.scroll = top;
            }
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Page,
    Form(Field),
}

pub struct App {
    config: SiteConfig,
    spy: Rc<RefCell<ScrollSpy>>,
    visibility: LayoutVisibility,
    nav: NavBar,
    navigator: SmoothScrollNavigator,
    theme: ThemeController<Box<dyn PreferenceStore>>,
    scheme: Box<dyn ColorSchemeSource>,
    watcher: SchemeWatcher,
    contact: ContactForm,
    submitter: SimulatedSubmitter,
    sending: Option<(ContactMessage, Instant)>,
    notice_since: Option<Instant>,
    view: PageView,
    focus: Focus,
    quit: bool,
}

impl App {
    pub fn new(
        config: SiteConfig,
        store: Box<dyn PreferenceStore>,
        scheme: Box<dyn ColorSchemeSource>,
    ) -> Self {
        let theme = ThemeController::resolve(store, scheme.as_ref());
        let spy = Rc::new(RefCell::new(ScrollSpy::new()));
        let mut visibility = LayoutVisibility::new();
        for spec in page_sections(&config) {
            ScrollSpy::attach(&spy, &mut visibility, spec);
        }
        Self {
            nav: NavBar::from_config(&config),
            navigator: SmoothScrollNavigator::with_offset(NAV_CLEARANCE_ROWS),
            config,
            spy,
            visibility,
            theme,
            scheme,
            watcher: SchemeWatcher::new(),
            contact: ContactForm::new(),
            submitter: SimulatedSubmitter::new(),
            sending: None,
            notice_since: None,
            view: PageView::default(),
            focus: Focus::Page,
            quit: false,
        }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn active(&self) -> SectionId {
        self.spy.borrow().active().clone()
    }

    pub fn nav_entries<'a>(&'a self, active: &'a SectionId) -> Vec<NavEntry<'a>> {
        self.nav.entries(active).collect()
    }

    pub fn is_drawer_open(&self) -> bool {
        self.nav.is_drawer_open()
    }

    pub fn mode(&self) -> ThemeMode {
        self.theme.mode()
    }

    pub fn follows_system(&self) -> bool {
        !self.theme.is_explicit()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.contact.notice()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn scroll(&self) -> usize {
        self.view.scroll as usize
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Lay the page out for a `width` x `rows` document area and feed the
    /// section positions to the scroll-spy.
    pub fn layout(&mut self, width: u16, rows: u16) -> Document {
        let focus = match self.focus {
            Focus::Form(field) => Some(field),
            Focus::Page => None,
        };
        let doc = document::build(
            &self.config,
            &self.contact,
            FormView { focus },
            self.theme.mode(),
            width,
            rows,
        );
        self.view.rows = f64::from(rows);
        self.view.doc_rows = doc.rows() as f64;
        self.view.regions = doc.regions.clone();
        self.view.scroll = self.view.scroll.clamp(0.0, self.view.max_scroll());

        let view = &self.view;
        self.visibility.update(|id| view.rect(id.as_str()), &view.viewport());
        doc
    }

    /// Advance animations and timers.
    pub fn tick(&mut self, now: Instant, dt: Duration) {
        self.view.step(dt);

        if self.sending.as_ref().is_some_and(|(_, done_at)| now >= *done_at) {
            if let Some((message, _)) = self.sending.take() {
                let result = self.submitter.submit(&message);
                self.contact.finish_submit(result);
                self.notice_since = Some(now);
            }
        }

        if let Some(since) = self.notice_since {
            if self.contact.notice().is_none() || now.duration_since(since) >= NOTICE_AUTO_HIDE {
                self.contact.dismiss_notice();
                self.notice_since = None;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.view.animation.is_some() || self.sending.is_some()
    }

    /// Re-read the desktop color scheme and follow it if the user has not
    /// chosen a theme.
    pub fn poll_scheme(&mut self) {
        if let Some(prefers_dark) = self.watcher.poll(self.scheme.as_ref()) {
            self.theme.on_system_change(prefers_dark);
        }
    }

    fn select(&mut self, id: SectionId) {
        self.nav.select(&id, &mut self.view, &self.navigator);
    }

    fn select_nth(&mut self, n: usize) {
        if let Some(item) = self.nav.items().get(n) {
            let id = item.id.clone();
            self.select(id);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match self.focus {
            Focus::Page => self.page_key(key),
            Focus::Form(field) => self.form_key(field, key, now),
        }
    }

    fn page_key(&mut self, key: KeyEvent) {
        let page = (self.view.rows - 2.0).max(1.0);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit = true,
            KeyCode::Tab => {
                let active = self.active();
                if let Some(item) = self.nav.next_after(&active) {
                    let id = item.id.clone();
                    self.select(id);
                }
            }
            KeyCode::BackTab => {
                let active = self.active();
                if let Some(item) = self.nav.prev_before(&active) {
                    let id = item.id.clone();
                    self.select(id);
                }
            }
            KeyCode::Char(digit @ '1'..='9') => {
                self.select_nth(usize::from(digit as u8 - b'1'));
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.nav.select_home(&mut self.view, &self.navigator);
            }
            KeyCode::End | KeyCode::Char('G') => {
                let bottom = self.view.max_scroll();
                self.view.scroll_to(bottom, ScrollBehavior::Smooth);
            }
            KeyCode::Char('n') => jump_to(&mut self.view, HERO_NEXT_SECTION),
            KeyCode::Up | KeyCode::Char('k') => self.view.scroll_by(-1.0),
            KeyCode::Down | KeyCode::Char('j') => self.view.scroll_by(1.0),
            KeyCode::PageUp => self.view.scroll_by(-page),
            KeyCode::PageDown | KeyCode::Char(' ') => self.view.scroll_by(page),
            KeyCode::Char('t') => {
                self.theme.toggle();
            }
            KeyCode::Char('s') => {
                self.theme.follow_system(self.scheme.as_ref());
            }
            KeyCode::Char('m') => {
                if self.nav.is_drawer_open() {
                    self.nav.close_drawer();
                } else {
                    self.nav.open_drawer();
                }
            }
            KeyCode::Char('c') => {
                self.focus = Focus::Form(Field::Name);
                if let Ok(id) = SectionId::new("contact") {
                    self.select(id);
                }
            }
            KeyCode::Char('x') => self.contact.dismiss_notice(),
            _ => {}
        }
    }

    fn form_key(&mut self, field: Field, key: KeyEvent, now: Instant) {
        let position = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        match key.code {
            KeyCode::Esc => self.focus = Focus::Page,
            KeyCode::Tab => {
                self.focus = Focus::Form(Field::ALL[(position + 1) % Field::ALL.len()]);
            }
            KeyCode::BackTab => {
                let prev = (position + Field::ALL.len() - 1) % Field::ALL.len();
                self.focus = Focus::Form(Field::ALL[prev]);
            }
            KeyCode::Enter => {
                if let SubmitStep::Send(message) = self.contact.begin_submit() {
                    self.sending = Some((message, now + SIMULATED_LATENCY));
                }
            }
            KeyCode::Backspace => {
                let mut value = self.contact.data().field(field).to_string();
                value.pop();
                self.contact.set(field, value);
            }
            KeyCode::Char(c) => {
                let mut value = self.contact.data().field(field).to_string();
                value.push(c);
                self.contact.set(field, value);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::contact::SUCCESS_MESSAGE;
    use folio_core::theme::{FixedScheme, JsonFileStore, MemoryStore, THEME_KEY};

    const WIDTH: u16 = 100;
    const ROWS: u16 = 20;

    fn app() -> App {
        let config = SiteConfig::builtin().unwrap();
        let mut app = App::new(config, Box::new(MemoryStore::new()), Box::new(FixedScheme(false)));
        app.layout(WIDTH, ROWS);
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    fn settle(app: &mut App) {
        for _ in 0..100 {
            app.tick(Instant::now(), Duration::from_millis(50));
        }
        app.layout(WIDTH, ROWS);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn tab_walks_the_nav_and_highlights_follow() {
        let mut app = app();
        assert_eq!(app.active(), "home");

        press(&mut app, KeyCode::Tab);
        settle(&mut app);
        assert_eq!(app.active(), "story");

        press(&mut app, KeyCode::Char('4'));
        settle(&mut app);
        assert_eq!(app.active(), "skills");
        let active = app.active();
        let highlighted: Vec<_> = app
            .nav_entries(&active)
            .into_iter()
            .filter(|e| e.highlighted)
            .map(|e| e.label)
            .collect();
        assert_eq!(highlighted.len(), 1);

        press(&mut app, KeyCode::Home);
        settle(&mut app);
        assert_eq!(app.active(), "home");
        assert_eq!(app.scroll(), 0);
    }

    #[test]
    fn hero_jump_lands_on_the_story_heading() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        settle(&mut app);
        let story = app.view.rect("story").unwrap();
        assert_eq!(app.view.scroll, story.top());
        assert_eq!(app.active(), "story");
    }

    #[test]
    fn reading_now_keeps_projects_highlighted() {
        let mut app = app();
        press(&mut app, KeyCode::Char('5'));
        settle(&mut app);
        assert_eq!(app.active(), "projects");

        let projects = app.view.rect("projects").unwrap();
        let now = app.view.rect("now").unwrap();
        assert_eq!(now.top(), projects.bottom());

        // Bottom of the screen at the end of "now", most of it showing.
        app.view.scroll_to(now.bottom() - f64::from(ROWS), ScrollBehavior::Instant);
        app.layout(WIDTH, ROWS);
        assert!(app.view.scroll <= now.top());
        assert_eq!(app.active(), "projects");
    }

    #[test]
    fn theme_toggle_persists_and_reset_follows_desktop() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("preferences.json"));
        let config = SiteConfig::builtin().unwrap();
        let mut app = App::new(config.clone(), Box::new(store), Box::new(FixedScheme(true)));
        assert_eq!(app.mode(), ThemeMode::Dark);
        assert!(app.follows_system());

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.mode(), ThemeMode::Light);
        assert!(!app.follows_system());

        let reopened = JsonFileStore::new(dir.path().join("preferences.json"));
        assert_eq!(reopened.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        let mut app = App::new(config, Box::new(reopened), Box::new(FixedScheme(true)));
        assert_eq!(app.mode(), ThemeMode::Light);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode(), ThemeMode::Dark);
        assert!(app.follows_system());
    }

    #[test]
    fn contact_form_sends_after_latency_and_notice_hides() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.focus(), Focus::Form(Field::Name));

        type_text(&mut app, "Al");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "a@b.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "short");
        press(&mut app, KeyCode::Enter);
        assert!(app.contact.errors().get(Field::Message).is_some());
        assert!(app.sending.is_none());

        type_text(&mut app, " but long enough now");
        let start = Instant::now();
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), start);
        assert!(app.contact.is_submitting());

        app.tick(start + Duration::from_millis(500), Duration::ZERO);
        assert!(app.contact.is_submitting());

        app.tick(start + SIMULATED_LATENCY, Duration::ZERO);
        assert!(!app.contact.is_submitting());
        assert_eq!(app.notice().map(|n| n.message), Some(SUCCESS_MESSAGE));
        assert!(app.contact.data().name.is_empty());
        assert_eq!(app.submitter.sent().len(), 1);

        app.tick(start + SIMULATED_LATENCY + NOTICE_AUTO_HIDE, Duration::ZERO);
        assert!(app.notice().is_none());
    }

    #[test]
    fn drawer_closes_on_selection() {
        let mut app = app();
        press(&mut app, KeyCode::Char('m'));
        assert!(app.is_drawer_open());
        press(&mut app, KeyCode::Char('2'));
        assert!(!app.is_drawer_open());
    }
}
