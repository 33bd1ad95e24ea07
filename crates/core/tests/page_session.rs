//! Integration test: build a page from the bundled content, scroll through a
//! laid-out document, navigate from the nav bar, flip the theme, and send a
//! contact message.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::contact::{ContactForm, Field, SimulatedSubmitter, SubmitOutcome};
use folio_core::nav::NavBar;
use folio_core::scroll::{
    HERO_NEXT_SECTION, NAVBAR_OFFSET, ScrollHost, SmoothScrollNavigator, jump_to,
};
use folio_core::sections::{LayoutVisibility, ScrollSpy, page_sections};
use folio_core::theme::{FixedScheme, JsonFileStore, MemoryStore, THEME_KEY, ThemeController};
use folio_core::{PreferenceStore, SiteConfig};
use folio_protocol::{Rect, ScrollBehavior, SectionId};

const VIEWPORT_HEIGHT: f64 = 800.0;

/// A document with every nav section stacked at a fixed height. The hero
/// fills one viewport.
struct Document {
    regions: Vec<(SectionId, Rect)>,
    scroll: f64,
    jumps: Vec<String>,
}

impl Document {
    fn new(config: &SiteConfig) -> Self {
        let mut regions = Vec::new();
        let mut top = 0.0;
        for item in &config.nav_items {
            let height = if item.id == "home" { VIEWPORT_HEIGHT } else { 1200.0 };
            regions.push((item.id.clone(), Rect::new(0.0, top, 1280.0, height)));
            top += height;
        }
        Self {
            regions,
            scroll: 0.0,
            jumps: Vec::new(),
        }
    }

    fn rect(&self, id: &SectionId) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, rect)| *rect)
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll, 1280.0, VIEWPORT_HEIGHT)
    }

    fn end(&self) -> f64 {
        self.regions.last().map_or(0.0, |(_, r)| r.bottom())
    }
}

impl ScrollHost for Document {
    fn region_top(&self, id: &str) -> Option<f64> {
        self.regions
            .iter()
            .find(|(rid, _)| rid == id)
            .map(|(_, r)| r.top() - self.scroll)
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn scroll_to(&mut self, top: f64, _behavior: ScrollBehavior) {
        self.scroll = top.max(0.0);
    }

    fn scroll_into_view(&mut self, id: &str, _behavior: ScrollBehavior) -> bool {
        let Some(top) = self.region_top(id) else {
            return false;
        };
        self.scroll += top;
        self.jumps.push(id.to_string());
        true
    }
}

fn frame(source: &mut LayoutVisibility, doc: &Document) {
    source.update(|id| doc.rect(id), &doc.viewport());
}

#[test]
fn scrolling_and_navigation_keep_nav_highlight_in_sync() {
    let config = SiteConfig::builtin().expect("builtin config");
    let mut doc = Document::new(&config);
    let mut nav = NavBar::from_config(&config);
    let navigator = SmoothScrollNavigator::new();

    let spy = Rc::new(RefCell::new(ScrollSpy::new()));
    let mut source = LayoutVisibility::new();
    for spec in page_sections(&config) {
        ScrollSpy::attach(&spy, &mut source, spec).expect("layout source always observes");
    }

    frame(&mut source, &doc);
    assert_eq!(spy.borrow().active(), "home");

    // Nav click on "skills" lands 80 units above the section top.
    nav.open_drawer();
    let skills = SectionId::new("skills").expect("valid id");
    nav.select(&skills, &mut doc, &navigator);
    assert!(!nav.is_drawer_open());
    let skills_top = doc.rect(&skills).expect("skills laid out").top();
    assert_eq!(doc.scroll, skills_top - NAVBAR_OFFSET);

    frame(&mut source, &doc);
    let active = spy.borrow().active().clone();
    assert_eq!(active, "skills");
    let highlighted: Vec<_> = nav
        .entries(&active)
        .filter(|e| e.highlighted)
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(highlighted, ["skills"]);

    // Past the end of the document nothing is in view; the last id sticks.
    doc.scroll = doc.end() + 500.0;
    frame(&mut source, &doc);
    assert_eq!(spy.borrow().active(), "skills");

    // Unknown ids do nothing.
    let before = doc.scroll;
    nav.select(&SectionId::new("blog").expect("valid id"), &mut doc, &navigator);
    assert_eq!(doc.scroll, before);
}

#[test]
fn hero_jump_has_no_navbar_compensation() {
    let config = SiteConfig::builtin().expect("builtin config");
    let mut doc = Document::new(&config);
    jump_to(&mut doc, HERO_NEXT_SECTION);
    let story = doc
        .rect(&SectionId::new(HERO_NEXT_SECTION).expect("valid id"))
        .expect("story laid out");
    assert_eq!(doc.scroll, story.top());
    assert_eq!(doc.jumps, vec![HERO_NEXT_SECTION.to_string()]);
}

#[test]
fn theme_choice_survives_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("preferences.json");

    // First session: OS is dark, user picks light.
    let mut theme = ThemeController::resolve(JsonFileStore::new(&path), &FixedScheme(true));
    assert!(theme.is_dark());
    theme.toggle();
    assert!(!theme.is_dark());

    // Second session: OS still dark, stored light wins and locks out OS events.
    let mut theme = ThemeController::resolve(JsonFileStore::new(&path), &FixedScheme(true));
    assert!(!theme.is_dark());
    assert!(theme.is_explicit());
    assert!(!theme.on_system_change(true));
    assert_eq!(
        theme.store().get(THEME_KEY).expect("readable").as_deref(),
        Some("light")
    );
}

#[test]
fn implicit_theme_is_not_written_back() {
    let mut theme = ThemeController::resolve(MemoryStore::new(), &FixedScheme(false));
    theme.on_system_change(true);
    theme.on_system_change(false);
    assert_eq!(theme.store().get(THEME_KEY).expect("readable"), None);
}

#[test]
fn contact_round_trip() {
    let mut form = ContactForm::new();
    let mut backend = SimulatedSubmitter::new();
    form.set(Field::Name, "Al");
    form.set(Field::Email, "a@b.com");
    form.set(Field::Message, "short");
    assert_eq!(form.submit(&mut backend), SubmitOutcome::Invalid);
    assert!(form.errors().get(Field::Message).is_some());

    form.set(Field::Message, "Twenty characters ok");
    assert_eq!(form.submit(&mut backend), SubmitOutcome::Sent);
    assert_eq!(backend.sent()[0].message, "Twenty characters ok");
    assert!(form.data().name.is_empty());
}
