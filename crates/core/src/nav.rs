use folio_protocol::{HOME_SECTION, SectionId};
use serde::Serialize;

use crate::config::{NavItem, SiteConfig};
use crate::scroll::{ScrollHost, SmoothScrollNavigator};

/// One nav bar entry as rendered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavEntry<'a> {
    pub id: &'a SectionId,
    pub label: &'a str,
    pub highlighted: bool,
}

/// Fixed navigation bar: items, highlighting, and the mobile drawer.
#[derive(Debug, Clone)]
pub struct NavBar {
    items: Vec<NavItem>,
    drawer_open: bool,
}

impl NavBar {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self {
            items,
            drawer_open: false,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.nav_items.clone())
    }

    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Entries in order, with the active one highlighted.
    pub fn entries<'a>(&'a self, active: &'a SectionId) -> impl Iterator<Item = NavEntry<'a>> {
        self.items.iter().map(move |item| NavEntry {
            id: &item.id,
            label: &item.label,
            highlighted: item.id == *active,
        })
    }

    pub fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn open_drawer(&mut self) {
        self.drawer_open = true;
    }

    pub fn close_drawer(&mut self) {
        self.drawer_open = false;
    }

    /// Item click: scroll to the section and close the drawer.
    pub fn select(
        &mut self,
        id: &SectionId,
        host: &mut dyn ScrollHost,
        navigator: &SmoothScrollNavigator,
    ) {
        navigator.scroll_to(host, id);
        self.drawer_open = false;
    }

    /// Item click carrying a raw id from page markup. An id that cannot
    /// name a section scrolls nowhere, but the drawer still closes.
    pub fn select_raw(
        &mut self,
        id: &str,
        host: &mut dyn ScrollHost,
        navigator: &SmoothScrollNavigator,
    ) {
        match SectionId::new(id) {
            Ok(id) => self.select(&id, host, navigator),
            Err(e) => {
                log::debug!("nav click on {id:?}: {e}");
                self.drawer_open = false;
            }
        }
    }

    /// The logo goes home.
    pub fn select_home(&mut self, host: &mut dyn ScrollHost, navigator: &SmoothScrollNavigator) {
        self.select(&SectionId::home(), host, navigator);
    }

    /// The item after `active`, for keyboard navigation. `None` at the end.
    pub fn next_after(&self, active: &SectionId) -> Option<&NavItem> {
        let pos = self.position(active)?;
        self.items.get(pos + 1)
    }

    /// The item before `active`, for keyboard navigation. `None` at the start.
    pub fn prev_before(&self, active: &SectionId) -> Option<&NavItem> {
        let pos = self.position(active)?;
        pos.checked_sub(1).and_then(|i| self.items.get(i))
    }

    fn position(&self, active: &SectionId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.id == *active)
            .or_else(|| self.items.iter().position(|item| item.id == HOME_SECTION))
    }
}
