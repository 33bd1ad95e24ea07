use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use eframe::egui;
use egui::RichText;
use folio_core::{PreferenceStore, SiteConfig};
use folio_core::contact::{
    ContactForm, ContactMessage, ContactSubmitter, Field, NOTICE_AUTO_HIDE, SIMULATED_LATENCY,
    SimulatedSubmitter, SubmitStep,
};
use folio_core::nav::NavBar;
use folio_core::scroll::{HERO_NEXT_SECTION, SmoothScrollNavigator, jump_to};
use folio_core::sections::{LayoutVisibility, ScrollSpy, page_sections};
use folio_core::theme::{SchemeWatcher, ThemeController};
use folio_core::timeline::{self, EntryKind};
use folio_protocol::{Rect, SectionId, Severity, ThemeMode, ThemeToken};

use crate::page::PageScroll;
use crate::platform::{self, SystemTheme};
use crate::theme;

/// Below this width the nav items move into a drawer.
const DRAWER_BREAKPOINT: f32 = 760.0;
const CONTENT_WIDTH: f32 = 960.0;

/// The whole page: nav bar on top, every section in one scroll area.
pub struct PortfolioApp {
    config: SiteConfig,
    spy: Rc<RefCell<ScrollSpy>>,
    visibility: LayoutVisibility,
    page: PageScroll,
    nav: NavBar,
    navigator: SmoothScrollNavigator,
    theme: ThemeController<Box<dyn PreferenceStore>>,
    scheme: SchemeWatcher,
    contact: ContactForm,
    submitter: SimulatedSubmitter,
    /// In-flight message and the time it completes.
    sending: Option<(ContactMessage, f64)>,
    /// When the current notice appeared.
    notice_since: Option<f64>,
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: SiteConfig) -> Self {
        theme::apply_typography(&cc.egui_ctx);

        let theme = ThemeController::resolve(
            platform::preference_store(),
            &SystemTheme(&cc.egui_ctx),
        );
        theme::apply(&cc.egui_ctx, theme.mode());

        let spy = Rc::new(RefCell::new(ScrollSpy::new()));
        let mut visibility = LayoutVisibility::new();
        for spec in page_sections(&config) {
            ScrollSpy::attach(&spy, &mut visibility, spec);
        }
        log::info!("tracking {} sections", visibility.len());

        Self {
            nav: NavBar::from_config(&config),
            config,
            spy,
            visibility,
            page: PageScroll::new(),
            navigator: SmoothScrollNavigator::new(),
            theme,
            scheme: SchemeWatcher::new(),
            contact: ContactForm::new(),
            submitter: SimulatedSubmitter::new(),
            sending: None,
            notice_since: None,
        }
    }

    fn color(&self, token: ThemeToken) -> egui::Color32 {
        theme::resolve(token, self.theme.mode())
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        let mode = self.theme.toggle();
        theme::apply(ctx, mode);
    }

    fn follow_system(&mut self, ctx: &egui::Context) {
        let mode = self.theme.follow_system(&SystemTheme(ctx));
        theme::apply(ctx, mode);
    }

    fn nav_bar(&mut self, ui: &mut egui::Ui) {
        let active = self.spy.borrow().active().clone();
        let narrow = ui.available_width() < DRAWER_BREAKPOINT;

        ui.horizontal(|ui| {
            let logo = RichText::new(&self.config.name)
                .size(theme::FONT_EMPHASIS)
                .strong()
                .color(self.color(ThemeToken::TextPrimary));
            if ui.add(egui::Button::new(logo).frame(false)).clicked() {
                self.nav.select_home(&mut self.page, &self.navigator);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mode = self.theme.mode();
                let icon = match mode {
                    ThemeMode::Dark => "☀",
                    ThemeMode::Light => "🌙",
                };
                let toggle = ui.button(icon).on_hover_text(mode.toggle_label());
                if toggle.clicked() {
                    self.toggle_theme(ui.ctx());
                }
                toggle.context_menu(|ui| {
                    let follows = !self.theme.is_explicit();
                    if ui
                        .add_enabled(!follows, egui::Button::new("Use system setting"))
                        .clicked()
                    {
                        self.follow_system(ui.ctx());
                        ui.close();
                    }
                });

                if narrow {
                    if ui.button("☰").clicked() {
                        if self.nav.is_drawer_open() {
                            self.nav.close_drawer();
                        } else {
                            self.nav.open_drawer();
                        }
                    }
                } else {
                    // Right-to-left layout: add in reverse to read left-to-right.
                    let items: Vec<_> = self.nav.items().to_vec();
                    for item in items.iter().rev() {
                        self.nav_item(ui, &item.id, &item.label, item.id == active);
                    }
                }
            });
        });

        if narrow && self.nav.is_drawer_open() {
            ui.separator();
            let items: Vec<_> = self.nav.items().to_vec();
            ui.vertical(|ui| {
                for item in &items {
                    self.nav_item(ui, &item.id, &item.label, item.id == active);
                }
            });
        }
    }

    fn nav_item(&mut self, ui: &mut egui::Ui, id: &SectionId, label: &str, highlighted: bool) {
        let (text, fill) = if highlighted {
            (
                self.color(ThemeToken::NavItemActiveText),
                self.color(ThemeToken::NavItemActive),
            )
        } else {
            (self.color(ThemeToken::NavItemText), egui::Color32::TRANSPARENT)
        };
        let button = egui::Button::new(RichText::new(label).color(text)).fill(fill);
        if ui.add(button).clicked() {
            self.nav.select(id, &mut self.page, &self.navigator);
        }
    }

    /// Lay out one section and record where it landed.
    fn section(
        &mut self,
        ui: &mut egui::Ui,
        origin: f32,
        id: &str,
        add: impl FnOnce(&mut Self, &mut egui::Ui),
    ) {
        let rect = ui
            .scope(|ui| {
                ui.set_width(ui.available_width());
                ui.add_space(48.0);
                add(&mut *self, ui);
                ui.add_space(48.0);
            })
            .response
            .rect;
        match SectionId::new(id) {
            Ok(id) => self.page.record_region(
                id,
                Rect::new(
                    f64::from(rect.left()),
                    f64::from(rect.top() - origin),
                    f64::from(rect.width()),
                    f64::from(rect.height()),
                ),
            ),
            Err(e) => log::error!("section {id:?}: {e}"),
        }
    }

    fn heading(&self, ui: &mut egui::Ui, text: &str) {
        ui.label(
            RichText::new(text)
                .size(theme::FONT_TITLE)
                .strong()
                .color(self.color(ThemeToken::TextPrimary)),
        );
        ui.add_space(16.0);
    }

    fn hero(&mut self, ui: &mut egui::Ui, viewport_height: f32) {
        ui.set_min_height(viewport_height - 96.0);
        ui.add_space(viewport_height * 0.15);
        ui.label(
            RichText::new(&self.config.name)
                .size(theme::FONT_DISPLAY)
                .strong()
                .color(self.color(ThemeToken::TextPrimary)),
        );
        ui.label(
            RichText::new(&self.config.hero.title)
                .size(theme::FONT_EMPHASIS)
                .color(self.color(ThemeToken::Primary)),
        );
        ui.add_space(8.0);
        ui.label(
            RichText::new(&self.config.hero.subtitle).color(self.color(ThemeToken::TextSecondary)),
        );
        ui.add_space(24.0);

        ui.horizontal(|ui| {
            let ctas = [&self.config.hero.cta.primary, &self.config.hero.cta.secondary];
            for (i, cta) in ctas.into_iter().enumerate() {
                let Some(href) = cta.href(&self.config.contact) else {
                    continue;
                };
                let button = if i == 0 {
                    egui::Button::new(RichText::new(&cta.text).color(egui::Color32::WHITE))
                        .fill(self.color(ThemeToken::Primary))
                } else {
                    egui::Button::new(cta.text.as_str())
                };
                if ui.add(button).clicked() {
                    ui.ctx().open_url(egui::OpenUrl::new_tab(href));
                }
            }
        });

        ui.add_space(48.0);
        if ui.button("⬇").on_hover_text("Scroll to my story").clicked() {
            jump_to(&mut self.page, HERO_NEXT_SECTION);
        }
    }

    fn story(&mut self, ui: &mut egui::Ui) {
        let title = self.config.story_title.clone();
        self.heading(ui, &title);
        for paragraph in &self.config.story_paragraphs {
            ui.label(RichText::new(paragraph).color(self.color(ThemeToken::TextSecondary)));
            ui.add_space(8.0);
        }
        ui.add_space(16.0);
        ui.label(
            RichText::new(format!("“{}”", self.config.story_quote))
                .italics()
                .size(theme::FONT_EMPHASIS)
                .color(self.color(ThemeToken::Primary)),
        );
    }

    fn now(&mut self, ui: &mut egui::Ui) {
        self.heading(ui, "Now");
        ui.label(
            RichText::new(&self.config.now_content).color(self.color(ThemeToken::TextSecondary)),
        );
    }

    fn journey(&mut self, ui: &mut egui::Ui) {
        self.heading(ui, "Journey");
        let mode = self.theme.mode();
        for entry in timeline::journey(&self.config) {
            let tone = theme::resolve(entry.tone.token(), mode);
            ui.horizontal_top(|ui| {
                let (dot, _) = ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::hover());
                ui.painter().circle_filled(dot.center(), 7.0, tone);
                if entry.tone.pulses() {
                    ui.painter().circle_stroke(
                        dot.center(),
                        11.0,
                        egui::Stroke::new(2.0, tone.gamma_multiply(0.4)),
                    );
                }
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(entry.title)
                            .strong()
                            .size(theme::FONT_EMPHASIS)
                            .color(theme::resolve(ThemeToken::TextPrimary, mode)),
                    );
                    ui.label(RichText::new(entry.subtitle).color(tone));
                    ui.label(
                        RichText::new(format!("{} · {}", entry.period, entry.location))
                            .small()
                            .color(theme::resolve(ThemeToken::TextSecondary, mode)),
                    );
                    for achievement in entry.achievements {
                        ui.label(format!("• {achievement}"));
                    }
                });
            });
            if entry.is_last && entry.kind == EntryKind::Experience {
                ui.add_space(12.0);
                ui.label(RichText::new("Education").strong());
            }
            ui.add_space(16.0);
        }
    }

    fn skills(&mut self, ui: &mut egui::Ui) {
        self.heading(ui, "Skills");
        let chip = self.color(ThemeToken::Paper);
        for category in &self.config.skill_categories {
            ui.label(RichText::new(&category.name).strong());
            ui.horizontal_wrapped(|ui| {
                for skill in &category.skills {
                    egui::Frame::new()
                        .fill(chip)
                        .corner_radius(egui::CornerRadius::same(12))
                        .inner_margin(egui::Margin::symmetric(10, 4))
                        .show(ui, |ui| ui.label(skill.as_str()));
                }
            });
            ui.add_space(12.0);
        }
        if !self.config.professional_skills.is_empty() {
            ui.label(RichText::new("Professional").strong());
            ui.horizontal_wrapped(|ui| {
                for skill in &self.config.professional_skills {
                    ui.label(format!("• {skill}"));
                }
            });
        }
    }

    fn projects(&mut self, ui: &mut egui::Ui) {
        self.heading(ui, "Projects");
        let paper = self.color(ThemeToken::Paper);
        let secondary = self.color(ThemeToken::TextSecondary);
        for project in &self.config.projects {
            egui::Frame::new()
                .fill(paper)
                .corner_radius(egui::CornerRadius::same(12))
                .inner_margin(egui::Margin::same(16))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&project.title).strong().size(theme::FONT_EMPHASIS));
                        ui.label(RichText::new(&project.status).small().color(secondary));
                    });
                    ui.label(RichText::new(&project.subtitle).color(secondary));
                    for line in &project.description {
                        ui.label(format!("• {line}"));
                    }
                    ui.horizontal_wrapped(|ui| {
                        for tech in &project.tech {
                            ui.label(RichText::new(tech).small().monospace());
                        }
                    });
                    ui.horizontal(|ui| {
                        if let Some(url) = &project.github {
                            ui.hyperlink_to("GitHub", url);
                        }
                        if let Some(url) = &project.live {
                            ui.hyperlink_to("Live", url);
                        }
                    });
                });
            ui.add_space(12.0);
        }
    }

    fn contact(&mut self, ui: &mut egui::Ui, now: f64) {
        self.heading(ui, "Contact");
        let info = &self.config.contact;
        if !info.email.is_empty() {
            ui.hyperlink_to(info.email.as_str(), format!("mailto:{}", info.email));
        }
        if !info.phone.is_empty() {
            ui.label(info.phone.as_str());
        }
        if !info.location.is_empty() {
            ui.label(RichText::new(&info.location).color(self.color(ThemeToken::TextSecondary)));
        }
        ui.add_space(16.0);

        let enabled = !self.contact.is_submitting();
        let error_color = self.color(ThemeToken::FieldError);
        for field in Field::ALL {
            ui.label(field.label());
            let mut value = self.contact.data().field(field).to_string();
            let edit = match field {
                Field::Message => egui::TextEdit::multiline(&mut value).desired_rows(5),
                Field::Name | Field::Email => egui::TextEdit::singleline(&mut value),
            };
            if ui
                .add_enabled(enabled, edit.desired_width(f32::INFINITY))
                .changed()
            {
                self.contact.set(field, value);
            }
            if let Some(error) = self.contact.errors().get(field) {
                ui.label(RichText::new(error).small().color(error_color));
            }
            ui.add_space(6.0);
        }

        let label = if enabled { "Send Message" } else { "Sending..." };
        let send = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
            .fill(self.color(ThemeToken::Primary));
        if ui.add_enabled(enabled, send).clicked() {
            if let SubmitStep::Send(message) = self.contact.begin_submit() {
                self.sending = Some((message, now + SIMULATED_LATENCY.as_secs_f64()));
            }
        }
    }

    /// Complete a simulated send once its latency has elapsed.
    fn poll_contact(&mut self, ctx: &egui::Context, now: f64) {
        if let Some((_, done_at)) = &self.sending {
            if now < *done_at {
                ctx.request_repaint_after(Duration::from_secs_f64(done_at - now));
                return;
            }
        }
        if let Some((message, _)) = self.sending.take() {
            let result = self.submitter.submit(&message);
            self.contact.finish_submit(result);
            self.notice_since = Some(now);
        }

        let Some(since) = self.notice_since else {
            return;
        };
        let hide_at = since + NOTICE_AUTO_HIDE.as_secs_f64();
        if self.contact.notice().is_none() || now >= hide_at {
            self.contact.dismiss_notice();
            self.notice_since = None;
        } else {
            ctx.request_repaint_after(Duration::from_secs_f64(hide_at - now));
        }
    }

    fn notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.contact.notice().cloned() else {
            return;
        };
        let fill = match notice.severity {
            Severity::Success => self.color(ThemeToken::NoticeSuccess),
            Severity::Error => self.color(ThemeToken::NoticeError),
        };
        egui::Area::new(egui::Id::new("contact_notice"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(fill)
                    .corner_radius(egui::CornerRadius::same(8))
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(notice.message).color(egui::Color32::WHITE));
                            if ui.small_button("✕").clicked() {
                                self.contact.dismiss_notice();
                            }
                        });
                    });
            });
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (now, dt) = ctx.input(|i| (i.time, i.stable_dt));

        if let Some(prefers_dark) = self.scheme.poll(&SystemTheme(ctx)) {
            if self.theme.on_system_change(prefers_dark) {
                theme::apply(ctx, self.theme.mode());
            }
        }
        self.poll_contact(ctx, now);

        egui::TopBottomPanel::top("nav")
            .frame(
                egui::Frame::new()
                    .fill(self.color(ThemeToken::NavBackground))
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| self.nav_bar(ui));

        let forced = self.page.begin_frame(Duration::from_secs_f32(dt.max(0.0)));

        egui::CentralPanel::default().show(ctx, |ui| {
            let viewport_height = ui.available_height();
            let mut area = egui::ScrollArea::vertical()
                .id_salt("page")
                .auto_shrink([false, false]);
            if let Some(offset) = forced {
                area = area.vertical_scroll_offset(offset as f32);
            }
            let output = area.show(ui, |ui| {
                let origin = ui.min_rect().top();
                self.page.clear_regions();
                let margin = ((ui.available_width() - CONTENT_WIDTH) / 2.0).max(24.0);
                ui.horizontal(|ui| {
                    ui.add_space(margin);
                    ui.vertical(|ui| {
                        ui.set_width(ui.available_width() - margin);
                        self.section(ui, origin, "home", |app, ui| app.hero(ui, viewport_height));
                        self.section(ui, origin, "story", |app, ui| app.story(ui));
                        self.section(ui, origin, "journey", |app, ui| app.journey(ui));
                        self.section(ui, origin, "skills", |app, ui| app.skills(ui));
                        self.section(ui, origin, "projects", |app, ui| app.projects(ui));
                        self.section(ui, origin, "now", |app, ui| app.now(ui));
                        self.section(ui, origin, "contact", |app, ui| app.contact(ui, now));
                        ui.separator();
                        ui.label(
                            RichText::new(format!("© {}", self.config.name))
                                .small()
                                .color(self.color(ThemeToken::TextSecondary)),
                        );
                        ui.add_space(24.0);
                    });
                });
            });
            self.page.end_frame(
                f64::from(output.state.offset.y),
                f64::from(output.inner_rect.width()),
                f64::from(output.inner_rect.height()),
                f64::from(output.content_size.y),
            );
        });

        let page = &self.page;
        self.visibility
            .update(|id| page.rect(id.as_str()), &page.viewport());

        self.notice(ctx);

        if self.page.is_animating() {
            ctx.request_repaint();
        }
    }
}
