use folio_core::SiteConfig;
use folio_core::contact::{ContactForm, Field};
use folio_core::timeline;
use folio_protocol::{Rect, SectionId, ThemeMode, ThemeToken};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::renderer::color;

/// The page flattened to terminal rows. Region rectangles are in rows,
/// measured from the top of the document.
pub struct Document {
    pub lines: Vec<Line<'static>>,
    pub regions: Vec<(SectionId, Rect)>,
}

impl Document {
    pub fn rows(&self) -> usize {
        self.lines.len()
    }
}

/// Greedy word wrap on character counts. Words longer than `width` are
/// left whole.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if len > 0 && len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        current.push_str(word);
        len += word_len;
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// What the contact section needs to know about the form's focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormView {
    pub focus: Option<Field>,
}

struct Builder {
    lines: Vec<Line<'static>>,
    regions: Vec<(SectionId, Rect)>,
    width: usize,
    mode: ThemeMode,
}

impl Builder {
    fn style(&self, token: ThemeToken) -> Style {
        Style::default().fg(color(token, self.mode))
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    fn section(&mut self, id: &str, min_rows: usize, add: impl FnOnce(&mut Self)) {
        let start = self.lines.len();
        self.blank();
        add(self);
        self.blank();
        while self.lines.len() - start < min_rows {
            self.blank();
        }
        let rows = self.lines.len() - start;
        match SectionId::new(id) {
            Ok(id) => self.regions.push((
                id,
                Rect::new(0.0, start as f64, self.width as f64, rows as f64),
            )),
            Err(e) => log::error!("section {id:?}: {e}"),
        }
    }

    fn heading(&mut self, text: &str) {
        let style = self
            .style(ThemeToken::TextPrimary)
            .add_modifier(Modifier::BOLD);
        self.lines.push(Line::from(Span::styled(text.to_uppercase(), style)));
        let rule = "─".repeat(text.chars().count().min(self.width));
        self.lines
            .push(Line::from(Span::styled(rule, self.style(ThemeToken::Primary))));
        self.blank();
    }

    fn paragraph(&mut self, text: &str, style: Style) {
        for line in wrap(text, self.width) {
            self.lines.push(Line::from(Span::styled(line, style)));
        }
    }

    /// Wrapped text with a hanging indent after `marker`.
    fn bullet(&mut self, marker: &str, text: &str, style: Style) {
        let indent = marker.chars().count() + 1;
        for (i, line) in wrap(text, self.width.saturating_sub(indent)).into_iter().enumerate() {
            let lead = if i == 0 {
                format!("{marker} ")
            } else {
                " ".repeat(indent)
            };
            self.lines.push(Line::from(vec![
                Span::styled(lead, self.style(ThemeToken::Primary)),
                Span::styled(line, style),
            ]));
        }
    }
}

pub fn build(
    config: &SiteConfig,
    form: &ContactForm,
    view: FormView,
    mode: ThemeMode,
    width: u16,
    rows: u16,
) -> Document {
    let mut b = Builder {
        lines: Vec::new(),
        regions: Vec::new(),
        width: usize::from(width.max(20)),
        mode,
    };
    let text = b.style(ThemeToken::TextPrimary);
    let muted = b.style(ThemeToken::TextSecondary);

    b.section("home", usize::from(rows), |b| {
        for _ in 0..usize::from(rows / 4) {
            b.blank();
        }
        b.lines.push(Line::from(Span::styled(
            config.name.clone(),
            text.add_modifier(Modifier::BOLD),
        )));
        b.paragraph(&config.hero.title, b.style(ThemeToken::Primary));
        b.blank();
        b.paragraph(&config.hero.subtitle, muted);
        b.blank();
        for cta in [&config.hero.cta.primary, &config.hero.cta.secondary] {
            if let Some(href) = cta.href(&config.contact) {
                b.bullet("→", &format!("{}  {href}", cta.text), text);
            }
        }
        b.blank();
        b.lines.push(Line::from(Span::styled("↓ n: my story", muted)));
    });

    b.section("story", 0, |b| {
        b.heading(&config.story_title);
        for paragraph in &config.story_paragraphs {
            b.paragraph(paragraph, muted);
            b.blank();
        }
        b.paragraph(
            &format!("“{}”", config.story_quote),
            b.style(ThemeToken::Primary).add_modifier(Modifier::ITALIC),
        );
    });

    b.section("journey", 0, |b| {
        b.heading("Journey");
        for entry in timeline::journey(config) {
            let tone = b.style(entry.tone.token());
            let dot = if entry.tone.pulses() { "◉" } else { "●" };
            b.lines.push(Line::from(vec![
                Span::styled(format!("{dot} "), tone),
                Span::styled(entry.title.to_string(), text.add_modifier(Modifier::BOLD)),
            ]));
            b.paragraph(&format!("  {}", entry.subtitle), tone);
            b.paragraph(&format!("  {} · {}", entry.period, entry.location), muted);
            for achievement in entry.achievements {
                b.bullet("  •", achievement, text);
            }
            if !entry.is_last {
                b.lines.push(Line::from(Span::styled("│", muted)));
            } else {
                b.blank();
            }
        }
    });

    b.section("skills", 0, |b| {
        b.heading("Skills");
        for category in &config.skill_categories {
            b.lines.push(Line::from(Span::styled(
                category.name.clone(),
                text.add_modifier(Modifier::BOLD),
            )));
            b.paragraph(&category.skills.join(" · "), muted);
            b.blank();
        }
        if !config.professional_skills.is_empty() {
            b.lines.push(Line::from(Span::styled(
                "Professional",
                text.add_modifier(Modifier::BOLD),
            )));
            b.paragraph(&config.professional_skills.join(" · "), muted);
        }
    });

    b.section("projects", 0, |b| {
        b.heading("Projects");
        for project in &config.projects {
            b.lines.push(Line::from(vec![
                Span::styled(project.title.clone(), text.add_modifier(Modifier::BOLD)),
                Span::styled(format!("  [{}]", project.status), muted),
            ]));
            b.paragraph(&project.subtitle, muted);
            for line in &project.description {
                b.bullet("•", line, text);
            }
            b.paragraph(&project.tech.join(", "), b.style(ThemeToken::Primary));
            for link in [&project.github, &project.live].into_iter().flatten() {
                b.paragraph(link, muted.add_modifier(Modifier::UNDERLINED));
            }
            b.blank();
        }
    });

    b.section("now", 0, |b| {
        b.heading("Now");
        b.paragraph(&config.now_content, muted);
    });

    b.section("contact", usize::from(rows / 2), |b| {
        b.heading("Contact");
        let info = &config.contact;
        for detail in [&info.email, &info.phone, &info.location] {
            if !detail.is_empty() {
                b.paragraph(detail, muted);
            }
        }
        b.blank();
        let error = b.style(ThemeToken::FieldError);
        for field in Field::ALL {
            let focused = view.focus == Some(field);
            let label_style = if focused {
                b.style(ThemeToken::Primary).add_modifier(Modifier::BOLD)
            } else {
                text
            };
            let cursor = if focused { "▏" } else { "" };
            b.lines.push(Line::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                Span::styled(format!("{}{cursor}", form.data().field(field)), text),
            ]));
            if let Some(message) = form.errors().get(field) {
                b.lines.push(Line::from(Span::styled(format!("  {message}"), error)));
            }
        }
        b.blank();
        let send = if form.is_submitting() {
            "[ Sending... ]"
        } else {
            "[ Send Message ]  (c to edit, Enter to send)"
        };
        b.lines.push(Line::from(Span::styled(send, b.style(ThemeToken::Primary))));
    });

    b.lines.push(Line::from(Span::styled(format!("© {}", config.name), muted)));

    Document {
        lines: b.lines,
        regions: b.regions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(wrap("one two three four", 9), ["one two", "three", "four"]);
        assert_eq!(wrap("", 10), [""]);
        assert_eq!(wrap("unbreakable", 4), ["unbreakable"]);
    }

    #[test]
    fn regions_tile_the_document_in_page_order() {
        let config = SiteConfig::builtin().unwrap();
        let doc = build(
            &config,
            &ContactForm::new(),
            FormView { focus: None },
            ThemeMode::Light,
            80,
            24,
        );
        let ids: Vec<_> = doc.regions.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(
            ids,
            ["home", "story", "journey", "skills", "projects", "now", "contact"]
        );

        let mut expected_top = 0.0;
        for (_, rect) in &doc.regions {
            assert_eq!(rect.top(), expected_top);
            expected_top = rect.bottom();
        }
        // Hero fills the first screen; only the footer follows the contact section.
        assert_eq!(doc.regions[0].1.h, 24.0);
        assert_eq!(doc.rows() as f64, expected_top + 1.0);
    }
}
