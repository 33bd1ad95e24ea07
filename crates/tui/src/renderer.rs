use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use folio_protocol::{Severity, ThemeMode, ThemeToken};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{App, Focus};

/// Below this many columns the nav items move into a drawer.
const DRAWER_BREAKPOINT: u16 = 90;
const SCHEME_POLL: Duration = Duration::from_secs(5);

pub fn color(token: ThemeToken, mode: ThemeMode) -> Color {
    use ThemeToken::*;
    match mode {
        ThemeMode::Light => match token {
            Background | NavBackground => Color::Rgb(0xff, 0xff, 0xff),
            Paper => Color::Rgb(0xf8, 0xfa, 0xfc),
            Divider => Color::Rgb(0xe2, 0xe8, 0xf0),
            TextPrimary => Color::Rgb(0x0f, 0x17, 0x2a),
            TextSecondary | NavItemText => Color::Rgb(0x47, 0x55, 0x69),
            Primary | NavItemActive | TimelineRecent => Color::Rgb(0x3b, 0x82, 0xf6),
            PrimaryLight => Color::Rgb(0x60, 0xa5, 0xfa),
            PrimaryDark => Color::Rgb(0x25, 0x63, 0xeb),
            Secondary | TimelinePast => Color::Rgb(0x64, 0x74, 0x8b),
            NavItemActiveText => Color::Rgb(0xff, 0xff, 0xff),
            TimelineCurrent | NoticeSuccess => Color::Rgb(0x10, 0xb9, 0x81),
            NoticeError | FieldError => Color::Rgb(0xdc, 0x26, 0x26),
        },
        ThemeMode::Dark => match token {
            Background | NavBackground => Color::Rgb(0x0f, 0x17, 0x2a),
            Paper => Color::Rgb(0x1e, 0x29, 0x3b),
            Divider => Color::Rgb(0x33, 0x41, 0x55),
            TextPrimary => Color::Rgb(0xf1, 0xf5, 0xf9),
            TextSecondary | NavItemText | Secondary => Color::Rgb(0x94, 0xa3, 0xb8),
            Primary | NavItemActive | TimelineRecent => Color::Rgb(0x3b, 0x82, 0xf6),
            PrimaryLight => Color::Rgb(0x60, 0xa5, 0xfa),
            PrimaryDark => Color::Rgb(0x25, 0x63, 0xeb),
            TimelinePast => Color::Rgb(0x64, 0x74, 0x8b),
            NavItemActiveText => Color::Rgb(0xff, 0xff, 0xff),
            TimelineCurrent => Color::Rgb(0x10, 0xb9, 0x81),
            NoticeSuccess => Color::Rgb(0x34, 0xd3, 0x99),
            NoticeError | FieldError => Color::Rgb(0xf8, 0x71, 0x71),
        },
    }
}

pub fn run(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_tick = Instant::now();
    let mut last_poll = Instant::now();
    app.poll_scheme();

    while !app.should_quit() {
        let now = Instant::now();
        app.tick(now, now.duration_since(last_tick));
        last_tick = now;
        if now.duration_since(last_poll) >= SCHEME_POLL {
            app.poll_scheme();
            last_poll = now;
        }

        terminal.draw(|frame| draw(frame, app))?;

        let timeout = if app.is_animating() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(250)
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, Instant::now());
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        app.handle_key(KeyCode::Down.into(), Instant::now());
                    }
                    MouseEventKind::ScrollUp => {
                        app.handle_key(KeyCode::Up.into(), Instant::now());
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let mode = app.mode();
    let style = |token| Style::default().fg(color(token, mode));

    let nav_area = Rect::new(area.x, area.y, area.width, 1);
    let status_area = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    let doc_area = Rect::new(
        area.x,
        area.y + 1,
        area.width,
        area.height.saturating_sub(2),
    );

    let doc = app.layout(doc_area.width.saturating_sub(4), doc_area.height);
    let visible: Vec<Line> = doc
        .lines
        .into_iter()
        .skip(app.scroll())
        .take(usize::from(doc_area.height))
        .collect();
    let page = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::NONE)
            .padding(ratatui::widgets::Padding::horizontal(2))
            .style(Style::default().bg(color(ThemeToken::Background, mode))),
    );
    frame.render_widget(page, doc_area);

    // Nav bar
    let active = app.active();
    let narrow = area.width < DRAWER_BREAKPOINT;
    let mut spans = vec![Span::styled(
        format!(" {} ", app.config().name),
        style(ThemeToken::TextPrimary).add_modifier(Modifier::BOLD),
    )];
    if narrow {
        spans.push(Span::styled(" ≡ m ", style(ThemeToken::NavItemText)));
    } else {
        for (i, entry) in app.nav_entries(&active).into_iter().enumerate() {
            let item_style = if entry.highlighted {
                Style::default()
                    .fg(color(ThemeToken::NavItemActiveText, mode))
                    .bg(color(ThemeToken::NavItemActive, mode))
            } else {
                style(ThemeToken::NavItemText)
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!(" {} {} ", i + 1, entry.label), item_style));
        }
    }
    let theme_hint = match mode {
        ThemeMode::Dark => " ☀ t ",
        ThemeMode::Light => " ☾ t ",
    };
    spans.push(Span::raw("  "));
    spans.push(Span::styled(theme_hint, style(ThemeToken::Primary)));
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(color(ThemeToken::NavBackground, mode))),
        nav_area,
    );

    if narrow && app.is_drawer_open() {
        let entries = app.nav_entries(&active);
        let height = u16::try_from(entries.len()).unwrap_or(u16::MAX).saturating_add(2);
        let drawer = Rect::new(
            area.x,
            doc_area.y,
            24.min(area.width),
            height.min(doc_area.height),
        );
        let lines: Vec<Line> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let item_style = if entry.highlighted {
                    style(ThemeToken::NavItemActive).add_modifier(Modifier::BOLD)
                } else {
                    style(ThemeToken::NavItemText)
                };
                Line::from(Span::styled(format!("{} {}", i + 1, entry.label), item_style))
            })
            .collect();
        frame.render_widget(Clear, drawer);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style(ThemeToken::Divider))
                    .style(Style::default().bg(color(ThemeToken::Paper, mode))),
            ),
            drawer,
        );
    }

    // Status bar
    let help = match app.focus() {
        Focus::Page => {
            let origin = if app.follows_system() { "system" } else { "chosen" };
            format!(
                " Tab/S-Tab sections · 1-9 jump · n next · c contact · \
                 t theme ({origin}) · s system · q quit "
            )
        }
        Focus::Form(_) => " Tab next field · Enter send · Esc leave form ".to_string(),
    };
    frame.render_widget(
        Paragraph::new(help).style(
            Style::default()
                .fg(color(ThemeToken::TextSecondary, mode))
                .bg(color(ThemeToken::Paper, mode)),
        ),
        status_area,
    );

    // Notice
    if let Some(notice) = app.notice() {
        let fill = match notice.severity {
            Severity::Success => ThemeToken::NoticeSuccess,
            Severity::Error => ThemeToken::NoticeError,
        };
        let text = format!(" {}  (x) ", notice.message);
        let width = u16::try_from(text.chars().count())
            .unwrap_or(u16::MAX)
            .min(area.width);
        let notice_area = Rect::new(
            area.x + (area.width - width) / 2,
            status_area.y.saturating_sub(2),
            width,
            1,
        );
        frame.render_widget(Clear, notice_area);
        frame.render_widget(
            Paragraph::new(text).style(
                Style::default()
                    .fg(Color::White)
                    .bg(color(fill, mode)),
            ),
            notice_area,
        );
    }
}
