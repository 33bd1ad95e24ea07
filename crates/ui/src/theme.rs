use folio_protocol::{ThemeMode, ThemeToken};

/// Resolved RGBA color for egui rendering.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ResolvedColor {
    const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

pub fn resolve(token: ThemeToken, mode: ThemeMode) -> egui::Color32 {
    match mode {
        ThemeMode::Dark => resolve_dark(token),
        ThemeMode::Light => resolve_light(token),
    }
    .to_color32()
}

fn resolve_light(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0xff, 0xff, 0xff),
        Paper => ResolvedColor::rgb(0xf8, 0xfa, 0xfc),
        Divider => ResolvedColor::rgb(0xe2, 0xe8, 0xf0),

        TextPrimary => ResolvedColor::rgb(0x0f, 0x17, 0x2a),
        TextSecondary => ResolvedColor::rgb(0x47, 0x55, 0x69),

        Primary => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        PrimaryLight => ResolvedColor::rgb(0x60, 0xa5, 0xfa),
        PrimaryDark => ResolvedColor::rgb(0x25, 0x63, 0xeb),
        Secondary => ResolvedColor::rgb(0x64, 0x74, 0x8b),

        NavBackground => ResolvedColor::rgba(0xff, 0xff, 0xff, 204),
        NavItemActive => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        NavItemActiveText => ResolvedColor::rgb(0xff, 0xff, 0xff),
        NavItemText => ResolvedColor::rgb(0x47, 0x55, 0x69),

        TimelineCurrent => ResolvedColor::rgb(0x10, 0xb9, 0x81),
        TimelineRecent => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        TimelinePast => ResolvedColor::rgb(0x64, 0x74, 0x8b),

        NoticeSuccess => ResolvedColor::rgb(0x10, 0xb9, 0x81),
        NoticeError => ResolvedColor::rgb(0xdc, 0x26, 0x26),
        FieldError => ResolvedColor::rgb(0xdc, 0x26, 0x26),
    }
}

fn resolve_dark(token: ThemeToken) -> ResolvedColor {
    use ThemeToken::*;
    match token {
        Background => ResolvedColor::rgb(0x0f, 0x17, 0x2a),
        Paper => ResolvedColor::rgb(0x1e, 0x29, 0x3b),
        Divider => ResolvedColor::rgb(0x33, 0x41, 0x55),

        TextPrimary => ResolvedColor::rgb(0xf1, 0xf5, 0xf9),
        TextSecondary => ResolvedColor::rgb(0x94, 0xa3, 0xb8),

        Primary => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        PrimaryLight => ResolvedColor::rgb(0x60, 0xa5, 0xfa),
        PrimaryDark => ResolvedColor::rgb(0x25, 0x63, 0xeb),
        Secondary => ResolvedColor::rgb(0x94, 0xa3, 0xb8),

        NavBackground => ResolvedColor::rgba(0x0f, 0x17, 0x2a, 204),
        NavItemActive => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        NavItemActiveText => ResolvedColor::rgb(0xff, 0xff, 0xff),
        NavItemText => ResolvedColor::rgb(0x94, 0xa3, 0xb8),

        // Tone colors read on both backgrounds.
        TimelineCurrent => ResolvedColor::rgb(0x10, 0xb9, 0x81),
        TimelineRecent => ResolvedColor::rgb(0x3b, 0x82, 0xf6),
        TimelinePast => ResolvedColor::rgb(0x64, 0x74, 0x8b),

        NoticeSuccess => ResolvedColor::rgb(0x34, 0xd3, 0x99),
        NoticeError => ResolvedColor::rgb(0xf8, 0x71, 0x71),
        FieldError => ResolvedColor::rgb(0xf8, 0x71, 0x71),
    }
}

// ── Typography scale ───────────────────────────────────────────────────────

pub const FONT_DISPLAY: f32 = 40.0;
pub const FONT_TITLE: f32 = 26.0;
pub const FONT_EMPHASIS: f32 = 17.0;
pub const FONT_BODY: f32 = 15.0;
pub const FONT_CAPTION: f32 = 12.0;

// ── egui visual presets ────────────────────────────────────────────────────

pub fn visuals(mode: ThemeMode) -> egui::Visuals {
    let color = |token| resolve(token, mode);
    let mut v = match mode {
        ThemeMode::Dark => egui::Visuals::dark(),
        ThemeMode::Light => egui::Visuals::light(),
    };
    v.panel_fill = color(ThemeToken::Background);
    v.window_fill = color(ThemeToken::Paper);
    v.extreme_bg_color = color(ThemeToken::Paper);
    v.faint_bg_color = color(ThemeToken::Paper);
    v.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, color(ThemeToken::Divider));
    v.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, color(ThemeToken::TextSecondary));
    v.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, color(ThemeToken::TextPrimary));
    v.widgets.active.bg_fill = color(ThemeToken::Primary);
    v.widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    v.selection.bg_fill = color(ThemeToken::PrimaryLight).gamma_multiply(0.4);
    v.selection.stroke = egui::Stroke::new(1.0, color(ThemeToken::Primary));
    v.hyperlink_color = color(ThemeToken::Primary);
    v.error_fg_color = color(ThemeToken::FieldError);
    v.window_corner_radius = egui::CornerRadius::same(12);
    v.widgets.noninteractive.corner_radius = egui::CornerRadius::same(8);
    v.widgets.inactive.corner_radius = egui::CornerRadius::same(8);
    v.widgets.hovered.corner_radius = egui::CornerRadius::same(8);
    v.widgets.active.corner_radius = egui::CornerRadius::same(8);
    v
}

/// Install the palette for `mode` and pin egui to it, so egui's own
/// system-theme following never overrides the controller.
pub fn apply(ctx: &egui::Context, mode: ThemeMode) {
    let theme = match mode {
        ThemeMode::Dark => egui::Theme::Dark,
        ThemeMode::Light => egui::Theme::Light,
    };
    ctx.set_visuals_of(theme, visuals(mode));
    ctx.set_theme(theme);
}

pub fn apply_typography(ctx: &egui::Context) {
    ctx.all_styles_mut(|style| {
        style
            .text_styles
            .insert(egui::TextStyle::Heading, egui::FontId::proportional(FONT_TITLE));
        style
            .text_styles
            .insert(egui::TextStyle::Body, egui::FontId::proportional(FONT_BODY));
        style
            .text_styles
            .insert(egui::TextStyle::Button, egui::FontId::proportional(FONT_BODY));
        style
            .text_styles
            .insert(egui::TextStyle::Small, egui::FontId::proportional(FONT_CAPTION));
        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
    });
}
