//! Color theme for the TUI.
//!
//! Dark and light themes over a semantic palette based on Tailwind CSS colors.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Theme variant (dark or light).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// The other variant.
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Current theme variant.
    pub variant: ThemeVariant,

    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    pub selected: Style,

    // Status colors
    pub success: Color,
    pub error: Color,
    pub info: Color,

    // Chrome
    pub border: Style,
    pub title: Style,
    pub help_key: Style,
    pub help_desc: Style,
    pub header: Style,
    pub footer: Style,

    // Group list
    pub group: Style,
    pub member: Style,
    pub count: Style,
    pub tree_lines: Style,
    pub marked: Style,

    // Scan gauge
    pub progress_bar: Style,
    pub progress_bg: Style,
}

/// Tailwind shades a theme is built from, ordered from page to ink.
struct Palette {
    page: Color,
    surface: Color,
    raised: Color,
    line: Color,
    dim: Color,
    soft_ink: Color,
    ink: Color,
    strong_ink: Color,
    accent: Color,
    accent_strong: Color,
    ok: Color,
    bad: Color,
    count: Color,
    mark: Color,
}

const SLATE_50: Color = Color::Rgb(248, 250, 252);
const SLATE_100: Color = Color::Rgb(241, 245, 249);
const SLATE_200: Color = Color::Rgb(226, 232, 240);
const SLATE_300: Color = Color::Rgb(203, 213, 225);
const SLATE_400: Color = Color::Rgb(148, 163, 184);
const SLATE_500: Color = Color::Rgb(100, 116, 139);
const SLATE_600: Color = Color::Rgb(71, 85, 105);
const SLATE_700: Color = Color::Rgb(51, 65, 85);
const SLATE_800: Color = Color::Rgb(30, 41, 59);
const SLATE_900: Color = Color::Rgb(15, 23, 42);

impl Theme {
    /// Dark theme using a slate-based palette.
    pub fn dark() -> Self {
        Self::from_palette(
            ThemeVariant::Dark,
            Palette {
                page: SLATE_900,
                surface: SLATE_800,
                raised: SLATE_700,
                line: SLATE_600,
                dim: SLATE_500,
                soft_ink: SLATE_400,
                ink: SLATE_300,
                strong_ink: SLATE_100,
                accent: Color::Rgb(96, 165, 250),
                accent_strong: Color::Rgb(59, 130, 246),
                ok: Color::Rgb(34, 197, 94),
                bad: Color::Rgb(239, 68, 68),
                count: Color::Rgb(249, 115, 22),
                mark: Color::Rgb(245, 158, 11),
            },
        )
    }

    /// Light theme using a slate-based palette.
    pub fn light() -> Self {
        // Darker accents for contrast on a light background
        Self::from_palette(
            ThemeVariant::Light,
            Palette {
                page: SLATE_50,
                surface: SLATE_100,
                raised: SLATE_200,
                line: SLATE_400,
                dim: SLATE_500,
                soft_ink: SLATE_600,
                ink: SLATE_700,
                strong_ink: SLATE_900,
                accent: Color::Rgb(37, 99, 235),
                accent_strong: Color::Rgb(29, 78, 216),
                ok: Color::Rgb(22, 163, 74),
                bad: Color::Rgb(220, 38, 38),
                count: Color::Rgb(234, 88, 12),
                mark: Color::Rgb(217, 119, 6),
            },
        )
    }

    fn from_palette(variant: ThemeVariant, p: Palette) -> Self {
        let bold = |color: Color| Style::new().fg(color).add_modifier(Modifier::BOLD);
        let heading = match variant {
            ThemeVariant::Dark => p.accent,
            ThemeVariant::Light => p.accent_strong,
        };

        Self {
            variant,
            background: p.page,
            foreground: p.strong_ink,
            muted: p.dim,
            selected: Style::new()
                .bg(p.raised)
                .fg(match variant {
                    ThemeVariant::Dark => SLATE_50,
                    ThemeVariant::Light => SLATE_900,
                })
                .add_modifier(Modifier::BOLD),
            success: p.ok,
            error: p.bad,
            info: p.accent,
            border: Style::new().fg(p.line),
            title: bold(heading),
            help_key: bold(heading),
            help_desc: Style::new().fg(p.soft_ink),
            header: Style::new().bg(p.surface).fg(p.strong_ink),
            footer: Style::new().bg(p.surface).fg(p.soft_ink),
            group: bold(p.accent_strong),
            member: Style::new().fg(p.ink),
            count: Style::new().fg(p.count),
            tree_lines: Style::new().fg(p.line),
            marked: bold(p.mark),
            progress_bar: Style::new().fg(p.accent_strong),
            progress_bg: Style::new().fg(p.raised),
        }
    }

    /// Create theme from variant.
    pub fn from_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self::dark(),
            ThemeVariant::Light => Self::light(),
        }
    }

    /// Toggle between dark and light themes.
    pub fn toggle(&self) -> Self {
        Self::from_variant(self.variant.toggle())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
