//! Terminal styling for rendered markdown.
//!
//! A theme is a bundle of boxed style closures so callers can swap palettes
//! without the renderer knowing about color handling.

use crate::config::EnvConfig;

pub type MarkdownStyleFn = Box<dyn Fn(&str) -> String>;

/// Optional syntax highlighter for fenced code blocks. Receives the code and
/// the fence language tag, returns styled lines.
pub type CodeHighlighterFn = Box<dyn Fn(&str, Option<&str>) -> Vec<String>>;

pub struct MarkdownTheme {
    pub heading: MarkdownStyleFn,
    pub link: MarkdownStyleFn,
    pub link_url: MarkdownStyleFn,
    pub code: MarkdownStyleFn,
    pub code_block: MarkdownStyleFn,
    pub code_block_border: MarkdownStyleFn,
    pub quote: MarkdownStyleFn,
    pub quote_border: MarkdownStyleFn,
    pub hr: MarkdownStyleFn,
    pub list_bullet: MarkdownStyleFn,
    pub bold: MarkdownStyleFn,
    pub italic: MarkdownStyleFn,
    pub strikethrough: MarkdownStyleFn,
    pub underline: MarkdownStyleFn,
    pub highlight_code: Option<CodeHighlighterFn>,
}

/// Palette family picked to suit the terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Resolution order: explicit override, `COLORFGBG` background field,
    /// dark as the fallback.
    #[must_use]
    pub fn detect(config: &EnvConfig) -> Self {
        if let Some(name) = config.theme_override.as_deref() {
            match name.trim().to_ascii_lowercase().as_str() {
                "light" => return Self::Light,
                "dark" => return Self::Dark,
                _ => {}
            }
        }

        if let Some(colorfgbg) = config.colorfgbg.as_deref() {
            if let Some(variant) = variant_from_colorfgbg(colorfgbg) {
                return variant;
            }
        }

        Self::Dark
    }

    /// Name of the bundled syntect theme matching this variant.
    #[must_use]
    pub fn syntect_theme_name(self) -> &'static str {
        match self {
            Self::Dark => "base16-eighties.dark",
            Self::Light => "InspiredGitHub",
        }
    }
}

/// The background color is the last `;`-separated field. Values 7 and 9..=15
/// are the light half of the standard palette.
fn variant_from_colorfgbg(value: &str) -> Option<ThemeVariant> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    if bg == 7 || bg >= 9 {
        Some(ThemeVariant::Light)
    } else {
        Some(ThemeVariant::Dark)
    }
}

fn ansi_wrap(text: &str, prefix: &str, suffix: &str) -> String {
    format!("{prefix}{text}{suffix}")
}

fn dim(text: &str) -> String {
    ansi_wrap(text, "\x1b[2m", "\x1b[22m")
}

fn bold(text: &str) -> String {
    ansi_wrap(text, "\x1b[1m", "\x1b[22m")
}

fn blue(text: &str) -> String {
    ansi_wrap(text, "\x1b[34m", "\x1b[39m")
}

fn cyan(text: &str) -> String {
    ansi_wrap(text, "\x1b[36m", "\x1b[39m")
}

fn yellow(text: &str) -> String {
    ansi_wrap(text, "\x1b[33m", "\x1b[39m")
}

fn green(text: &str) -> String {
    ansi_wrap(text, "\x1b[32m", "\x1b[39m")
}

fn magenta(text: &str) -> String {
    ansi_wrap(text, "\x1b[35m", "\x1b[39m")
}

fn underline(text: &str) -> String {
    ansi_wrap(text, "\x1b[4m", "\x1b[24m")
}

fn italic(text: &str) -> String {
    ansi_wrap(text, "\x1b[3m", "\x1b[23m")
}

fn strikethrough(text: &str) -> String {
    ansi_wrap(text, "\x1b[9m", "\x1b[29m")
}

impl MarkdownTheme {
    /// Base palette for the variant, without a code highlighter wired in.
    #[must_use]
    pub fn for_variant(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self {
                heading: Box::new(cyan),
                link: Box::new(blue),
                link_url: Box::new(dim),
                code: Box::new(yellow),
                code_block: Box::new(green),
                code_block_border: Box::new(dim),
                quote: Box::new(italic),
                quote_border: Box::new(dim),
                hr: Box::new(dim),
                list_bullet: Box::new(cyan),
                bold: Box::new(bold),
                italic: Box::new(italic),
                strikethrough: Box::new(strikethrough),
                underline: Box::new(underline),
                highlight_code: None,
            },
            ThemeVariant::Light => Self {
                heading: Box::new(blue),
                link: Box::new(blue),
                link_url: Box::new(dim),
                code: Box::new(magenta),
                code_block: Box::new(green),
                code_block_border: Box::new(dim),
                quote: Box::new(italic),
                quote_border: Box::new(dim),
                hr: Box::new(dim),
                list_bullet: Box::new(blue),
                bold: Box::new(bold),
                italic: Box::new(italic),
                strikethrough: Box::new(strikethrough),
                underline: Box::new(underline),
                highlight_code: None,
            },
        }
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: CodeHighlighterFn) -> Self {
        self.highlight_code = Some(highlighter);
        self
    }
}
