//! Streaming markdown rendering for terminals.
//!
//! Invariant: the renderer is stateless — every fragment triggers a re-render
//! of the whole accumulated reply, and `AnsiPrinter` redraws it in place with
//! a save/restore-cursor protocol.
//!
//! # Public API Overview
//! - Feed reply fragments to a [`Printer`] built by [`new_printer`].
//! - Render accumulated markdown directly with [`render`].
//! - Pick styling with [`MarkdownTheme`] and [`ThemeVariant`].
//! - Use ANSI-safe width and wrap helpers for custom layouts.

pub mod ansi;
pub mod config;
pub mod markdown;
pub mod printer;
pub mod term;
pub mod theme;
pub mod wrap;

pub use crate::config::EnvConfig;

pub use crate::markdown::{prewarm_highlighting, render, syntect_highlighter, RenderError};

pub use crate::printer::{new_printer, AnsiPrinter, MarkdownFormatter, PlainPrinter, Printer};

pub use crate::term::{is_terminal, terminal_width, STDIN_FD, STDOUT_FD};

pub use crate::theme::{CodeHighlighterFn, MarkdownStyleFn, MarkdownTheme, ThemeVariant};

pub use crate::wrap::{visible_width, wrap_styled};
