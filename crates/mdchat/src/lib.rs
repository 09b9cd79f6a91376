//! Markdown-transcript chat CLI.

pub mod app;
pub mod args;
pub mod editor;
pub mod providers;
