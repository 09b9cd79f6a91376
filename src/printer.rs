//! Streaming output sinks.
//!
//! `AnsiPrinter` re-renders the whole accumulated reply on every fragment and
//! redraws it in place, so partially received markdown constructs settle into
//! their final form as more of the stream arrives. `PlainPrinter` passes
//! fragments through untouched for pipes and dumb terminals.

use std::io::{self, Write};

use crate::config::EnvConfig;
use crate::markdown::{self, RenderError};
use crate::term::{is_terminal, terminal_width, STDOUT_FD};
use crate::theme::{MarkdownTheme, ThemeVariant};

/// Saves the cursor position in both the legacy and CSI encodings, so either
/// kind of terminal honors at least one of them.
const SAVE_CURSOR: &str = "\x1b7\x1b[s";
/// Restores the saved cursor position, both encodings again.
const RESTORE_CURSOR: &str = "\x1b8\x1b[u";
/// Clears from the cursor to the end of the screen.
const CLEAR_TO_END: &str = "\x1b[0J";

const FALLBACK_WIDTH: usize = 80;
const MIN_WIDTH: usize = 20;

/// Renders accumulated markdown into styled lines for a given width.
pub type MarkdownFormatter = Box<dyn Fn(&str, usize) -> Result<Vec<String>, RenderError>>;

/// A sink for streamed reply fragments.
pub trait Printer {
    /// Accepts the next fragment and updates the display.
    fn print(&mut self, fragment: &str) -> io::Result<()>;

    /// Ends the reply, leaving the cursor on a fresh line.
    fn close(&mut self) -> io::Result<()>;
}

/// Pass-through sink: fragments go out byte for byte as they arrive.
pub struct PlainPrinter<W: Write> {
    out: W,
}

impl<W: Write> PlainPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Printer for PlainPrinter<W> {
    fn print(&mut self, fragment: &str) -> io::Result<()> {
        self.out.write_all(fragment.as_bytes())?;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// In-place redraw sink for interactive terminals.
pub struct AnsiPrinter<W: Write> {
    out: W,
    formatter: MarkdownFormatter,
    width: usize,
    buffer: String,
    drawn: bool,
}

impl<W: Write> AnsiPrinter<W> {
    pub fn new(out: W, width: usize, formatter: MarkdownFormatter) -> Self {
        Self {
            out,
            formatter,
            width: width.max(1),
            buffer: String::new(),
            drawn: false,
        }
    }

    /// Full text received so far.
    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Printer for AnsiPrinter<W> {
    fn print(&mut self, fragment: &str) -> io::Result<()> {
        self.buffer.push_str(fragment);

        // A formatter failure skips this redraw; the fragment stays in the
        // buffer and the next one retries with more of the stream.
        let Ok(lines) = (self.formatter)(&self.buffer, self.width) else {
            return Ok(());
        };

        if self.drawn {
            self.out.write_all(RESTORE_CURSOR.as_bytes())?;
            self.out.write_all(CLEAR_TO_END.as_bytes())?;
        } else {
            self.out.write_all(SAVE_CURSOR.as_bytes())?;
            self.drawn = true;
        }

        self.out.write_all(lines.join("\r\n").as_bytes())?;
        self.out.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.write_all(b"\r\n")?;
        self.out.flush()
    }
}

/// Builds the sink for the process stdout: the in-place renderer when stdout
/// is an interactive terminal and nothing forces plain output, the
/// pass-through sink otherwise.
pub fn new_printer(config: &EnvConfig) -> Box<dyn Printer> {
    if config.force_plain || !is_terminal(STDOUT_FD) {
        return Box::new(PlainPrinter::new(io::stdout()));
    }

    let variant = ThemeVariant::detect(config);
    let theme = MarkdownTheme::for_variant(variant)
        .with_highlighter(markdown::syntect_highlighter(variant));
    let formatter: MarkdownFormatter =
        Box::new(move |text, width| markdown::render(text, width, &theme));

    let width = terminal_width(STDOUT_FD)
        .unwrap_or(FALLBACK_WIDTH)
        .max(MIN_WIDTH);
    Box::new(AnsiPrinter::new(io::stdout(), width, formatter))
}
