//! Append-only serialization of turns and streamed fragments.
//!
//! Emits exactly the vocabulary the parser reads back. Every call flushes the
//! underlying handle so a crash mid-stream loses at most the last unflushed
//! fragment, never the transcript.

use std::io::{self, Write};

use crate::turn::{Role, Turn};

pub struct TranscriptWriter<W: Write> {
    out: W,
}

impl<W: Write> TranscriptWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Emits a complete turn: role marker, blank line, trimmed content,
    /// trailing blank separator.
    pub fn write_turn(&mut self, turn: &Turn) -> io::Result<()> {
        write!(self.out, "# {}\n\n{}\n\n", turn.role, turn.content)?;
        self.out.flush()
    }

    /// Opens a turn whose content will arrive incrementally.
    pub fn write_heading(&mut self, role: Role) -> io::Result<()> {
        write!(self.out, "# {role}\n\n")?;
        self.out.flush()
    }

    /// Emits one streamed fragment with no framing.
    pub fn write_fragment(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    /// Closes a streamed turn with the blank separator every turn carries
    /// before the next role marker.
    pub fn finalize(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n\n")?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
