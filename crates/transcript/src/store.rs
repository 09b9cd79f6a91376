use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::TranscriptError;
use crate::parser::parse;
use crate::turn::{Conversation, Role, Turn};
use crate::writer::TranscriptWriter;

/// A conversation bound to its backing transcript file.
///
/// Opening parses whatever the file already holds; all mutation is
/// append-only through the same handle. Exactly one store per file per
/// process invocation is assumed — there is no locking.
pub struct TranscriptStore {
    path: PathBuf,
    conversation: Conversation,
    writer: TranscriptWriter<File>,
}

impl TranscriptStore {
    /// Opens or creates the transcript at `path` and parses existing turns.
    ///
    /// Open and read failures are fatal to the invocation; malformed content
    /// is not (it degrades to a best-effort parse).
    pub fn open(path: &Path) -> Result<Self, TranscriptError> {
        let path = path.to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| TranscriptError::io("opening transcript file", &path, source))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| TranscriptError::io("reading transcript file", &path, source))?;
        let conversation = parse(&String::from_utf8_lossy(&bytes));

        Ok(Self {
            path,
            conversation,
            writer: TranscriptWriter::new(file),
        })
    }

    /// Removes a transcript file. Missing files are not an error.
    pub fn remove(path: &Path) -> Result<(), TranscriptError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TranscriptError::io("removing transcript file", path, source)),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Appends a system turn to memory and disk. Discarded when the trimmed
    /// content is empty; returns whether a turn was stored.
    pub fn append_system(&mut self, content: &str) -> Result<bool, TranscriptError> {
        self.append(Role::System, content)
    }

    /// Appends a user turn to memory and disk, as [`Self::append_system`].
    pub fn append_user(&mut self, content: &str) -> Result<bool, TranscriptError> {
        self.append(Role::User, content)
    }

    fn append(&mut self, role: Role, content: &str) -> Result<bool, TranscriptError> {
        let Some(turn) = self.conversation.append(role, content) else {
            return Ok(false);
        };
        let turn = turn.clone();
        self.write_turn(&turn)?;
        Ok(true)
    }

    fn write_turn(&mut self, turn: &Turn) -> Result<(), TranscriptError> {
        self.writer
            .write_turn(turn)
            .map_err(|source| TranscriptError::io("writing turn", &self.path, source))
    }

    /// Opens the streamed assistant section. Content arrives through
    /// [`Self::append_fragment`]; the in-memory conversation is not touched.
    pub fn begin_assistant_turn(&mut self) -> Result<(), TranscriptError> {
        self.writer
            .write_heading(Role::Assistant)
            .map_err(|source| TranscriptError::io("writing heading", &self.path, source))
    }

    /// Persists one streamed fragment immediately.
    pub fn append_fragment(&mut self, text: &str) -> Result<(), TranscriptError> {
        self.writer
            .write_fragment(text)
            .map_err(|source| TranscriptError::io("writing fragment", &self.path, source))
    }

    /// Closes the streamed section, restoring the blank-separator invariant.
    pub fn finalize_turn(&mut self) -> Result<(), TranscriptError> {
        self.writer
            .finalize()
            .map_err(|source| TranscriptError::io("finalizing turn", &self.path, source))
    }
}
