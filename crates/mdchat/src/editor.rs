//! Hand-off to `$EDITOR`.

use std::io;
use std::path::Path;

/// Replaces the current process with `$EDITOR <path>`. Returns only on
/// failure.
#[cfg(unix)]
pub fn open_in_editor(path: &Path) -> io::Error {
    use std::os::unix::process::CommandExt;
    use std::process::Command;

    let editor = match std::env::var("EDITOR") {
        Ok(editor) if !editor.trim().is_empty() => editor,
        _ => return io::Error::other("$EDITOR is not set"),
    };

    Command::new(editor).arg(path).exec()
}

#[cfg(not(unix))]
pub fn open_in_editor(_path: &Path) -> io::Error {
    io::Error::other("--editor is only supported on unix")
}
