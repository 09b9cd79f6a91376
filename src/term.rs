//! OS-level terminal capability probes.

#[cfg(unix)]
use libc::c_int;

/// File descriptor of the process stdout.
pub const STDOUT_FD: i32 = 1;
/// File descriptor of the process stdin.
pub const STDIN_FD: i32 = 0;

/// Returns whether `fd` is attached to an interactive terminal device.
#[must_use]
pub fn is_terminal(fd: i32) -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(fd as c_int) == 1 }
    }
    #[cfg(not(unix))]
    {
        let _ = fd;
        false
    }
}

/// Probed terminal column count, when `fd` is a sized terminal.
#[must_use]
pub fn terminal_width(fd: i32) -> Option<usize> {
    read_winsize(fd).map(|(cols, _rows)| usize::from(cols))
}

#[cfg(unix)]
fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
fn read_winsize(_fd: i32) -> Option<(u16, u16)> {
    None
}
