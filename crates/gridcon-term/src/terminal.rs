// SPDX-License-Identifier: MIT
//
// Terminal devices — the byte pipe the console draws through.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd reads and writes.
// These are the standard POSIX interfaces for terminal control; there is no
// safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// The console only needs five things from a device: write bytes, read
// whatever input is pending, flush, and report width and height. That is
// the `Terminal` trait. Four implementations live here:
//
//   RawTerminal     the process's own tty, switched to non-canonical,
//                   no-echo input with a bounded read timeout. The saved
//                   termios is restored exactly once, on drop or by the
//                   panic hook, whichever comes first.
//   WriterTerminal  any `io::Write` (stdout, a file, a pipe) with a fixed
//                   size and no input; for dumping frames when there is no
//                   tty to drive.
//   NullTerminal    accepts everything, never has input.
//   MemoryTerminal  records output and replays scripted input; used by the
//                   tests to look at exactly what a flush produced.
//
// The panic hook writes a pre-built restore sequence straight to fd 1,
// bypassing Rust's stdout lock. A panic mid-flush can happen while that lock
// is held, and going through `io::stdout()` there would deadlock.

use std::collections::VecDeque;
use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use log::debug;

use crate::error::{Error, Result};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl Size {
    /// Size assumed when the device cannot be asked.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

impl Default for Size {
    fn default() -> Self {
        Self::FALLBACK
    }
}

// ─── Terminal Trait ─────────────────────────────────────────────────────────

/// A byte-oriented terminal device.
pub trait Terminal {
    /// Write all of `bytes`. Returns the number written, which is always
    /// `bytes.len()` on success.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the device fails, [`Error::ShortWrite`] if it stops
    /// accepting bytes part-way.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;

    /// Replace the contents of `buf` with whatever input is available.
    /// Returns `Ok(false)` (and leaves `buf` empty) if nothing arrived
    /// within the device's read timeout.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the device fails.
    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool>;

    /// Push any device-side buffering out.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the device fails.
    fn flush(&mut self) -> Result<()>;

    /// Width in columns.
    fn width(&self) -> u16;

    /// Height in rows.
    fn height(&self) -> u16;

    /// Both dimensions.
    fn size(&self) -> Size {
        Size {
            cols: self.width(),
            rows: self.height(),
        }
    }
}

impl<T: Terminal + ?Sized> Terminal for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        (**self).read(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn width(&self) -> u16 {
        (**self).width()
    }

    fn height(&self) -> u16 {
        (**self).height()
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Saved termios for the panic hook, which cannot reach the `RawTerminal`.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Take the saved termios out of the backup. Whoever gets `Some` owns the
/// restore; everyone after gets `None`.
#[cfg(unix)]
fn take_termios_backup() -> Option<libc::termios> {
    TERMIOS_BACKUP
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .take()
}

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Some(original) = take_termios_backup() {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original);
        }
    }
}

/// Reset SGR, leave the alternate screen, show the cursor.
///
/// Alternate screen exit comes before the cursor so the restored shell
/// content is what the cursor reappears on.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[0m\x1b[?1049l\x1b[?25h";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install (once per process) a panic hook that puts the tty back before
/// the original hook prints the panic message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── RawTerminal ────────────────────────────────────────────────────────────

/// Input chunk size for a single read. A keypress is 1-6 bytes; a paste
/// can be more, and the rest arrives on the next read.
const READ_BUF_SIZE: usize = 4096;

/// Default read timeout in deciseconds (100 ms).
pub const DEFAULT_READ_TIMEOUT_DS: u8 = 1;

/// The process's controlling terminal in non-canonical, no-echo mode.
///
/// Reads return after at most the configured timeout, with or without data
/// (`VMIN = 0`, `VTIME = timeout`). The original mode comes back when the
/// handle is dropped, and from the panic hook if a panic gets there first.
///
/// ```no_run
/// use gridcon_term::terminal::{RawTerminal, Terminal};
///
/// let mut term = RawTerminal::new()?;
/// term.write(b"hello")?;
/// term.flush()?;
/// # Ok::<(), gridcon_term::error::Error>(())
/// ```
pub struct RawTerminal {
    /// Termios saved before switching modes; `None` once restored.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Cached size, refresh with [`refresh_size`](Self::refresh_size).
    size: Size,

    read_timeout_ds: u8,
}

impl RawTerminal {
    /// Switch the tty with the default 100 ms read timeout.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if stdin is not a tty, [`Error::Io`] if the
    /// mode change fails.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_READ_TIMEOUT_DS)
    }

    /// Switch the tty with a read timeout of `deciseconds` tenths of a
    /// second. Zero makes reads fully non-blocking.
    ///
    /// # Errors
    ///
    /// [`Error::NotATerminal`] if stdin is not a tty, [`Error::Io`] if the
    /// mode change fails.
    pub fn with_timeout(deciseconds: u8) -> Result<Self> {
        if !is_tty() {
            return Err(Error::NotATerminal);
        }

        install_panic_hook();

        let mut term = Self {
            #[cfg(unix)]
            original_termios: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            read_timeout_ds: deciseconds,
        };
        term.enable_raw_mode()?;
        debug!(
            "raw mode on: {}x{}, read timeout {}ds",
            term.size.cols, term.size.rows, deciseconds
        );
        Ok(term)
    }

    /// The configured read timeout in deciseconds.
    #[inline]
    #[must_use]
    pub const fn read_timeout_ds(&self) -> u8 {
        self.read_timeout_ds
    }

    /// Re-query the size from the OS and cache it. Keeps the old value if
    /// the query fails.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(s) = get_size() {
            if s != self.size {
                debug!("terminal resized to {}x{}", s.cols, s.rows);
            }
            self.size = s;
        }
        self.size
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> Result<()> {
        let fd = libc::STDIN_FILENO;

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error().into());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            termios.c_lflag &= !(libc::ECHO | libc::ICANON);
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = self.read_timeout_ds;

            if libc::tcsetattr(fd, libc::TCSANOW, &raw const termios) != 0 {
                return Err(io::Error::last_os_error().into());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn enable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> Result<()> {
        let Some(original) = self.original_termios.take() else {
            return Ok(());
        };
        // An empty backup means the panic hook already put the mode back.
        if take_termios_backup().is_none() {
            debug!("raw mode already restored");
            return Ok(());
        }

        unsafe {
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw const original) != 0 {
                return Err(io::Error::last_os_error().into());
            }
        }
        debug!("raw mode off");
        Ok(())
    }

    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn disable_raw_mode(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Write all of `bytes` to `out`, retrying on `Interrupted`. A writer that
/// stops accepting bytes is a [`Error::ShortWrite`].
fn write_fully(out: &mut impl Write, bytes: &[u8]) -> Result<usize> {
    let mut written = 0;
    while written < bytes.len() {
        match out.write(&bytes[written..]) {
            Ok(0) => {
                return Err(Error::ShortWrite {
                    written,
                    expected: bytes.len(),
                });
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(written)
}

impl Terminal for RawTerminal {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        write_fully(&mut io::stdout().lock(), bytes)
    }

    #[cfg(unix)]
    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        buf.resize(READ_BUF_SIZE, 0);

        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr().cast::<libc::c_void>(),
                buf.len(),
            )
        };

        if n < 0 {
            buf.clear();
            let err = io::Error::last_os_error();
            return match err.kind() {
                io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => Ok(false),
                _ => Err(err.into()),
            };
        }

        // n >= 0 and bounded by buf.len().
        #[allow(clippy::cast_sign_loss)]
        buf.truncate(n as usize);
        Ok(!buf.is_empty())
    }

    #[cfg(not(unix))]
    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        Ok(false)
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.size.cols
    }

    fn height(&self) -> u16 {
        self.size.rows
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(e) = self.disable_raw_mode() {
            log::warn!("failed to restore terminal mode: {e}");
        }
    }
}

// ─── WriterTerminal ─────────────────────────────────────────────────────────

/// Output-only terminal over any writer.
///
/// No mode changes and no input: reads always come back empty. The size is
/// whatever the caller says it is. Use it to print frames to a pipe or a
/// file, or to stdout when it isn't a tty.
///
/// ```
/// use gridcon_term::terminal::{Terminal, WriterTerminal};
///
/// let mut term = WriterTerminal::new(Vec::new(), 20, 2);
/// term.write(b"frame")?;
/// assert_eq!(term.into_inner(), b"frame");
/// # Ok::<(), gridcon_term::error::Error>(())
/// ```
#[derive(Debug)]
pub struct WriterTerminal<W: Write> {
    writer: W,
    size: Size,
}

impl<W: Write> WriterTerminal<W> {
    pub const fn new(writer: W, cols: u16, rows: u16) -> Self {
        Self {
            writer,
            size: Size { cols, rows },
        }
    }

    /// The wrapped writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwrap, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterTerminal<io::Stdout> {
    /// Standard output, sized from the OS when it can be asked and 80×24
    /// otherwise.
    #[must_use]
    pub fn stdout() -> Self {
        let size = get_size().unwrap_or(Size::FALLBACK);
        Self::new(io::stdout(), size.cols, size.rows)
    }
}

impl<W: Write> Terminal for WriterTerminal<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        write_fully(&mut self.writer, bytes)
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        Ok(false)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.size.cols
    }

    fn height(&self) -> u16 {
        self.size.rows
    }
}

// ─── NullTerminal ───────────────────────────────────────────────────────────

/// A terminal that discards output and never has input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullTerminal {
    size: Size,
}

impl NullTerminal {
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Size { cols, rows },
        }
    }
}

impl Default for NullTerminal {
    fn default() -> Self {
        Self { size: Size::FALLBACK }
    }
}

impl Terminal for NullTerminal {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        buf.clear();
        Ok(false)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn width(&self) -> u16 {
        self.size.cols
    }

    fn height(&self) -> u16 {
        self.size.rows
    }
}

// ─── MemoryTerminal ─────────────────────────────────────────────────────────

/// A recording terminal.
///
/// Everything written is appended to an in-memory log; reads pop scripted
/// input chunks in order. Counters expose how many writes, reads and
/// flushes happened so tests can check batching.
///
/// ```
/// use gridcon_term::terminal::{MemoryTerminal, Terminal};
///
/// let mut term = MemoryTerminal::new(10, 4).with_input([b"q".to_vec()]);
/// term.write(b"hi").unwrap();
/// assert_eq!(term.output(), b"hi");
///
/// let mut buf = Vec::new();
/// assert!(term.read(&mut buf).unwrap());
/// assert_eq!(buf, b"q");
/// assert!(!term.read(&mut buf).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct MemoryTerminal {
    size: Size,
    output: Vec<u8>,
    input: VecDeque<Vec<u8>>,
    write_calls: usize,
    read_calls: usize,
    flushes: usize,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryTerminal {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            size: Size { cols, rows },
            ..Self::default()
        }
    }

    /// Queue input chunks, each returned by one `read`.
    #[must_use]
    pub fn with_input<I>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        self.input.extend(chunks);
        self
    }

    /// Queue one more input chunk.
    pub fn push_input(&mut self, chunk: impl Into<Vec<u8>>) {
        self.input.push_back(chunk.into());
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Written bytes as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn output_string(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Take the written bytes, leaving the log empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Number of successful `write` calls.
    #[must_use]
    pub const fn write_calls(&self) -> usize {
        self.write_calls
    }

    /// Number of `read` calls, with or without data.
    #[must_use]
    pub const fn read_calls(&self) -> usize {
        self.read_calls
    }

    /// Number of `flush` calls.
    #[must_use]
    pub const fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Make every subsequent `write` fail with a broken-pipe error.
    pub const fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Make every subsequent `read` fail with an I/O error.
    pub const fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Change the reported size.
    pub const fn set_size(&mut self, cols: u16, rows: u16) {
        self.size = Size { cols, rows };
    }
}

impl Terminal for MemoryTerminal {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write refused").into());
        }
        self.write_calls += 1;
        self.output.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> Result<bool> {
        self.read_calls += 1;
        buf.clear();
        if self.fail_reads {
            return Err(io::Error::other("read refused").into());
        }
        match self.input.pop_front() {
            Some(chunk) => {
                buf.extend_from_slice(&chunk);
                Ok(!buf.is_empty())
            }
            None => Ok(false),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.size.cols
    }

    fn height(&self) -> u16 {
        self.size.rows
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Size ──────────────────────────────────────────────────────────

    #[test]
    fn fallback_is_80_by_24() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    // ── Queries ───────────────────────────────────────────────────────

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }

    #[test]
    fn raw_terminal_refuses_non_tty() {
        if is_tty() {
            return;
        }
        assert!(matches!(RawTerminal::new(), Err(Error::NotATerminal)));
    }

    // ── Emergency restore sequence ────────────────────────────────────

    #[test]
    fn emergency_restore_leaves_alt_screen_and_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.contains("\x1b[?1049l"));
        assert!(s.ends_with("\x1b[?25h"));
    }

    // ── NullTerminal ──────────────────────────────────────────────────

    #[test]
    fn null_terminal_accepts_everything() {
        let mut t = NullTerminal::new(40, 10);
        assert_eq!(t.write(b"abc").unwrap(), 3);
        t.flush().unwrap();
        assert_eq!(t.size(), Size { cols: 40, rows: 10 });
    }

    #[test]
    fn null_terminal_has_no_input() {
        let mut t = NullTerminal::default();
        let mut buf = b"stale".to_vec();
        assert!(!t.read(&mut buf).unwrap());
        assert!(buf.is_empty());
    }

    // ── MemoryTerminal ────────────────────────────────────────────────

    #[test]
    fn memory_terminal_records_writes() {
        let mut t = MemoryTerminal::new(10, 2);
        t.write(b"ab").unwrap();
        t.write(b"cd").unwrap();
        assert_eq!(t.output(), b"abcd");
        assert_eq!(t.write_calls(), 2);
        assert_eq!(t.take_output(), b"abcd");
        assert!(t.output().is_empty());
    }

    #[test]
    fn memory_terminal_replays_input_in_order() {
        let mut t = MemoryTerminal::new(10, 2).with_input([b"a".to_vec()]);
        t.push_input(b"bc".as_slice());
        let mut buf = Vec::new();
        assert!(t.read(&mut buf).unwrap());
        assert_eq!(buf, b"a");
        assert!(t.read(&mut buf).unwrap());
        assert_eq!(buf, b"bc");
        assert!(!t.read(&mut buf).unwrap());
        assert!(buf.is_empty());
        assert_eq!(t.read_calls(), 3);
    }

    #[test]
    fn memory_terminal_can_fail_writes() {
        let mut t = MemoryTerminal::new(10, 2);
        t.fail_writes(true);
        assert!(matches!(t.write(b"x"), Err(Error::Io(_))));
        assert!(t.output().is_empty());
        t.fail_writes(false);
        assert!(t.write(b"x").is_ok());
    }

    #[test]
    fn memory_terminal_can_fail_reads() {
        let mut t = MemoryTerminal::new(10, 2).with_input([b"a".to_vec()]);
        t.fail_reads(true);
        let mut buf = Vec::new();
        assert!(matches!(t.read(&mut buf), Err(Error::Io(_))));
        t.fail_reads(false);
        assert!(t.read(&mut buf).unwrap());
        assert_eq!(buf, b"a");
    }

    // ── WriterTerminal ────────────────────────────────────────────────

    #[test]
    fn writer_terminal_passes_bytes_through() {
        let mut t = WriterTerminal::new(Vec::new(), 12, 3);
        t.write(b"one").unwrap();
        t.write(b" two").unwrap();
        t.flush().unwrap();
        assert_eq!(t.size(), Size { cols: 12, rows: 3 });
        assert_eq!(t.get_ref().as_slice(), b"one two");
    }

    #[test]
    fn writer_terminal_has_no_input() {
        let mut t = WriterTerminal::new(Vec::new(), 1, 1);
        let mut buf = b"old".to_vec();
        assert!(!t.read(&mut buf).unwrap());
        assert!(buf.is_empty());
    }

    #[test]
    fn writer_terminal_reports_stalled_writer() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut t = WriterTerminal::new(Full, 1, 1);
        assert!(matches!(
            t.write(b"abc"),
            Err(Error::ShortWrite { written: 0, expected: 3 })
        ));
    }

    // ── Termios restore ───────────────────────────────────────────────

    #[cfg(unix)]
    #[test]
    fn termios_is_restored_once() {
        let saved: libc::termios = unsafe { std::mem::zeroed() };

        // The panic hook claims the backup first; drop must then leave the
        // mode alone.
        *TERMIOS_BACKUP.lock().unwrap() = Some(saved);
        assert!(take_termios_backup().is_some());
        assert!(take_termios_backup().is_none());

        let mut term = RawTerminal {
            original_termios: Some(saved),
            size: Size::FALLBACK,
            read_timeout_ds: DEFAULT_READ_TIMEOUT_DS,
        };
        term.disable_raw_mode().unwrap();
        assert!(term.original_termios.is_none());
        assert!(take_termios_backup().is_none());
    }

    #[test]
    fn boxed_terminal_delegates() {
        let mut t: Box<dyn Terminal> = Box::new(MemoryTerminal::new(7, 3));
        assert_eq!(t.width(), 7);
        assert_eq!(t.height(), 3);
        assert_eq!(t.write(b"xyz").unwrap(), 3);
    }
}
