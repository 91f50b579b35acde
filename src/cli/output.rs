//! Console output for the router, the subcommands and the reporters
//!
//! [`Output`] wraps the stdout/stderr pair behind shared handles so one sink can
//! be cloned into a reporter while the command keeps writing to it. Tests swap
//! the process streams for in-memory buffers with [`Output::capture`].

use console::style;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Output handler for consistent CLI formatting
#[derive(Clone)]
pub struct Output {
    out: Sink,
    err: Sink,
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stdio()
    }
}

impl Output {
    /// Write to the process stdout and stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }

    pub fn new(out: impl Write + Send + 'static, err: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
            err: Arc::new(Mutex::new(Box::new(err))),
        }
    }

    /// Write into memory; the returned [`Captured`] reads back what was written
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        let output = Self::new(
            SharedBuffer(Arc::clone(&captured.out)),
            SharedBuffer(Arc::clone(&captured.err)),
        );
        (output, captured)
    }

    /// Print a plain line to stdout
    pub fn line(&self, message: &str) {
        write_line(&self.out, message);
    }

    /// Print blank line
    pub fn blank_line(&self) {
        write_line(&self.out, "");
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        write_line(&self.out, &format!("{} {}", style("✔").green(), message));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        write_line(
            &self.err,
            &format!("{} {}", style("⚠").yellow().for_stderr(), message),
        );
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        write_line(
            &self.err,
            &format!("{} {}", style("✖").red().for_stderr(), message),
        );
    }

    /// Print a follow-up suggestion to stderr
    pub fn hint(&self, message: &str) {
        write_line(&self.err, &style(message).dim().for_stderr().to_string());
    }

    /// Print pre-formatted text to stderr as-is (clap diagnostics)
    pub fn raw_error(&self, text: &str) {
        let mut sink = self.err.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = sink.write_all(text.as_bytes());
        let _ = sink.flush();
    }

    /// A `Write` handle onto stdout for reporters
    pub fn writer(&self) -> OutputWriter {
        OutputWriter(Arc::clone(&self.out))
    }
}

fn write_line(sink: &Sink, message: &str) {
    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
    // A closed pipe (e.g. `probitas list | head`) is not worth failing over
    let _ = writeln!(sink, "{message}");
    let _ = sink.flush();
}

/// Stdout handle shared with an [`Output`]
#[derive(Clone)]
pub struct OutputWriter(Sink);

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}

/// In-memory streams filled by an [`Output`] created with [`Output::capture`]
#[derive(Debug, Clone, Default)]
pub struct Captured {
    out: Arc<Mutex<Vec<u8>>>,
    err: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    pub fn stdout(&self) -> String {
        read(&self.out)
    }

    pub fn stderr(&self) -> String {
        read(&self.err)
    }
}

fn read(buffer: &Mutex<Vec<u8>>) -> String {
    let bytes = buffer.lock().unwrap_or_else(PoisonError::into_inner);
    console::strip_ansi_codes(&String::from_utf8_lossy(&bytes)).into_owned()
}

struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
