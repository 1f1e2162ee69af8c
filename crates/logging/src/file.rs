//! Append-mode log file sink for `tracing-subscriber`.

use std::{
    fs::{File, OpenOptions},
    io::{self, LineWriter, Write},
    path::Path,
    sync::Arc,
};

use parking_lot::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

/// Shared, line-buffered handle to the log file.
#[derive(Clone)]
pub struct FileSink {
    inner: Arc<Mutex<LineWriter<File>>>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(LineWriter::new(file))),
        })
    }

    /// Flush any partially written line.
    pub fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

/// Writer handed out per event; holds the file lock for the event's duration.
pub struct FileSinkWriter<'a>(MutexGuard<'a, LineWriter<File>>);

impl Write for FileSinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkWriter(self.inner.lock())
    }
}
