use std::sync::{Arc, Mutex};

/// Destination for locally emitted log lines.
pub trait LineWriter: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Default writer: every line becomes a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWriter;

impl LineWriter for TracingWriter {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "telelog", "{}", line);
    }
}

/// Prints straight to stdout, keeping ANSI colors intact.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutWriter;

impl LineWriter for StdoutWriter {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Collects lines in memory so callers can inspect what was logged.
#[derive(Debug, Clone, Default)]
pub struct BufferWriter {
    lines: Arc<Mutex<Vec<String>>>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl LineWriter for BufferWriter {
    fn write_line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}
