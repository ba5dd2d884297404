//! `OutputLog`: the ordered stream of lines one invocation produces.

use chaincall_core::call::LogLine;
use tokio::sync::mpsc;

/// Collects log lines and optionally forwards each one to a live subscriber.
#[derive(Debug, Default)]
pub struct OutputLog {
    lines: Vec<LogLine>,
    tx: Option<mpsc::UnboundedSender<LogLine>>,
}

impl OutputLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every subsequent line as it is pushed.
    /// Call before running an invocation to avoid missing lines.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<LogLine> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        rx
    }

    pub fn push(&mut self, line: LogLine) {
        if let Some(tx) = &self.tx {
            // A dropped receiver only stops the live stream
            if tx.send(line.clone()).is_err() {
                self.tx = None;
            }
        }
        self.lines.push(line);
    }

    pub fn text(&mut self, s: impl Into<String>) {
        self.push(LogLine::Text(s.into()));
    }

    pub fn json(&mut self, s: impl Into<String>) {
        self.push(LogLine::Json(s.into()));
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LogLine> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
