//! Program-facing log sink.
//!
//! Two line shapes: `MESSAGE` for untagged lines and `KIND: MESSAGE` for
//! tagged ones. Host diagnostics go through `tracing` instead.

use crate::types::LogKind;

pub fn format_line(kind: Option<LogKind>, message: &str) -> String {
    match kind {
        Some(kind) => format!("{}: {message}", kind.label()),
        None => message.to_string(),
    }
}

pub trait LogSink {
    fn write_line(&mut self, line: &str);

    fn log(&mut self, kind: Option<LogKind>, message: &str) {
        self.write_line(&format_line(kind, message));
    }
}

/// Writes each line to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shapes() {
        assert_eq!(format_line(None, "QUIT"), "QUIT");
        assert_eq!(format_line(Some(LogKind::Load), "a.png"), "LOAD: a.png");
        assert_eq!(format_line(Some(LogKind::Frame), "60.0 FPS"), "FRAME: 60.0 FPS");
    }
}
