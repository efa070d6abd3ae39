//! Terminal prompt for the character data.

use std::io::{BufRead, Write};

use sentence_highlighter_core::Prompt;

/// Reads an answer from a line-based reader.
///
/// The answer ends at the first blank line or end of input. End of input
/// before any line cancels. A blank first line keeps the default, if any.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl LinePrompt<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stdin, writing questions to stderr.
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, message: &str, default: Option<&str>) -> Option<String> {
        // a broken terminal is not worth aborting over; the read decides
        let _ = writeln!(self.writer, "{message}");
        if let Some(current) = default {
            let _ = writeln!(self.writer, "(current value below; blank line keeps it)\n{current}");
        }
        let _ = writeln!(self.writer, "(finish with a blank line, Ctrl-D to cancel)");
        let _ = self.writer.flush();

        let mut lines = Vec::new();
        let mut saw_input = false;
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => saw_input = true,
            }
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() {
                break;
            }
            lines.push(line.to_string());
        }

        if !saw_input {
            return None;
        }
        if lines.is_empty() {
            return Some(default.unwrap_or_default().to_string());
        }
        Some(lines.join("\n"))
    }
}
