use std::io::Write;

use crate::error::Error;

/// Receives lexical diagnostics while a scan carries on.
///
/// The scanner never stops for a bad lexeme: it hands the problem to a
/// `Reporter` and moves to the next character. Whether a pipeline should
/// halt because something was reported is up to whoever owns the reporter.
pub trait Reporter {
    fn report(&mut self, line: usize, location: &str, message: &str);

    fn error(&mut self, e: &Error) {
        self.report(e.line(), "", e.message())
    }
}

impl <F: FnMut(usize, &str, &str)> Reporter for F {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self(line, location, message)
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    pub line: usize,
    pub location: String,
    pub message: String,
}

/// Collects every diagnostic from one scan.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn had_error(&self) -> bool {
        !self.reported.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn reset(&mut self) {
        self.reported.clear()
    }
}

impl Reporter for Diagnostics {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.reported.push(Diagnostic {
            line,
            location: location.to_string(),
            message: message.to_string(),
        });
    }
}

/// Prints diagnostics as `[line N] Error: message` lines.
pub struct WriteReporter<W> {
    out: W,
    had_error: bool,
}

impl <W: Write> WriteReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, had_error: false }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn reset(&mut self) {
        self.had_error = false;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl <W: Write> Reporter for WriteReporter<W> {
    fn report(&mut self, line: usize, location: &str, message: &str) {
        self.had_error = true;
        let loc = if location.is_empty() {
            String::new()
        } else {
            format!(" {}", location)
        };
        if let Err(e) = writeln!(self.out, "[line {}] Error{}: {}", line, loc, message) {
            log::warn!("could not write diagnostic: {}", e);
        }
    }
}
