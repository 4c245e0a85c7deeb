//! Terminal bell cue sink

use std::io::{self, Stdout, Write};

use crate::session::{Cue, CueSink};

/// Rings the terminal bell for every cue.
///
/// Terminals have a single bell tone, so the cue's pitch only shows up in
/// the trace log.
pub struct TerminalBell<W: Write = Stdout> {
    out: W,
}

impl TerminalBell<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CueSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        tracing::trace!(?cue, hz = cue.frequency_hz(), "Cue");
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            tracing::debug!("Failed to ring terminal bell: {}", e);
        }
    }
}
