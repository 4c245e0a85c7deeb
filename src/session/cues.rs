//! Audible feedback

/// Events that get an audible cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Connect,
    Disconnect,
    Message,
    Send,
    Error,
    Clear,
    Toggle,
}

impl Cue {
    /// Pitch of the cue's beep, for sinks that can synthesize tones
    pub fn frequency_hz(&self) -> u32 {
        match self {
            Cue::Connect => 800,
            Cue::Disconnect => 400,
            Cue::Message => 600,
            Cue::Send => 1000,
            Cue::Error => 300,
            Cue::Clear => 750,
            Cue::Toggle => 500,
        }
    }
}

/// Plays cues. The session only calls this while sound is enabled.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that stays silent
#[derive(Debug, Default)]
pub struct Silent;

impl CueSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_have_distinct_pitches() {
        let all = [
            Cue::Connect,
            Cue::Disconnect,
            Cue::Message,
            Cue::Send,
            Cue::Error,
            Cue::Clear,
            Cue::Toggle,
        ];
        let mut pitches: Vec<u32> = all.iter().map(Cue::frequency_hz).collect();
        pitches.sort_unstable();
        pitches.dedup();
        assert_eq!(pitches.len(), all.len());
    }
}
