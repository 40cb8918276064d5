//! Morse symbol classification, lookup table, and letter segmentation.
//!
//! Blink durations classify into a ternary alphabet (dot, dash, ignored).
//! Symbols accumulate in a pending buffer which is flushed into one decoded
//! character after a configurable period of inactivity.

use crate::constants::UNKNOWN_SEQUENCE_MARKER;
use std::time::Duration;

/// One Morse symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    /// Character used in the pending buffer
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

/// Classify a blink duration into a Morse symbol.
///
/// Band upper edges are inclusive: a blink of exactly `dot_max` is a dot and
/// exactly `dash_max` is a dash. Durations above `dash_max` are treated as
/// noise or an intentional ignore and produce no symbol.
#[must_use]
pub fn classify_blink(duration: Duration, dot_max: Duration, dash_max: Duration) -> Option<Symbol> {
    if duration <= dot_max {
        Some(Symbol::Dot)
    } else if duration <= dash_max {
        Some(Symbol::Dash)
    } else {
        None
    }
}

/// Look up a Morse sequence in the static table (A-Z, 0-9).
///
/// Returns `None` for sequences with no table entry.
#[must_use]
pub fn decode(sequence: &str) -> Option<char> {
    let ch = match sequence {
        ".-" => 'A',
        "-..." => 'B',
        "-.-." => 'C',
        "-.." => 'D',
        "." => 'E',
        "..-." => 'F',
        "--." => 'G',
        "...." => 'H',
        ".." => 'I',
        ".---" => 'J',
        "-.-" => 'K',
        ".-.." => 'L',
        "--" => 'M',
        "-." => 'N',
        "---" => 'O',
        ".--." => 'P',
        "--.-" => 'Q',
        ".-." => 'R',
        "..." => 'S',
        "-" => 'T',
        "..-" => 'U',
        "...-" => 'V',
        ".--" => 'W',
        "-..-" => 'X',
        "-.--" => 'Y',
        "--.." => 'Z',
        "-----" => '0',
        ".----" => '1',
        "..---" => '2',
        "...--" => '3',
        "....-" => '4',
        "....." => '5',
        "-...." => '6',
        "--..." => '7',
        "---.." => '8',
        "----." => '9',
        _ => return None,
    };
    Some(ch)
}

/// Accumulates classified symbols and segments them into decoded characters.
///
/// Owns the pending buffer and the translated output text for one session.
/// Segmentation is driven purely by elapsed time since the last blink, so
/// [`MorseAccumulator::tick`] must run every frame, including frames with no
/// detected face.
pub struct MorseAccumulator {
    letter_gap: Duration,
    pending: String,
    text: String,
}

impl MorseAccumulator {
    /// Create an empty accumulator with the given letter-gap timeout
    #[must_use]
    pub fn new(letter_gap: Duration) -> Self {
        Self {
            letter_gap,
            pending: String::new(),
            text: String::new(),
        }
    }

    /// Append one classified symbol to the pending buffer
    pub fn push(&mut self, symbol: Symbol) {
        self.pending.push(symbol.as_char());
        log::debug!("Morse buffer: {}", self.pending);
    }

    /// Timeout check, to be called once per processing tick.
    ///
    /// When `idle` (time since the last blink ended) exceeds the letter gap
    /// and symbols are pending, the buffer is decoded and cleared. Unmapped
    /// sequences decode to `?`. Returns the appended character, if any.
    /// Once the buffer is cleared a second immediate check appends nothing.
    pub fn tick(&mut self, idle: Duration) -> Option<char> {
        if idle <= self.letter_gap || self.pending.is_empty() {
            return None;
        }

        let decoded = decode(&self.pending).unwrap_or(UNKNOWN_SEQUENCE_MARKER);
        log::info!("Morse: {} | Translated: {}", self.pending, decoded);
        self.text.push(decoded);
        self.pending.clear();
        Some(decoded)
    }

    /// Current pending symbol buffer
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Translated text accumulated so far
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_classification_bands() {
        let dot_max = secs(0.5);
        let dash_max = secs(1.0);

        assert_eq!(classify_blink(secs(0.1), dot_max, dash_max), Some(Symbol::Dot));
        assert_eq!(classify_blink(secs(0.7), dot_max, dash_max), Some(Symbol::Dash));
        assert_eq!(classify_blink(secs(1.5), dot_max, dash_max), None);
    }

    #[test]
    fn test_classification_boundaries_inclusive() {
        let dot_max = secs(0.5);
        let dash_max = secs(1.0);

        // Exactly 0.5 is a dot, exactly 1.0 is a dash
        assert_eq!(classify_blink(secs(0.5), dot_max, dash_max), Some(Symbol::Dot));
        assert_eq!(classify_blink(secs(1.0), dot_max, dash_max), Some(Symbol::Dash));
    }

    #[test]
    fn test_decode_letters_and_digits() {
        assert_eq!(decode(".-"), Some('A'));
        assert_eq!(decode("..-"), Some('U'));
        assert_eq!(decode("--.."), Some('Z'));
        assert_eq!(decode("-----"), Some('0'));
        assert_eq!(decode("----."), Some('9'));
    }

    #[test]
    fn test_decode_unknown() {
        assert_eq!(decode("......"), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn test_flush_after_gap() {
        let mut acc = MorseAccumulator::new(secs(3.0));
        acc.push(Symbol::Dot);
        acc.push(Symbol::Dash);

        // Gap not yet elapsed
        assert_eq!(acc.tick(secs(2.0)), None);
        assert_eq!(acc.pending(), ".-");

        assert_eq!(acc.tick(secs(3.5)), Some('A'));
        assert_eq!(acc.text(), "A");
        assert_eq!(acc.pending(), "");
    }

    #[test]
    fn test_unknown_sequence_decodes_to_marker() {
        let mut acc = MorseAccumulator::new(secs(3.0));
        for _ in 0..6 {
            acc.push(Symbol::Dot);
        }

        assert_eq!(acc.tick(secs(4.0)), Some('?'));
        assert_eq!(acc.text(), "?");
        assert_eq!(acc.pending(), "");
    }

    #[test]
    fn test_flush_is_idempotent() {
        let mut acc = MorseAccumulator::new(secs(3.0));
        acc.push(Symbol::Dot);

        assert_eq!(acc.tick(secs(3.1)), Some('E'));
        // Immediate second timeout check with an empty buffer is a no-op
        assert_eq!(acc.tick(secs(3.2)), None);
        assert_eq!(acc.text(), "E");
    }

    #[test]
    fn test_tick_without_symbols_is_noop() {
        let mut acc = MorseAccumulator::new(secs(3.0));
        assert_eq!(acc.tick(secs(10.0)), None);
        assert_eq!(acc.text(), "");
    }
}
