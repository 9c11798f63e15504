//! Rule-string parse and validation errors.

use std::error::Error;
use std::fmt;

use tessera_engine::ConfigError;
use tessera_space::CellShape;

/// A malformed or unsupported rule string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleError {
    /// A Conway rule without the `/` between survive and birth counts.
    MissingSeparator {
        /// The rejected input.
        rule: String,
    },
    /// A character that is not part of the rule alphabet.
    InvalidCharacter {
        /// The rejected input.
        rule: String,
        /// The offending character.
        character: char,
    },
    /// A neighbour count that is not a single decimal digit.
    CountOutOfRange {
        /// The rejected count.
        count: u8,
    },
    /// A Langton rule with too few or too many turns.
    TurnCount {
        /// Number of turns parsed.
        count: usize,
        /// Smallest accepted number.
        min: usize,
        /// Largest accepted number.
        max: usize,
    },
    /// A turn the ant cannot make on this cell shape.
    TurnNotAllowed {
        /// Abbreviation of the turn.
        turn: &'static str,
        /// The cell shape.
        shape: CellShape,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator { rule } => {
                write!(f, "rule {rule:?} has no '/' between survive and birth counts")
            }
            Self::InvalidCharacter { rule, character } => {
                write!(f, "rule {rule:?} contains invalid character {character:?}")
            }
            Self::CountOutOfRange { count } => {
                write!(f, "neighbour count {count} is not within 0..=9")
            }
            Self::TurnCount { count, min, max } => {
                write!(f, "{count} turns given, expected {min}..={max}")
            }
            Self::TurnNotAllowed { turn, shape } => {
                write!(f, "turn {turn} is not available on {shape} cells")
            }
        }
    }
}

impl Error for RuleError {}

impl From<RuleError> for ConfigError {
    fn from(e: RuleError) -> Self {
        ConfigError::invalid("rules", e.to_string())
    }
}
