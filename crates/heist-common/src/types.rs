//! Core types shared across Data Heist components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three defenses a hacker can attack (and a defender can sign into).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefenseSystem {
    /// Wire panel: connect, cut, or disconnect wires
    Wires,
    /// Keypad: derive a code from an indicator number
    Keypad,
    /// Firewall: transform a letter pattern
    Firewall,
}

impl DefenseSystem {
    pub const ALL: [DefenseSystem; 3] = [Self::Wires, Self::Keypad, Self::Firewall];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wires => "wires",
            Self::Keypad => "keypad",
            Self::Firewall => "firewall",
        }
    }

    /// Upper-case name used in hack result messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Wires => "WIRES",
            Self::Keypad => "KEYPAD",
            Self::Firewall => "FIREWALL",
        }
    }
}

impl fmt::Display for DefenseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown defense name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown defense: {0}")]
pub struct UnknownDefense(pub String);

impl FromStr for DefenseSystem {
    type Err = UnknownDefense;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wires" => Ok(Self::Wires),
            "keypad" => Ok(Self::Keypad),
            "firewall" => Ok(Self::Firewall),
            other => Err(UnknownDefense(other.to_string())),
        }
    }
}

/// Detection meter (0..=max).
/// Reaching the maximum means the hackers have been traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    level: u8,
    max: u8,
}

impl Detection {
    /// Create an empty meter. A zero maximum is bumped to 1.
    pub fn new(max: u8) -> Self {
        Self {
            level: 0,
            max: max.max(1),
        }
    }

    pub fn value(&self) -> u8 {
        self.level
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.level >= self.max
    }

    /// Raise by one, saturating at the maximum.
    /// Returns true if the meter is full afterwards.
    pub fn raise(&mut self) -> bool {
        self.level = self.level.saturating_add(1).min(self.max);
        self.is_full()
    }

    /// Lower by one, saturating at zero
    pub fn lower(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        self.level = 0;
    }
}

impl Default for Detection {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MAX_DETECTION)
    }
}

/// Success/fail counters for one defense
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseLog {
    pub success: u64,
    pub fail: u64,
}

/// Counters for all three defenses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseLogs {
    pub wires: DefenseLog,
    pub keypad: DefenseLog,
    pub firewall: DefenseLog,
}

impl DefenseLogs {
    pub fn get(&self, system: DefenseSystem) -> DefenseLog {
        match system {
            DefenseSystem::Wires => self.wires,
            DefenseSystem::Keypad => self.keypad,
            DefenseSystem::Firewall => self.firewall,
        }
    }

    pub fn get_mut(&mut self, system: DefenseSystem) -> &mut DefenseLog {
        match system {
            DefenseSystem::Wires => &mut self.wires,
            DefenseSystem::Keypad => &mut self.keypad,
            DefenseSystem::Firewall => &mut self.firewall,
        }
    }
}

/// A generated puzzle, including its expected answer.
/// Never sent to the client; see [`PuzzleView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub system: DefenseSystem,
    pub description: String,
    pub expected: String,
}

impl Puzzle {
    /// The client-visible part of the puzzle
    pub fn view(&self) -> PuzzleView {
        PuzzleView {
            system: self.system,
            description: self.description.clone(),
        }
    }
}

/// Client-visible puzzle data (no answer)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleView {
    pub system: DefenseSystem,
    pub description: String,
}

/// A file stolen during a successful hack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StolenFile {
    pub name: String,
    pub size_gb: u64,
}

/// How a notice should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// The action succeeded
    Ok,
    /// The action was attempted and failed
    Bad,
    /// Nothing happened (missing input, not affordable)
    Neutral,
    /// The action was not allowed in the current state
    Warn,
}

/// A message shown to the player after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub tone: Tone,
    pub text: String,
    /// Extra emphasised line (penalties, detection changes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
            detail: None,
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self::new(Tone::Ok, text)
    }

    pub fn bad(text: impl Into<String>) -> Self {
        Self::new(Tone::Bad, text)
    }

    pub fn neutral(text: impl Into<String>) -> Self {
        Self::new(Tone::Neutral, text)
    }

    pub fn warn(text: impl Into<String>) -> Self {
        Self::new(Tone::Warn, text)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Point-in-time copy of the shared game record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub detection: u8,
    pub max_detection: u8,
    /// Stolen data on hand, GB
    pub files: u64,
    pub credits: u64,
    pub boost_available: bool,
    pub boost_hacks_left: u32,
    pub logs: DefenseLogs,
}
