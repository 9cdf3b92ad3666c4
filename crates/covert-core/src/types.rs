//! Domain types for the reference monitor and the covert channel.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::CovertError;

// ---------------------------------------------------------------------------
// Security levels
// ---------------------------------------------------------------------------

/// Two-point lattice. Ordered `Low < High` by declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Low,
    High,
}

impl SecurityLevel {
    /// Simple-security property: no read-up.
    #[inline]
    pub fn can_read(self, object: SecurityLevel) -> bool {
        self >= object
    }

    /// *-property: no write-down. Also governs DESTROY.
    #[inline]
    pub fn can_write(self, object: SecurityLevel) -> bool {
        self <= object
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityLevel::Low => f.write_str("LOW"),
            SecurityLevel::High => f.write_str("HIGH"),
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = CovertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(SecurityLevel::Low),
            "high" => Ok(SecurityLevel::High),
            other => Err(CovertError::InvalidInput(format!(
                "unknown security level '{other}' (expected low or high)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Read,
    Write,
    Create,
    Destroy,
    Sleep,
    Bad,
}

impl Command {
    /// Maps a keyword to a command. Unknown keywords are `Bad`, never an error.
    pub fn from_keyword(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "read" => Command::Read,
            "write" => Command::Write,
            "create" => Command::Create,
            "destroy" => Command::Destroy,
            "sleep" => Command::Sleep,
            _ => Command::Bad,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Command::Read => "READ",
            Command::Write => "WRITE",
            Command::Create => "CREATE",
            Command::Destroy => "DESTROY",
            Command::Sleep => "SLEEP",
            Command::Bad => "BAD",
        };
        f.write_str(s)
    }
}

/// One request against the reference monitor.
///
/// Object names are case-insensitive and stored lowercase. `value` only
/// matters for `WRITE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    command: Command,
    object: String,
    value: i32,
}

impl Instruction {
    /// Builds an instruction, lowercasing `object`.
    pub fn new(command: Command, object: &str, value: i32) -> Self {
        Self {
            command,
            object: object.to_lowercase(),
            value,
        }
    }

    /// `READ object`.
    pub fn read(object: &str) -> Self {
        Self::new(Command::Read, object, 0)
    }

    /// `WRITE object value`.
    pub fn write(object: &str, value: i32) -> Self {
        Self::new(Command::Write, object, value)
    }

    /// `CREATE object`.
    pub fn create(object: &str) -> Self {
        Self::new(Command::Create, object, 0)
    }

    /// `DESTROY object`.
    pub fn destroy(object: &str) -> Self {
        Self::new(Command::Destroy, object, 0)
    }

    /// Scheduling-only instruction; never sent to the monitor.
    pub fn sleep() -> Self {
        Self::new(Command::Sleep, "", 0)
    }

    /// Unrecognized instruction; always denied.
    pub fn bad() -> Self {
        Self::new(Command::Bad, "", 0)
    }

    #[inline]
    pub fn command(&self) -> Command {
        self.command
    }

    #[inline]
    /// Target object name, already lowercase.
    pub fn object(&self) -> &str {
        &self.object
    }

    #[inline]
    /// Payload for `WRITE`; 0 otherwise.
    pub fn value(&self) -> i32 {
        self.value
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            Command::Write => write!(f, "WRITE {} {}", self.object, self.value),
            Command::Sleep | Command::Bad => write!(f, "{}", self.command),
            cmd => write!(f, "{} {}", cmd, self.object),
        }
    }
}

// ---------------------------------------------------------------------------
// Channel participants
// ---------------------------------------------------------------------------

/// The two parties sharing a turn token. The sender always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Participant {
    Sender,
    Receiver,
}

impl Participant {
    /// The participant who moves next.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Participant::Sender => Participant::Receiver,
            Participant::Receiver => Participant::Sender,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Sender => f.write_str("sender"),
            Participant::Receiver => f.write_str("receiver"),
        }
    }
}

/// What one participant did with one turn.
///
/// For the sender `bit` is the bit being signalled; for the receiver it is
/// the bit decoded. A receiver probe issues exactly four instructions, so
/// `SmallVec<[Instruction; 4]>` never spills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: u64,
    pub participant: Participant,
    pub instructions: SmallVec<[Instruction; 4]>,
    pub bit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(SecurityLevel::Low < SecurityLevel::High);
        assert!(SecurityLevel::High.can_read(SecurityLevel::Low));
        assert!(!SecurityLevel::Low.can_read(SecurityLevel::High));
        assert!(SecurityLevel::Low.can_write(SecurityLevel::High));
        assert!(!SecurityLevel::High.can_write(SecurityLevel::Low));
    }

    #[test]
    fn equal_levels_allow_everything() {
        for level in [SecurityLevel::Low, SecurityLevel::High] {
            assert!(level.can_read(level));
            assert!(level.can_write(level));
        }
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<SecurityLevel>().unwrap(), SecurityLevel::High);
        assert_eq!(" low ".parse::<SecurityLevel>().unwrap(), SecurityLevel::Low);
        assert!("medium".parse::<SecurityLevel>().is_err());
    }

    #[test]
    fn object_names_are_lowercased() {
        let instr = Instruction::write("HObj", 7);
        assert_eq!(instr.object(), "hobj");
        assert_eq!(instr.value(), 7);
        assert_eq!(instr.to_string(), "WRITE hobj 7");
    }

    #[test]
    fn unknown_keyword_is_bad() {
        assert_eq!(Command::from_keyword("CREATE"), Command::Create);
        assert_eq!(Command::from_keyword("delete"), Command::Bad);
    }

    #[test]
    fn participants_alternate() {
        assert_eq!(Participant::Sender.other(), Participant::Receiver);
        assert_eq!(Participant::Receiver.other(), Participant::Sender);
    }
}
