//! Splitting an instruction word into its opcode and parameter modes.

/// An instruction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Add,
    Multiply,
    Input,
    Output,
    JumpNonZero,
    JumpZero,
    LessThan,
    Equal,
    AdjustRelativeBase,
    Halt,
}

/// A parameter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Positional,
    Immediate,
    Relative,
}

/// The parameter modes of an instruction, least significant digit first.
///
/// Once the encoded digits run out this yields the raw value `0`
/// (positional) forever.
#[derive(Debug, Clone)]
pub struct Modes {
    rest: i64,
}

impl Opcode {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Add),
            2 => Some(Self::Multiply),
            3 => Some(Self::Input),
            4 => Some(Self::Output),
            5 => Some(Self::JumpNonZero),
            6 => Some(Self::JumpZero),
            7 => Some(Self::LessThan),
            8 => Some(Self::Equal),
            9 => Some(Self::AdjustRelativeBase),
            99 => Some(Self::Halt),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Self::Add => 1,
            Self::Multiply => 2,
            Self::Input => 3,
            Self::Output => 4,
            Self::JumpNonZero => 5,
            Self::JumpZero => 6,
            Self::LessThan => 7,
            Self::Equal => 8,
            Self::AdjustRelativeBase => 9,
            Self::Halt => 99,
        }
    }
}

impl Mode {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Positional),
            1 => Some(Self::Immediate),
            2 => Some(Self::Relative),
            _ => None,
        }
    }
}

impl Iterator for Modes {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        let digit = self.rest % 10;
        self.rest /= 10;
        Some(digit)
    }
}

/// Returns the raw opcode of an instruction word.
pub fn opcode(word: i64) -> i64 {
    word % 100
}

/// Returns the lazy parameter modes of an instruction word.
pub fn modes(word: i64) -> Modes {
    Modes { rest: word / 100 }
}
