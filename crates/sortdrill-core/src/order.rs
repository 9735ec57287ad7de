use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Target total order of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }

    /// The ordering predicate every engine consults.
    ///
    /// `a < b` under [`Ascending`](Self::Ascending), `a > b` under
    /// [`Descending`](Self::Descending). Equal values never precede each other.
    #[must_use]
    pub const fn precedes(self, a: i32, b: i32) -> bool {
        match self {
            Self::Ascending => a < b,
            Self::Descending => a > b,
        }
    }

    /// True when every adjacent pair is either in order or equal.
    #[must_use]
    pub fn is_ordered(self, values: &[i32]) -> bool {
        values
            .windows(2)
            .all(|pair| pair[0] == pair[1] || self.precedes(pair[0], pair[1]))
    }
}

/// Which end of the sequence the settled region grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergenceDirection {
    /// Settled region accumulates at the low-index end.
    Left,
    /// Settled region accumulates at the high-index end.
    #[default]
    Right,
}

impl ConvergenceDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// The three quiz algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Insertion,
    Selection,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::Bubble, Self::Insertion, Self::Selection];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Bubble => "bubble",
            Self::Insertion => "insertion",
            Self::Selection => "selection",
        }
    }
}

/// Error returned when parsing a policy value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ConvergenceDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for OrderDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(ParseEnumError {
                expected: "order",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ConvergenceDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(ParseEnumError {
                expected: "convergence",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bubble" => Ok(Self::Bubble),
            "insertion" => Ok(Self::Insertion),
            "selection" => Ok(Self::Selection),
            _ => Err(ParseEnumError {
                expected: "algorithm",
                got: s.to_string(),
            }),
        }
    }
}
