use std::fmt;
use std::str::FromStr;

use super::error::ReconcileError;

/// What to do when an element of the same name already exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Policy {
    /// Keep the existing element and continue with its children.
    Skip,
    /// Delete the existing element and create a fresh one.
    Replace,
    /// Stop the run on the first conflict.
    #[default]
    Abort,
    /// Ask the operator for every conflict.
    Ask,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Self::Skip, Self::Replace, Self::Abort, Self::Ask];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Replace => "replace",
            Self::Abort => "abort",
            Self::Ask => "ask",
        }
    }

    /// `ask` when an operator can answer, `abort` otherwise.
    pub fn default_for_terminal(interactive: bool) -> Self {
        if interactive { Self::Ask } else { Self::Abort }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Policy {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ReconcileError::UnknownPolicy(s.to_string()))
    }
}

/// An operator's answer to an overwrite prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    /// `y`: replace this element.
    Yes,
    /// `Y`: replace this one and every later conflict.
    YesToAll,
    /// `n`: keep this element.
    No,
    /// `N`: keep this one and every later conflict.
    NoToAll,
}

impl Answer {
    /// Case-sensitive: `y`, `Y`, `n` or `N`.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "y" => Some(Self::Yes),
            "Y" => Some(Self::YesToAll),
            "n" => Some(Self::No),
            "N" => Some(Self::NoToAll),
            _ => None,
        }
    }

    /// The policy an answer switches the run to, if any.
    pub fn switches_to(&self) -> Option<Policy> {
        match self {
            Self::YesToAll => Some(Policy::Replace),
            Self::NoToAll => Some(Policy::Skip),
            Self::Yes | Self::No => None,
        }
    }

    pub fn replaces(&self) -> bool {
        matches!(self, Self::Yes | Self::YesToAll)
    }
}
