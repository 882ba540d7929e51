//! Document ready state.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a loading document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReadyState {
    /// The document is still loading.
    Loading,
    /// The document has been parsed but sub-resources are still loading.
    Interactive,
    /// The document and all sub-resources have finished loading.
    Complete,
    /// Any value the host reports that is not one of the known literals.
    Other(String),
}

impl ReadyState {
    /// The DOM literal for this state.
    pub fn as_str(&self) -> &str {
        match self {
            ReadyState::Loading => "loading",
            ReadyState::Interactive => "interactive",
            ReadyState::Complete => "complete",
            ReadyState::Other(s) => s,
        }
    }

    /// Whether this is the terminal `complete` state.
    pub fn is_complete(&self) -> bool {
        matches!(self, ReadyState::Complete)
    }
}

impl FromStr for ReadyState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The comparison is exact, like `readyState === 'complete'`.
        Ok(match s {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            "complete" => ReadyState::Complete,
            other => ReadyState::Other(other.to_string()),
        })
    }
}

impl From<&str> for ReadyState {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
