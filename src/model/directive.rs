//! Parsed intent of one wire line.

use crate::model::LogEntry;

/// What a line asks the session to do, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Plain log line, no marker.
    None,
    /// `>` marker: open a nested scope.
    Enter,
    /// `<` marker: close the current scope.
    Leave,
    /// `!` marker: jump back to the root.
    Reset,
    /// The literal `CLOSE` line.
    Terminate,
}

/// One parsed line: an action plus the entry it carries.
///
/// `Terminate` carries no entry because `CLOSE` never produces a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Append `entry` as a leaf.
    Log(LogEntry),
    /// Append `entry` and descend into it.
    Enter(LogEntry),
    /// Optionally log `entry`, then ascend one level.
    Leave(LogEntry),
    /// Optionally log `entry`, then return to the root.
    Reset(LogEntry),
    /// End the session gracefully.
    Terminate,
}

impl Directive {
    /// The action tag of this directive.
    pub fn action(&self) -> Action {
        match self {
            Directive::Log(_) => Action::None,
            Directive::Enter(_) => Action::Enter,
            Directive::Leave(_) => Action::Leave,
            Directive::Reset(_) => Action::Reset,
            Directive::Terminate => Action::Terminate,
        }
    }

    /// The carried entry, absent only for `Terminate`.
    pub fn entry(&self) -> Option<&LogEntry> {
        match self {
            Directive::Log(entry)
            | Directive::Enter(entry)
            | Directive::Leave(entry)
            | Directive::Reset(entry) => Some(entry),
            Directive::Terminate => None,
        }
    }

    /// Build a directive from an action and the entry parsed alongside it.
    ///
    /// The entry is dropped for `Action::Terminate`.
    pub fn from_parts(action: Action, entry: LogEntry) -> Self {
        match action {
            Action::None => Directive::Log(entry),
            Action::Enter => Directive::Enter(entry),
            Action::Leave => Directive::Leave(entry),
            Action::Reset => Directive::Reset(entry),
            Action::Terminate => Directive::Terminate,
        }
    }
}
