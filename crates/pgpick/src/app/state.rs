use crate::pgpass::Connection;

/// Input mode of the picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the list.
    Browsing,
    /// Typing into the filter box.
    EditingFilter,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Browsing => "BROWSE",
            Mode::EditingFilter => "FILTER",
        }
    }
}

/// Events accepted while browsing the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseEvent {
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    /// Move up by the given number of rows.
    PageUp(usize),
    /// Move down by the given number of rows.
    PageDown(usize),
    StartFilter,
    ClearFilter,
    ConfirmSelection,
    Reload,
    Quit,
}

/// Events accepted while the filter box is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterEvent {
    /// Apply the buffer contents as the new filter.
    Commit(String),
    /// Close the box, keeping the current filter.
    Cancel,
    Quit,
}

/// An abstract input event, tagged with the mode it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Browse(BrowseEvent),
    Filter(FilterEvent),
}

/// What the process should do once the picker closes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExitAction {
    /// Exit without side effects.
    None,
    /// Launch a client for this connection.
    ConnectToSelected(Connection),
}

/// Outcome of handling one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit(ExitAction),
}

/// One-line feedback shown under the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub fn message(&self) -> &str {
        match self {
            Status::Info(msg) | Status::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}
