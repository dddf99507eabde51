/// Where keyboard input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Typing into the new-task line
    Input,
    /// Moving through the list with the arrow keys
    Browse,
    /// Edit overlay is open
    Editing,
    /// Asking before wiping every task
    ConfirmClearAll,
}

impl UiMode {
    /// Modes that draw a modal over the list
    pub fn is_modal(&self) -> bool {
        matches!(self, UiMode::Editing | UiMode::ConfirmClearAll)
    }
}

/// Severity of the status line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}
