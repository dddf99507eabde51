/// The single edit overlay.
///
/// There is only ever one; opening it for another task retargets it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        task_id: u64,
        buffer: String,
    },
}

/// What a save attempt should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing is being edited
    NotEditing,
    /// The buffer is blank; stay open and tell the user
    Invalid,
    /// Write `text` to task `task_id`
    Commit { task_id: u64, text: String },
}

impl EditSession {
    /// Open (or retarget) the overlay with the task's current text
    pub fn open(&mut self, task_id: u64, text: &str) {
        *self = EditSession::Editing {
            task_id,
            buffer: text.to_string(),
        };
    }

    /// Close without saving
    pub fn cancel(&mut self) {
        *self = EditSession::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing { .. })
    }

    pub fn task_id(&self) -> Option<u64> {
        match self {
            EditSession::Editing { task_id, .. } => Some(*task_id),
            EditSession::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            EditSession::Editing { buffer, .. } => Some(buffer),
            EditSession::Idle => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let EditSession::Editing { buffer, .. } = self {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let EditSession::Editing { buffer, .. } = self {
            buffer.pop();
        }
    }

    /// Decide what saving means right now. Does not change state; the caller
    /// closes the session once the store accepted the text.
    pub fn prepare_save(&self) -> SaveOutcome {
        match self {
            EditSession::Idle => SaveOutcome::NotEditing,
            EditSession::Editing { task_id, buffer } => {
                let text = buffer.trim();
                if text.is_empty() {
                    SaveOutcome::Invalid
                } else {
                    SaveOutcome::Commit {
                        task_id: *task_id,
                        text: text.to_string(),
                    }
                }
            }
        }
    }
}
