use super::filter::Filter;
use super::task::Task;

/// Where a row is in its enter/leave animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowPhase {
    /// Just appeared, drawn dimmed until it settles
    Entering,
    Settled,
    /// Marked for removal, still in the store until the exit transition ends
    Leaving,
}

/// One visible line of the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub phase: RowPhase,
}

impl Row {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
            phase: RowPhase::Settled,
        }
    }
}

/// Project the stored tasks into the rows the list shows, in insertion order
pub fn render(tasks: &[Task], filter: Filter) -> Vec<Row> {
    tasks
        .iter()
        .filter(|t| filter.matches(t))
        .map(Row::from_task)
        .collect()
}

/// Carry animation phases over from the previous frame.
///
/// Rows that were not visible before enter; rows queued for removal keep leaving.
pub fn carry_phases(rows: Vec<Row>, previous: &[Row], leaving: &[u64]) -> Vec<Row> {
    rows.into_iter()
        .map(|mut row| {
            row.phase = if leaving.contains(&row.id) {
                RowPhase::Leaving
            } else {
                match previous.iter().find(|p| p.id == row.id) {
                    Some(p) if p.phase == RowPhase::Entering => RowPhase::Entering,
                    Some(_) => RowPhase::Settled,
                    None => RowPhase::Entering,
                }
            };
            row
        })
        .collect()
}

/// Width of the "✎ ✗" affordance strip at the right end of each row
pub const AFFORDANCE_WIDTH: u16 = 6;

/// Which part of a row a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Body,
    Edit,
    Delete,
}

/// Classify a click at `column` (relative to the row start) on a row `width` cells wide.
///
/// The strip is laid out as `" ✎  ✗ "`: the left half edits, the right half deletes.
/// Affordance hits are never also treated as body hits.
pub fn hit_test(column: u16, width: u16) -> RowTarget {
    if width <= AFFORDANCE_WIDTH {
        return RowTarget::Body;
    }
    let strip_start = width - AFFORDANCE_WIDTH;
    if column < strip_start {
        RowTarget::Body
    } else if column < strip_start + AFFORDANCE_WIDTH / 2 {
        RowTarget::Edit
    } else {
        RowTarget::Delete
    }
}

/// A clickable control in the toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Filter(Filter),
    ClearCompleted,
    ClearAll,
}

impl Control {
    pub fn label(&self) -> String {
        match self {
            Control::Filter(f) => format!("[{}]", f.label()),
            Control::ClearCompleted => "[Clear completed]".to_string(),
            Control::ClearAll => "[Clear all]".to_string(),
        }
    }
}

/// Gap between toolbar controls
pub const CONTROL_GAP: u16 = 1;

/// Toolbar controls with their `[start, end)` columns
pub fn toolbar_layout() -> Vec<(Control, u16, u16)> {
    let controls = Filter::all()
        .iter()
        .map(|f| Control::Filter(*f))
        .chain([Control::ClearCompleted, Control::ClearAll]);

    let mut x = 0u16;
    let mut layout = Vec::new();
    for control in controls {
        let width = control.label().chars().count() as u16;
        layout.push((control, x, x + width));
        x += width + CONTROL_GAP;
    }
    layout
}

/// Which toolbar control (if any) is under `column`
pub fn toolbar_hit(column: u16) -> Option<Control> {
    toolbar_layout()
        .into_iter()
        .find(|(_, start, end)| column >= *start && column < *end)
        .map(|(control, _, _)| control)
}
