pub mod background;
pub mod edit;
pub mod enums;
pub mod filter;
pub mod task;
pub mod views;

pub use background::{Background, Blob};
pub use edit::{EditSession, SaveOutcome};
pub use enums::{MessageKind, UiMode};
pub use filter::Filter;
pub use task::{next_task_id, task_from_value, Task};
pub use views::{
    carry_phases, hit_test, render, toolbar_hit, toolbar_layout, Control, Row, RowPhase,
    RowTarget, AFFORDANCE_WIDTH, CONTROL_GAP,
};
