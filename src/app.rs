use crate::domain::{
    carry_phases, render, Background, Control, EditSession, Filter, MessageKind, Row, RowPhase,
    SaveOutcome, UiMode,
};
use crate::persistence::{AppSettings, KeyValueStorage};
use crate::store::{FilterState, TaskError, TaskStore};
use crate::ticker::{ENTER_TRANSITION, EXIT_TRANSITION};
use anyhow::Result;
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Background units per terminal cell. Blob sizes are in these units.
pub const CELL_WIDTH_UNITS: f64 = 8.0;
pub const CELL_HEIGHT_UNITS: f64 = 16.0;

/// Screen regions from the last draw, used to route mouse clicks
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    /// Inner area of the list pane (one row per line)
    pub list: Rect,
    /// First row index drawn in the list (scroll offset)
    pub list_offset: usize,
    pub toolbar: Rect,
    pub input: Rect,
    /// Edit or confirm overlay, when one is open
    pub overlay: Option<Rect>,
}

/// A row waiting for its exit transition to finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRemoval {
    pub id: u64,
    pub due: Instant,
}

/// Main application state
pub struct AppState<S: KeyValueStorage> {
    pub tasks: TaskStore<S>,
    pub filter_state: FilterState<S>,
    pub settings: AppSettings,

    /// Filter the rows were last rendered with
    pub filter: Filter,
    pub rows: Vec<Row>,
    pub has_completed: bool,
    pub selected_index: usize,

    pub ui_mode: UiMode,
    /// Mode to go back to when a modal closes
    pub return_mode: UiMode,

    /// New-task input line
    pub input: String,
    /// Message shown under the input line
    pub message: Option<(MessageKind, String)>,

    pub edit: EditSession,
    /// Validation message inside the edit overlay
    pub edit_error: Option<String>,

    /// When each still-entering row appeared; rows settle independently
    pub entered_at: HashMap<u64, Instant>,
    pub pending_removals: Vec<PendingRemoval>,

    pub background: Option<Background>,
    pub hit_areas: HitAreas,
}

impl<S: KeyValueStorage> AppState<S> {
    /// Load stored tasks (healing malformed entries) and build the first view
    pub fn new(storage: S, settings: AppSettings, background: Option<Background>) -> Result<Self> {
        let tasks = TaskStore::new(storage.clone());
        let filter_state = FilterState::new(storage);

        let loaded = tasks.load()?;
        let filter = filter_state.get()?;
        info!(tasks = loaded.len(), filter = %filter, "loaded task list");

        let mut app = Self {
            tasks,
            filter_state,
            settings,
            filter,
            rows: Vec::new(),
            has_completed: false,
            selected_index: 0,
            ui_mode: UiMode::Input,
            return_mode: UiMode::Input,
            input: String::new(),
            message: None,
            edit: EditSession::default(),
            edit_error: None,
            entered_at: HashMap::new(),
            pending_removals: Vec::new(),
            background,
            hit_areas: HitAreas::default(),
        };
        app.refresh_at(Instant::now())?;
        Ok(app)
    }

    /// Rebuild the visible rows from storage
    pub fn refresh(&mut self) -> Result<()> {
        self.refresh_at(Instant::now())
    }

    pub fn refresh_at(&mut self, now: Instant) -> Result<()> {
        self.filter = self.filter_state.get()?;
        let tasks = self.tasks.read()?;
        let leaving: Vec<u64> = self.pending_removals.iter().map(|p| p.id).collect();

        let rows = carry_phases(render(&tasks, self.filter), &self.rows, &leaving);
        for row in &rows {
            if row.phase == RowPhase::Entering && !self.rows.iter().any(|p| p.id == row.id) {
                self.entered_at.insert(row.id, now);
            }
        }
        self.entered_at
            .retain(|id, _| rows.iter().any(|r| r.id == *id && r.phase == RowPhase::Entering));

        self.rows = rows;
        self.has_completed = tasks.iter().any(|t| t.completed);
        self.clamp_selection();
        debug!(rows = self.rows.len(), filter = %self.filter, "refreshed list");
        Ok(())
    }

    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected_index = 0;
        } else if self.selected_index >= self.rows.len() {
            self.selected_index = self.rows.len() - 1;
        }
    }

    /// Id of the highlighted row
    pub fn selected_id(&self) -> Option<u64> {
        self.rows.get(self.selected_index).map(|r| r.id)
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index + 1 < self.rows.len() {
            self.selected_index += 1;
        }
    }

    /// Switch keyboard focus between the input line and the list
    pub fn toggle_focus(&mut self) {
        self.ui_mode = match self.ui_mode {
            UiMode::Input => UiMode::Browse,
            UiMode::Browse => UiMode::Input,
            other => other,
        };
    }

    pub fn input_add_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input.pop();
    }

    fn show_error(&mut self, text: impl Into<String>) {
        self.message = Some((MessageKind::Error, text.into()));
    }

    fn show_info(&mut self, text: impl Into<String>) {
        self.message = Some((MessageKind::Info, text.into()));
    }

    /// Add the input line as a new task
    pub fn submit_input(&mut self) -> Result<()> {
        match self.tasks.add(&self.input) {
            Ok(_) => {
                self.input.clear();
                self.message = None;
                self.refresh()
            }
            Err(TaskError::EmptyText) => {
                self.show_error(TaskError::EmptyText.to_string());
                Ok(())
            }
            Err(TaskError::Storage(e)) => Err(e),
        }
    }

    /// Flip completion of task `id`.
    ///
    /// The row changes in place and is not re-filtered until the next refresh.
    pub fn toggle(&mut self, id: u64) -> Result<()> {
        let updated = self.tasks.toggle(id)?;
        if let Some(task) = updated {
            if let Some(row) = self.rows.iter_mut().find(|r| r.id == id) {
                row.completed = task.completed;
            }
        }
        self.has_completed = self.tasks.has_completed()?;
        Ok(())
    }

    pub fn toggle_selected(&mut self) -> Result<()> {
        match self.selected_id() {
            Some(id) => self.toggle(id),
            None => Ok(()),
        }
    }

    /// Open (or retarget) the edit overlay on task `id`
    pub fn open_edit(&mut self, id: u64) -> Result<()> {
        let Some(task) = self.tasks.get(id)? else {
            debug!(id, "edit requested for a task that no longer exists");
            return Ok(());
        };

        self.edit.open(id, &task.text);
        self.edit_error = None;
        if !self.ui_mode.is_modal() {
            self.return_mode = self.ui_mode;
        }
        self.ui_mode = UiMode::Editing;
        Ok(())
    }

    pub fn open_edit_selected(&mut self) -> Result<()> {
        match self.selected_id() {
            Some(id) => self.open_edit(id),
            None => Ok(()),
        }
    }

    /// Save the overlay text. Blank text keeps the overlay open with a message.
    pub fn save_edit(&mut self) -> Result<()> {
        match self.edit.prepare_save() {
            SaveOutcome::NotEditing => Ok(()),
            SaveOutcome::Invalid => {
                self.edit_error = Some(TaskError::EmptyText.to_string());
                Ok(())
            }
            SaveOutcome::Commit { task_id, text } => {
                match self.tasks.update(task_id, &text) {
                    Ok(Some(_)) => {}
                    Ok(None) => debug!(id = task_id, "edited task was removed before saving"),
                    Err(TaskError::EmptyText) => {
                        self.edit_error = Some(TaskError::EmptyText.to_string());
                        return Ok(());
                    }
                    Err(TaskError::Storage(e)) => return Err(e),
                }
                self.close_edit();
                self.refresh()
            }
        }
    }

    /// Close the overlay without saving
    pub fn close_edit(&mut self) {
        self.edit.cancel();
        self.edit_error = None;
        if self.ui_mode == UiMode::Editing {
            self.ui_mode = self.return_mode;
        }
    }

    /// Start removing task `id`: the row fades out now, the store changes once
    /// the exit transition is over.
    pub fn mark_for_removal(&mut self, id: u64, now: Instant) {
        if self.pending_removals.iter().any(|p| p.id == id) {
            return;
        }
        self.pending_removals.push(PendingRemoval {
            id,
            due: now + EXIT_TRANSITION,
        });
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == id) {
            row.phase = RowPhase::Leaving;
        }
        debug!(id, "marked for removal");
    }

    pub fn delete_selected(&mut self, now: Instant) {
        if let Some(id) = self.selected_id() {
            self.mark_for_removal(id, now);
        }
    }

    /// Delete task `id` from the store and drop its row.
    ///
    /// A missing row only skips the visual update; the store is still changed.
    pub fn commit_removal(&mut self, id: u64) -> Result<()> {
        self.pending_removals.retain(|p| p.id != id);
        self.tasks.delete(id)?;

        match self.rows.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.rows.remove(idx);
            }
            None => debug!(id, "row already gone, store updated anyway"),
        }
        self.clamp_selection();
        self.has_completed = self.tasks.has_completed()?;
        Ok(())
    }

    /// Commit every removal whose transition has finished
    pub fn commit_due_removals(&mut self, now: Instant) -> Result<()> {
        let due: Vec<u64> = self
            .pending_removals
            .iter()
            .filter(|p| p.due <= now)
            .map(|p| p.id)
            .collect();
        for id in due {
            self.commit_removal(id)?;
        }
        Ok(())
    }

    /// Commit every pending removal regardless of timing (used on exit)
    pub fn flush_removals(&mut self) -> Result<()> {
        let ids: Vec<u64> = self.pending_removals.iter().map(|p| p.id).collect();
        for id in ids {
            self.commit_removal(id)?;
        }
        Ok(())
    }

    /// Switch the filter, remember it, and re-render
    pub fn set_filter(&mut self, filter: Filter) -> Result<()> {
        self.filter_state.set(filter)?;
        self.refresh()
    }

    /// Clear-all control: asks first unless confirmation is turned off
    pub fn request_clear_all(&mut self) -> Result<()> {
        if self.settings.confirm_clear_all {
            if !self.ui_mode.is_modal() {
                self.return_mode = self.ui_mode;
            }
            self.ui_mode = UiMode::ConfirmClearAll;
            Ok(())
        } else {
            self.clear_all()
        }
    }

    pub fn confirm_clear_all(&mut self) -> Result<()> {
        self.ui_mode = self.return_mode;
        self.clear_all()
    }

    pub fn cancel_clear_all(&mut self) {
        if self.ui_mode == UiMode::ConfirmClearAll {
            self.ui_mode = self.return_mode;
        }
    }

    fn clear_all(&mut self) -> Result<()> {
        self.tasks.clear_all()?;
        self.pending_removals.clear();
        self.entered_at.clear();
        self.rows.clear();
        self.has_completed = false;
        self.selected_index = 0;
        self.show_info("All tasks cleared");
        Ok(())
    }

    /// Remove completed tasks. Does nothing while the control is disabled.
    pub fn clear_completed(&mut self) -> Result<()> {
        if !self.has_completed {
            return Ok(());
        }
        let removed = self.tasks.clear_completed()?;
        self.show_info(format!("Cleared {} completed task{}", removed, if removed == 1 { "" } else { "s" }));
        self.refresh()
    }

    /// Run a toolbar control
    pub fn activate(&mut self, control: Control) -> Result<()> {
        match control {
            Control::Filter(filter) => self.set_filter(filter),
            Control::ClearCompleted => self.clear_completed(),
            Control::ClearAll => self.request_clear_all(),
        }
    }

    /// Advance animations and finish transitions
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if let Some(background) = &mut self.background {
            background.step();
        }

        for row in &mut self.rows {
            if row.phase != RowPhase::Entering {
                continue;
            }
            let settled = self
                .entered_at
                .get(&row.id)
                .map_or(true, |at| now.duration_since(*at) >= ENTER_TRANSITION);
            if settled {
                row.phase = RowPhase::Settled;
                self.entered_at.remove(&row.id);
            }
        }

        self.commit_due_removals(now)
    }

    /// Match the background bounds to a terminal of `cols` x `rows` cells
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if let Some(background) = &mut self.background {
            background.resize(cols as f64 * CELL_WIDTH_UNITS, rows as f64 * CELL_HEIGHT_UNITS);
        }
    }

    /// Show a storage failure without leaving the UI
    pub fn report_error(&mut self, error: &anyhow::Error) {
        self.show_error(format!("Error: {:#}", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Task;
    use crate::persistence::MemoryStorage;
    use crate::store::TASKS_KEY;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn app() -> AppState<MemoryStorage> {
        AppState::new(MemoryStorage::new(), AppSettings::default(), None).unwrap()
    }

    fn add(app: &mut AppState<MemoryStorage>, text: &str) -> u64 {
        app.input = text.to_string();
        app.submit_input().unwrap();
        app.rows.last().unwrap().id
    }

    fn visible_text(app: &AppState<MemoryStorage>) -> Vec<String> {
        app.rows.iter().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn test_scenario_add_toggle_filter_clear() {
        let mut app = app();
        let id = add(&mut app, "buy milk");
        assert_eq!(
            app.tasks.read().unwrap(),
            vec![Task { id, text: "buy milk".into(), completed: false }]
        );

        app.toggle(id).unwrap();
        assert!(app.tasks.get(id).unwrap().unwrap().completed);
        assert!(app.has_completed);

        app.set_filter(Filter::Pending).unwrap();
        assert!(app.rows.is_empty());

        app.set_filter(Filter::Completed).unwrap();
        assert_eq!(visible_text(&app), vec!["buy milk".to_string()]);

        app.clear_completed().unwrap();
        assert!(app.tasks.read().unwrap().is_empty());
        assert!(app.rows.is_empty());
        assert!(!app.has_completed);
    }

    #[test]
    fn test_startup_heals_storage() {
        let storage = MemoryStorage::new();
        storage
            .set_item(TASKS_KEY, r#"[{"id": 1, "userText": "x", "completed": false}, {"foo": "bad"}]"#)
            .unwrap();

        let app = AppState::new(storage.clone(), AppSettings::default(), None).unwrap();
        assert_eq!(visible_text(&app), vec!["x".to_string()]);
        assert_eq!(
            storage.get_item(TASKS_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1,"userText":"x","completed":false}]"#)
        );
    }

    #[test]
    fn test_blank_input_shows_message_and_keeps_store() {
        let mut app = app();
        app.input = "   ".to_string();
        app.submit_input().unwrap();

        assert_eq!(
            app.message,
            Some((MessageKind::Error, "Please enter a valid task".to_string()))
        );
        assert_eq!(app.input, "   ");
        assert!(app.tasks.read().unwrap().is_empty());
    }

    #[test]
    fn test_successful_add_clears_input_and_message() {
        let mut app = app();
        app.input = "  ".to_string();
        app.submit_input().unwrap();
        app.input = "real".to_string();
        app.submit_input().unwrap();

        assert!(app.input.is_empty());
        assert_eq!(app.message, None);
        assert_eq!(app.rows[0].phase, RowPhase::Entering);
    }

    #[test]
    fn test_toggle_does_not_refilter_visible_rows() {
        let mut app = app();
        let id = add(&mut app, "a");
        app.set_filter(Filter::Pending).unwrap();

        app.toggle(id).unwrap();
        assert_eq!(app.rows.len(), 1);
        assert!(app.rows[0].completed);

        app.refresh().unwrap();
        assert!(app.rows.is_empty());
    }

    #[test]
    fn test_filter_survives_restart() {
        let storage = MemoryStorage::new();
        let mut app = AppState::new(storage.clone(), AppSettings::default(), None).unwrap();
        app.set_filter(Filter::Completed).unwrap();

        let reopened = AppState::new(storage, AppSettings::default(), None).unwrap();
        assert_eq!(reopened.filter, Filter::Completed);
    }

    #[test]
    fn test_edit_session_flow() {
        let mut app = app();
        let id = add(&mut app, "old");
        app.ui_mode = UiMode::Browse;

        app.open_edit(id).unwrap();
        assert_eq!(app.ui_mode, UiMode::Editing);
        assert_eq!(app.edit.buffer(), Some("old"));

        for _ in 0..3 {
            app.edit.backspace();
        }
        app.save_edit().unwrap();
        assert_eq!(app.ui_mode, UiMode::Editing);
        assert_eq!(app.edit_error.as_deref(), Some("Please enter a valid task"));
        assert_eq!(app.tasks.get(id).unwrap().unwrap().text, "old");

        for c in " new ".chars() {
            app.edit.push_char(c);
        }
        app.save_edit().unwrap();
        assert_eq!(app.ui_mode, UiMode::Browse);
        assert_eq!(app.edit, EditSession::Idle);
        assert_eq!(app.edit_error, None);
        assert_eq!(visible_text(&app), vec!["new".to_string()]);
    }

    #[test]
    fn test_edit_retargets_and_cancel_discards() {
        let mut app = app();
        let a = add(&mut app, "a");
        let b = add(&mut app, "b");

        app.open_edit(a).unwrap();
        app.edit.push_char('!');
        app.open_edit(b).unwrap();
        assert_eq!(app.edit.task_id(), Some(b));
        assert_eq!(app.edit.buffer(), Some("b"));
        assert_eq!(app.return_mode, UiMode::Input);

        app.close_edit();
        assert_eq!(app.ui_mode, UiMode::Input);
        assert_eq!(visible_text(&app), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_two_phase_delete() {
        let mut app = app();
        let a = add(&mut app, "a");
        let b = add(&mut app, "b");
        let now = Instant::now();

        app.mark_for_removal(a, now);
        assert_eq!(app.rows[0].phase, RowPhase::Leaving);
        assert_eq!(app.tasks.read().unwrap().len(), 2);

        // A refresh mid-transition keeps the row leaving
        app.refresh_at(now).unwrap();
        assert_eq!(app.rows[0].phase, RowPhase::Leaving);

        app.tick(now + Duration::from_millis(100)).unwrap();
        assert_eq!(app.tasks.read().unwrap().len(), 2);

        app.tick(now + EXIT_TRANSITION).unwrap();
        assert_eq!(app.tasks.read().unwrap().iter().map(|t| t.id).collect::<Vec<_>>(), vec![b]);
        assert_eq!(app.rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b]);
        assert!(app.pending_removals.is_empty());
    }

    #[test]
    fn test_commit_removal_without_row_still_deletes() {
        let mut app = app();
        let id = add(&mut app, "a");
        app.rows.clear();

        app.commit_removal(id).unwrap();
        assert!(app.tasks.read().unwrap().is_empty());
    }

    #[test]
    fn test_flush_removals() {
        let mut app = app();
        let a = add(&mut app, "a");
        let b = add(&mut app, "b");
        let now = Instant::now();
        app.mark_for_removal(a, now);
        app.mark_for_removal(b, now);
        app.mark_for_removal(b, now);
        assert_eq!(app.pending_removals.len(), 2);

        app.flush_removals().unwrap();
        assert!(app.tasks.read().unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_needs_confirmation() {
        let mut app = app();
        add(&mut app, "a");

        app.request_clear_all().unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmClearAll);
        app.cancel_clear_all();
        assert_eq!(app.ui_mode, UiMode::Input);
        assert_eq!(app.rows.len(), 1);

        app.request_clear_all().unwrap();
        app.confirm_clear_all().unwrap();
        assert_eq!(app.ui_mode, UiMode::Input);
        assert!(app.rows.is_empty());
        assert!(app.tasks.read().unwrap().is_empty());

        app.request_clear_all().unwrap();
        app.confirm_clear_all().unwrap();
        assert!(app.tasks.read().unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_without_confirmation_setting() {
        let settings = AppSettings { confirm_clear_all: false, ..AppSettings::default() };
        let mut app = AppState::new(MemoryStorage::new(), settings, None).unwrap();
        add(&mut app, "a");

        app.request_clear_all().unwrap();
        assert_eq!(app.ui_mode, UiMode::Input);
        assert!(app.rows.is_empty());
    }

    #[test]
    fn test_clear_completed_disabled_without_completed() {
        let mut app = app();
        add(&mut app, "a");
        app.clear_completed().unwrap();
        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.message, None);
    }

    #[test]
    fn test_entering_rows_settle() {
        let mut app = app();
        let id = add(&mut app, "a");
        let start = app.entered_at[&id];
        assert_eq!(app.rows[0].phase, RowPhase::Entering);

        app.tick(start + ENTER_TRANSITION).unwrap();
        assert_eq!(app.rows[0].phase, RowPhase::Settled);
    }

    #[test]
    fn test_each_row_settles_on_its_own_clock() {
        let mut app = app();
        let start = Instant::now();
        app.tasks.add_at("a", 1).unwrap();
        app.refresh_at(start).unwrap();

        let later = start + ENTER_TRANSITION / 2;
        app.tasks.add_at("b", 2).unwrap();
        app.refresh_at(later).unwrap();

        app.tick(start + ENTER_TRANSITION).unwrap();
        let phases: Vec<RowPhase> = app.rows.iter().map(|r| r.phase).collect();
        assert_eq!(phases, vec![RowPhase::Settled, RowPhase::Entering]);

        app.tick(later + ENTER_TRANSITION).unwrap();
        assert!(app.rows.iter().all(|r| r.phase == RowPhase::Settled));
        assert!(app.entered_at.is_empty());
    }

    #[test]
    fn test_selection_stays_in_bounds() {
        let mut app = app();
        let a = add(&mut app, "a");
        add(&mut app, "b");
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.commit_removal(app.selected_id().unwrap()).unwrap();
        assert_eq!(app.selected_id(), Some(a));
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_activate_controls() {
        let mut app = app();
        let id = add(&mut app, "a");
        app.toggle(id).unwrap();

        app.activate(Control::Filter(Filter::Pending)).unwrap();
        assert_eq!(app.filter, Filter::Pending);
        app.activate(Control::ClearCompleted).unwrap();
        assert!(app.tasks.read().unwrap().is_empty());
        app.activate(Control::ClearAll).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmClearAll);
    }

    #[test]
    fn test_tick_moves_background_and_resize_rescales() {
        let mut rng = StdRng::seed_from_u64(3);
        let background = Background::new(&mut rng, 2, 800.0, 400.0);
        let before = background.blobs.clone();
        let mut app =
            AppState::new(MemoryStorage::new(), AppSettings::default(), Some(background)).unwrap();

        app.tick(Instant::now()).unwrap();
        let bg = app.background.as_ref().unwrap();
        assert_ne!(bg.blobs, before);

        app.resize(10, 5);
        let bg = app.background.as_ref().unwrap();
        assert_eq!((bg.width, bg.height), (80.0, 80.0));
    }
}
