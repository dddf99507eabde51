//! Non-interactive subcommands. They share the stores with the TUI, so a task
//! added here shows up the next time the list is opened.

use crate::domain::{Filter, Task};
use crate::persistence::KeyValueStorage;
use crate::store::{FilterState, TaskError, TaskStore};
use anyhow::{bail, Result};
use std::io::Write;

fn validation(err: TaskError) -> anyhow::Error {
    match err {
        TaskError::Storage(e) => e,
        other => anyhow::anyhow!(other),
    }
}

fn format_task(task: &Task) -> String {
    let marker = if task.completed { "[x]" } else { "[ ]" };
    format!("{:>15}  {} {}", task.id, marker, task.text)
}

pub fn add<S: KeyValueStorage, W: Write>(storage: S, text: &str, out: &mut W) -> Result<()> {
    let task = TaskStore::new(storage).add(text).map_err(validation)?;
    writeln!(out, "Added {}", format_task(&task).trim_start())?;
    Ok(())
}

/// Print tasks under `filter`, or under the remembered filter when none is given
pub fn list<S: KeyValueStorage, W: Write>(storage: S, filter: Option<Filter>, out: &mut W) -> Result<()> {
    let tasks = TaskStore::new(storage.clone()).load()?;
    let filter = match filter {
        Some(filter) => filter,
        None => FilterState::new(storage).get()?,
    };

    let visible = filter.apply(&tasks);
    if visible.is_empty() {
        match filter {
            Filter::All => writeln!(out, "No tasks")?,
            other => writeln!(out, "No {} tasks", other)?,
        }
        return Ok(());
    }
    for task in &visible {
        writeln!(out, "{}", format_task(task))?;
    }
    Ok(())
}

/// Remember `filter` for the list view
pub fn set_filter<S: KeyValueStorage, W: Write>(storage: S, filter: Filter, out: &mut W) -> Result<()> {
    FilterState::new(storage).set(filter)?;
    writeln!(out, "Filter set to {}", filter)?;
    Ok(())
}

pub fn toggle<S: KeyValueStorage, W: Write>(storage: S, id: u64, out: &mut W) -> Result<()> {
    match TaskStore::new(storage).toggle(id)? {
        Some(task) => writeln!(out, "{}", format_task(&task).trim_start())?,
        None => bail!("No task with id {}", id),
    }
    Ok(())
}

pub fn edit<S: KeyValueStorage, W: Write>(storage: S, id: u64, text: &str, out: &mut W) -> Result<()> {
    match TaskStore::new(storage).update(id, text).map_err(validation)? {
        Some(task) => writeln!(out, "{}", format_task(&task).trim_start())?,
        None => bail!("No task with id {}", id),
    }
    Ok(())
}

pub fn delete<S: KeyValueStorage, W: Write>(storage: S, id: u64, out: &mut W) -> Result<()> {
    if !TaskStore::new(storage).delete(id)? {
        bail!("No task with id {}", id);
    }
    writeln!(out, "Deleted {}", id)?;
    Ok(())
}

pub fn clear_completed<S: KeyValueStorage, W: Write>(storage: S, out: &mut W) -> Result<()> {
    let removed = TaskStore::new(storage).clear_completed()?;
    writeln!(out, "Cleared {} completed task{}", removed, if removed == 1 { "" } else { "s" })?;
    Ok(())
}

/// `--yes` stands in for the confirmation prompt
pub fn clear_all<S: KeyValueStorage, W: Write>(storage: S, yes: bool, out: &mut W) -> Result<()> {
    if !yes {
        bail!("Refusing to clear all tasks without --yes");
    }
    TaskStore::new(storage).clear_all()?;
    writeln!(out, "All tasks cleared")?;
    Ok(())
}
