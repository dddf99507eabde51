use super::task::Task;
use std::fmt;
use std::str::FromStr;

/// Which tasks the list shows. Never changes stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    /// Literal persisted under the `filter` key
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }

    /// Label for the filter control
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Completed => "Completed",
            Filter::Pending => "Pending",
        }
    }

    /// All filters in control order
    pub fn all() -> &'static [Filter] {
        &[Filter::All, Filter::Completed, Filter::Pending]
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
        }
    }

    /// Keep the tasks this filter lets through, in their original order
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "pending" => Ok(Filter::Pending),
            other => Err(format!("unknown filter '{}', expected all, completed or pending", other)),
        }
    }
}
