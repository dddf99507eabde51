use super::TaskError;
use crate::domain::Filter;
use crate::persistence::KeyValueStorage;
use tracing::debug;

/// Storage key holding the selected filter literal
pub const FILTER_KEY: &str = "filter";

/// Remembers which filter the list is showing, independently of the tasks
#[derive(Debug, Clone)]
pub struct FilterState<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> FilterState<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Current filter; `all` when nothing (or nothing recognisable) is stored
    pub fn get(&self) -> Result<Filter, TaskError> {
        let stored = self.storage.get_item(FILTER_KEY)?;
        let filter = match stored.as_deref() {
            None => Filter::default(),
            Some(raw) => raw.parse::<Filter>().unwrap_or_else(|e| {
                debug!(error = %e, "ignoring stored filter");
                Filter::default()
            }),
        };
        Ok(filter)
    }

    pub fn set(&self, filter: Filter) -> Result<(), TaskError> {
        self.storage.set_item(FILTER_KEY, filter.as_str())?;
        debug!(filter = %filter, "filter set");
        Ok(())
    }
}
