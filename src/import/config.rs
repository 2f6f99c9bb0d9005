//! Import configuration: column routing rules and lifecycle hooks

use std::collections::{BTreeMap, BTreeSet};

use super::context::ImportContext;
use super::error::RowError;
use super::route::Route;

/// Named column handler, called with the column's raw value
pub type ColumnHandler<E, S> = fn(&mut ImportContext<'_, E, S>, &str) -> Result<(), RowError>;

/// Row lifecycle hook (row-init, pre-save, save, post-save)
pub type RowHook<E, S> = fn(&mut ImportContext<'_, E, S>) -> Result<(), RowError>;

/// Mapped column transform: `(current field value, raw column value) -> new value`
pub type Transform = fn(&str, &str) -> String;

/// Destination of a mapped column
#[derive(Clone, Copy)]
pub struct ColumnTarget {
    pub field: &'static str,
    pub transform: Option<Transform>,
}

impl ColumnTarget {
    /// Apply the transform, or take the raw value as-is
    pub fn value(&self, current: &str, raw: &str) -> String {
        match self.transform {
            Some(transform) => transform(current, raw),
            None => raw.to_string(),
        }
    }
}

/// Everything that defines one import run, built once up front
pub struct ImportConfig<E, S> {
    column_map: BTreeMap<String, ColumnTarget>,
    captured: BTreeSet<String>,
    ignored: BTreeSet<String>,
    handlers: BTreeMap<String, ColumnHandler<E, S>>,
    pub(crate) row_init: Option<RowHook<E, S>>,
    pub(crate) pre_save: Option<RowHook<E, S>>,
    pub(crate) save: Option<RowHook<E, S>>,
    pub(crate) post_save: Option<RowHook<E, S>>,
    pub(crate) rows_until_update: usize,
    pub(crate) source_name: Option<String>,
    pub(crate) key_column: Option<String>,
}

impl<E, S> Default for ImportConfig<E, S> {
    fn default() -> Self {
        Self {
            column_map: BTreeMap::new(),
            captured: BTreeSet::new(),
            ignored: BTreeSet::new(),
            handlers: BTreeMap::new(),
            row_init: None,
            pre_save: None,
            save: None,
            post_save: None,
            rows_until_update: 0,
            source_name: None,
            key_column: None,
        }
    }
}

impl<E, S> ImportConfig<E, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a column straight into an entity field
    pub fn map_column(mut self, column: &str, field: &'static str) -> Self {
        self.column_map.insert(
            column.to_string(),
            ColumnTarget {
                field,
                transform: None,
            },
        );
        self
    }

    /// Transform a column into an entity field
    pub fn map_column_with(mut self, column: &str, field: &'static str, transform: Transform) -> Self {
        self.column_map.insert(
            column.to_string(),
            ColumnTarget {
                field,
                transform: Some(transform),
            },
        );
        self
    }

    /// Store columns raw into the row status variables
    pub fn capture(mut self, columns: &[&str]) -> Self {
        self.captured.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn ignore(mut self, columns: &[&str]) -> Self {
        self.ignored.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Register a named handler for one column
    pub fn handle(mut self, column: &str, handler: ColumnHandler<E, S>) -> Self {
        self.handlers.insert(column.to_string(), handler);
        self
    }

    /// Register the same handler for several columns
    pub fn handle_all<'c>(
        mut self,
        columns: impl IntoIterator<Item = &'c str>,
        handler: ColumnHandler<E, S>,
    ) -> Self {
        for column in columns {
            self.handlers.insert(column.to_string(), handler);
        }
        self
    }

    pub fn on_row_init(mut self, hook: RowHook<E, S>) -> Self {
        self.row_init = Some(hook);
        self
    }

    pub fn on_pre_save(mut self, hook: RowHook<E, S>) -> Self {
        self.pre_save = Some(hook);
        self
    }

    /// Replace the default save (persist the target entity)
    pub fn on_save(mut self, hook: RowHook<E, S>) -> Self {
        self.save = Some(hook);
        self
    }

    pub fn on_post_save(mut self, hook: RowHook<E, S>) -> Self {
        self.post_save = Some(hook);
        self
    }

    /// Print a progress line every `rows` rows (0 disables)
    pub fn rows_until_update(mut self, rows: usize) -> Self {
        self.rows_until_update = rows;
        self
    }

    /// Record a keymap entry under this source for every entity created
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// Column holding the legacy identifier recorded in the keymap
    ///
    /// Without one, or when the cell is blank, the row number is used.
    pub fn key_column(mut self, column: &str) -> Self {
        self.key_column = Some(column.to_string());
        self
    }

    /// Decide which single branch handles a column
    pub fn route(&self, column: &str) -> Route {
        if self.ignored.contains(column) {
            Route::Ignored
        } else if self.handlers.contains_key(column) {
            Route::Handled
        } else if self.captured.contains(column) {
            Route::Captured
        } else if self.column_map.contains_key(column) {
            Route::Mapped
        } else {
            Route::Ignored
        }
    }

    pub(crate) fn handler(&self, column: &str) -> Option<ColumnHandler<E, S>> {
        self.handlers.get(column).copied()
    }

    pub(crate) fn target(&self, column: &str) -> Option<&ColumnTarget> {
        self.column_map.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::accumulate::appended;

    type Config = ImportConfig<(), ()>;

    fn noop(_: &mut ImportContext<'_, (), ()>, _: &str) -> Result<(), RowError> {
        Ok(())
    }

    fn config() -> Config {
        Config::new()
            .map_column("TITLE", "title")
            .map_column("TYPE", "notes")
            .capture(&["TYPE", "DONOR", "RecordID"])
            .handle("TYPE", noop)
            .handle("DATE", noop)
            .ignore(&["RecordID"])
    }

    #[test]
    fn test_route_precedence() {
        let config = config();
        assert_eq!(config.route("RecordID"), Route::Ignored);
        assert_eq!(config.route("TYPE"), Route::Handled);
        assert_eq!(config.route("DONOR"), Route::Captured);
        assert_eq!(config.route("TITLE"), Route::Mapped);
        assert_eq!(config.route("Unlisted"), Route::Ignored);
    }

    #[test]
    fn test_column_target_transform() {
        let plain = ColumnTarget {
            field: "notes",
            transform: None,
        };
        let appending = ColumnTarget {
            field: "notes",
            transform: Some(appended),
        };
        assert_eq!(plain.value("old", "new"), "new");
        assert_eq!(appending.value("old", "new"), "old\nnew");
    }
}
