//! The flat-file import engine: row lifecycle over a CSV file

use console::style;
use serde::Serialize;
use std::fmt;
use std::io::Read;

use super::config::ImportConfig;
use super::context::ImportContext;
use super::error::RowError;
use super::log::ErrorLog;
use super::route::Route;
use super::rows::{Row, RowReader};
use super::target::ImportTarget;
use crate::core::store::ArchiveStore;
use crate::entities::KeymapEntry;

/// Fixed per-row stage order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStage {
    Init,
    ColumnDispatch,
    PreSave,
    Save,
    PostSave,
    Done,
}

impl fmt::Display for RowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RowStage::Init => "init",
            RowStage::ColumnDispatch => "column-dispatch",
            RowStage::PreSave => "pre-save",
            RowStage::Save => "save",
            RowStage::PostSave => "post-save",
            RowStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Data rows read after any skipped rows
    pub rows_processed: usize,
    pub entities_created: usize,
    pub entities_updated: usize,
    /// Row errors logged
    pub errors: usize,
    /// Rows the reader could not turn into a record
    pub skipped: usize,
}

/// What a finished run hands back to the caller
#[derive(Debug)]
pub struct ImportOutcome<S> {
    /// Cross-row shared state, for the next pass
    pub status: S,
    pub log: ErrorLog,
    pub stats: ImportStats,
}

/// One import run over one file
pub struct FlatfileImport<'a, E, S> {
    config: ImportConfig<E, S>,
    store: &'a ArchiveStore,
    status: S,
    log: ErrorLog,
    stats: ImportStats,
}

impl<'a, E: ImportTarget, S> FlatfileImport<'a, E, S> {
    pub fn new(config: ImportConfig<E, S>, store: &'a ArchiveStore, status: S, log: ErrorLog) -> Self {
        Self {
            config,
            store,
            status,
            log,
            stats: ImportStats::default(),
        }
    }

    /// Process every row of `rows`, sequentially
    ///
    /// Row errors are logged and never stop the run.
    pub fn run<R: Read>(mut self, rows: RowReader<R>) -> ImportOutcome<S> {
        let source = rows.source().display().to_string();
        let errors_before = self.log.len();

        tracing::info!(source = %source, skip_rows = rows.skip_rows(), "import started");

        for row in rows {
            match row {
                Ok(row) => self.process_row(&row, &source),
                Err(failure) => {
                    tracing::debug!(row = failure.index, line = failure.line, "row skipped");
                    self.stats.skipped += 1;
                    self.log
                        .record_row(&source, failure.index, None, &failure.error);
                }
            }

            let seen = self.stats.rows_processed + self.stats.skipped;
            let every = self.config.rows_until_update;
            if every > 0 && seen % every == 0 {
                eprintln!("{} Processed {} rows", style("→").cyan(), seen);
            }
        }

        self.stats.errors = self.log.len() - errors_before;
        tracing::info!(
            source = %source,
            rows = self.stats.rows_processed,
            created = self.stats.entities_created,
            updated = self.stats.entities_updated,
            errors = self.stats.errors,
            "import finished"
        );

        ImportOutcome {
            status: self.status,
            log: self.log,
            stats: self.stats,
        }
    }

    fn process_row(&mut self, row: &Row, source: &str) {
        self.stats.rows_processed += 1;
        let index = row.index();

        let mut ctx = ImportContext::new(self.store, &mut self.status, &mut self.log, row, source);

        tracing::debug!(row = index, line = row.line(), stage = %RowStage::Init);
        if let Some(init) = self.config.row_init {
            if let Err(e) = init(&mut ctx) {
                ctx.log_error(&e);
                tracing::debug!(row = index, stage = %RowStage::Done, "target not resolved");
                return;
            }
        }

        tracing::debug!(row = index, stage = %RowStage::ColumnDispatch);
        dispatch_columns(&self.config, row, &mut ctx);

        tracing::debug!(row = index, stage = %RowStage::PreSave);
        if let Some(pre_save) = self.config.pre_save {
            if let Err(e) = pre_save(&mut ctx) {
                ctx.log_error(&e);
                return;
            }
        }

        tracing::debug!(row = index, stage = %RowStage::Save);
        let saved = match self.config.save {
            Some(save) => save(&mut ctx),
            None => default_save(&self.config, &mut ctx, &mut self.stats),
        };
        if let Err(e) = saved {
            ctx.log_error(&e);
            return;
        }

        tracing::debug!(row = index, stage = %RowStage::PostSave);
        if let Some(post_save) = self.config.post_save {
            if let Err(e) = post_save(&mut ctx) {
                ctx.log_error(&e);
            }
        }

        self.stats.entities_created += ctx.created();
        tracing::debug!(row = index, stage = %RowStage::Done);
    }
}

/// Route each column, in header order, to exactly one branch
fn dispatch_columns<E: ImportTarget, S>(
    config: &ImportConfig<E, S>,
    row: &Row,
    ctx: &mut ImportContext<'_, E, S>,
) {
    for (column, value) in row.cells() {
        ctx.set_column(Some(column));

        match config.route(column) {
            Route::Ignored => {}
            Route::Handled => {
                if let Some(handler) = config.handler(column) {
                    if let Err(e) = handler(ctx, value) {
                        ctx.log_error(&e);
                    }
                }
            }
            Route::Captured => ctx.vars.set(column, value),
            Route::Mapped => {
                // blank cells never overwrite existing data
                if value.is_empty() {
                    continue;
                }
                let (Some(target), Some(object)) = (config.target(column), ctx.object.as_mut()) else {
                    continue;
                };
                let current = object.field(target.field).unwrap_or("").to_string();
                let assigned = object.assign(target.field, target.value(&current, value));
                if let Err(e) = assigned {
                    ctx.log_error(&e);
                }
            }
        }
    }

    ctx.set_column(None);
}

/// Persist the row object and record it in the keymap when it is new
fn default_save<E: ImportTarget, S>(
    config: &ImportConfig<E, S>,
    ctx: &mut ImportContext<'_, E, S>,
    stats: &mut ImportStats,
) -> Result<(), RowError> {
    let store = ctx.store();
    let Some(object) = ctx.object.as_mut() else {
        return Ok(());
    };

    let is_new = object.id().is_none();
    let id = object.persist(store)?;

    if !is_new {
        stats.entities_updated += 1;
        tracing::debug!(kind = E::KIND, id, key = object.natural_key(), "updated");
        return Ok(());
    }

    stats.entities_created += 1;
    tracing::debug!(kind = E::KIND, id, key = object.natural_key(), "created");

    if let Some(source_name) = &config.source_name {
        let row = ctx.row();
        let source_id = config
            .key_column
            .as_deref()
            .and_then(|column| row.get(column))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| row.index().to_string());

        let entry = KeymapEntry {
            source_name: source_name.clone(),
            source_id,
            target_id: id,
            target_name: E::KIND.to_string(),
        };
        if let Err(e) = store.insert_keymap(&entry) {
            tracing::warn!(error = %e, id, "failed to record keymap entry");
        }
    }

    Ok(())
}
