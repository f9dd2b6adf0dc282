use serde_json::Value;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use waypoint_core::{ColumnUpdate, CoreResult, EntityClient};
use waypoint_shared::{dates, stringify, Record};
use waypoint_table::{FilterValue, SortSpec, TablePage, TablePipeline, ViewState};

use crate::bulk::{run_with_concurrency, BulkReport};
use crate::cancel::{FetchSequence, FetchTicket};
use crate::changes::{diff_record, ChangeSet};
use crate::entities::{EntityKind, EntitySchema};
use crate::reconcile::{Reconciler, Speculation};
use crate::validation::{validate_record, validate_updates};
use crate::AdminError;

/// One admin table: its fetched rows, the current view and the write paths.
///
/// Writes apply a speculative edit locally, call the backend, then refetch
/// and replace the rows with the server's list.
#[derive(Debug)]
pub struct EntityTable {
    schema: &'static EntitySchema,
    pipeline: TablePipeline,
    view: ViewState,
    data: Reconciler,
    fetches: FetchSequence,
    concurrency: usize,
}

impl EntityTable {
    pub fn new(kind: EntityKind, page_size: usize, concurrency: usize) -> Result<Self, AdminError> {
        let schema = kind.schema();
        Ok(Self {
            schema,
            pipeline: TablePipeline::new(schema.table_config()),
            view: schema.initial_view(page_size)?,
            data: Reconciler::new(schema.id_field),
            fetches: FetchSequence::new(),
            concurrency,
        })
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn records(&self) -> &[Record] {
        self.data.records()
    }

    pub fn page(&self) -> TablePage<&Record> {
        self.pipeline.run(self.data.records(), &self.view)
    }

    // ========================================================================
    // View state
    // ========================================================================

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn search(&mut self, text: impl Into<String>) {
        self.view = self.view.with_search(text);
    }

    pub fn filter(&mut self, name: &str, value: impl Into<FilterValue>) -> Result<(), AdminError> {
        if self.schema.facet(name).is_none() {
            return Err(AdminError::UnknownFacet(name.to_string()));
        }
        self.view = self.view.with_facet(name, value);
        Ok(())
    }

    pub fn sort_by(&mut self, sort: SortSpec) {
        self.view = self.view.with_sort(sort);
    }

    /// Same column flips direction, a new column starts ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        self.view = self.view.with_sort_toggled(column);
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), AdminError> {
        self.view = self.view.with_page(page)?;
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), AdminError> {
        self.view = self.view.with_page_size(page_size)?;
        Ok(())
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetches.begin()
    }

    /// Returns false, leaving the rows alone, for a superseded or cancelled
    /// ticket.
    pub fn commit(&mut self, ticket: &FetchTicket, records: Vec<Record>) -> bool {
        if !self.fetches.is_current(ticket) {
            debug!(
                "Dropping stale {} fetch (generation {})",
                self.schema.collection,
                ticket.generation()
            );
            return false;
        }
        self.data.settle(records);
        true
    }

    pub async fn refresh(&mut self, client: &dyn EntityClient) -> Result<usize, AdminError> {
        let ticket = self.begin_fetch();
        let records = client.list(self.schema.endpoint()).await?;
        let count = records.len();
        if self.commit(&ticket, records) {
            Ok(count)
        } else {
            Err(AdminError::Cancelled)
        }
    }

    async fn resync(&mut self, client: &dyn EntityClient, outcome: CoreResult<()>) -> Result<(), AdminError> {
        match outcome {
            Ok(()) => {
                if let Err(e) = self.refresh(client).await {
                    warn!("Refetch of {} after write failed: {}", self.schema.collection, e);
                }
                Ok(())
            }
            Err(e) => {
                error!("Write to {} failed: {}", self.schema.collection, e);
                if let Err(refetch) = self.refresh(client).await {
                    warn!("Refetch of {} failed too: {}", self.schema.collection, refetch);
                    self.data.discard();
                }
                Err(AdminError::Remote(e))
            }
        }
    }

    // ========================================================================
    // Writes
    // ========================================================================

    fn normalize_dates(&self, record: &mut Record) {
        for column in self.schema.date_columns {
            if let Some(display) = record.get(column).and_then(|v| dates::canonical(&stringify(v))) {
                record.insert(*column, display);
            }
        }
    }

    /// Assigns a fresh UUID when the identity field is empty.
    pub async fn create(&mut self, client: &dyn EntityClient, mut record: Record) -> Result<Record, AdminError> {
        let id_field = self.schema.id_field;
        if record.id(id_field).is_none() {
            record.insert(id_field, Uuid::new_v4().to_string());
        }
        self.normalize_dates(&mut record);
        validate_record(self.schema, &record).map_err(AdminError::Validation)?;

        info!("Creating {} {}", self.schema.collection, record.text(id_field));
        self.data.apply(&Speculation::Insert(record.clone()));
        let outcome = client.create(self.schema.endpoint(), &record).await;
        self.resync(client, outcome).await?;
        Ok(record)
    }

    /// Sends only the fields that differ from the loaded row.
    pub async fn edit(&mut self, client: &dyn EntityClient, id: &str, edited: Record) -> Result<ChangeSet, AdminError> {
        let original = self
            .data
            .find(id)
            .cloned()
            .ok_or_else(|| AdminError::NotFound(id.to_string()))?;

        let mut merged = original.clone();
        for (column, value) in edited.fields() {
            merged.insert(column.clone(), value.clone());
        }
        validate_record(self.schema, &merged).map_err(AdminError::Validation)?;

        let changes = diff_record(self.schema, &original, &edited);
        if changes.is_empty() {
            debug!("No changes to {} {}", self.schema.collection, id);
            return Ok(changes);
        }

        self.data.apply(&Speculation::Patch {
            id: id.to_string(),
            updates: changes.updates().to_vec(),
        });
        let outcome = changes.submit(client, self.schema.endpoint(), id).await;
        self.resync(client, outcome).await?;
        Ok(changes)
    }

    pub async fn delete(&mut self, client: &dyn EntityClient, id: &str) -> Result<(), AdminError> {
        info!("Deleting {} {}", self.schema.collection, id);
        self.data.apply(&Speculation::Remove(vec![id.to_string()]));
        let outcome = client.delete(self.schema.endpoint(), id).await;
        self.resync(client, outcome).await
    }

    async fn settle_bulk(&mut self, client: &dyn EntityClient, report: &BulkReport) {
        info!(
            "Bulk operation on {}: {} succeeded, {} failed",
            self.schema.collection,
            report.succeeded.len(),
            report.failed.len()
        );
        if let Err(e) = self.refresh(client).await {
            warn!("Refetch of {} after bulk operation failed: {}", self.schema.collection, e);
            self.data.discard();
        }
    }

    pub async fn bulk_delete(&mut self, client: &dyn EntityClient, ids: &[String]) -> Result<BulkReport, AdminError> {
        if ids.is_empty() {
            return Ok(BulkReport::default());
        }

        self.data.apply(&Speculation::Remove(ids.to_vec()));
        let endpoint = self.schema.endpoint();
        let tasks: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| async move { client.delete(endpoint, &id).await })
            .collect();
        let outcomes = run_with_concurrency(tasks, self.concurrency).await;

        let report = BulkReport::collect(ids, outcomes);
        self.settle_bulk(client, &report).await;
        Ok(report)
    }

    /// Applies the same column updates to every id.
    pub async fn bulk_update(
        &mut self,
        client: &dyn EntityClient,
        ids: &[String],
        updates: &[ColumnUpdate],
    ) -> Result<BulkReport, AdminError> {
        let id_field = self.schema.id_field;
        if updates.iter().any(|u| u.column == id_field) {
            return Err(AdminError::IdentityUpdate(id_field.to_string()));
        }
        validate_updates(self.schema, updates).map_err(AdminError::Validation)?;
        if ids.is_empty() || updates.is_empty() {
            return Ok(BulkReport::default());
        }

        let updates: Vec<ColumnUpdate> = updates
            .iter()
            .map(|u| {
                let display = self
                    .schema
                    .is_date_column(&u.column)
                    .then(|| dates::canonical(&stringify(&u.value)))
                    .flatten();
                match display {
                    Some(display) => ColumnUpdate::new(u.column.clone(), Value::String(display)),
                    None => u.clone(),
                }
            })
            .collect();

        for id in ids {
            self.data.apply(&Speculation::Patch {
                id: id.clone(),
                updates: updates.clone(),
            });
        }

        let endpoint = self.schema.endpoint();
        let tasks: Vec<_> = ids
            .iter()
            .cloned()
            .map(|id| {
                let changes = ChangeSet::from(updates.clone());
                async move { changes.submit(client, endpoint, &id).await }
            })
            .collect();
        let outcomes = run_with_concurrency(tasks, self.concurrency).await;

        let report = BulkReport::collect(ids, outcomes);
        self.settle_bulk(client, &report).await;
        Ok(report)
    }
}

impl Drop for EntityTable {
    fn drop(&mut self) {
        self.fetches.cancel();
    }
}
