use serde_json::Value;
use waypoint_core::{ColumnUpdate, CoreResult, EntityClient, Endpoint};
use waypoint_shared::{dates, stringify, Record};

use crate::entities::EntitySchema;

/// What an edit dialog has to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeSet {
    Unchanged,
    Single(ColumnUpdate),
    Many(Vec<ColumnUpdate>),
}

impl From<Vec<ColumnUpdate>> for ChangeSet {
    fn from(mut updates: Vec<ColumnUpdate>) -> Self {
        match updates.len() {
            0 => ChangeSet::Unchanged,
            1 => ChangeSet::Single(updates.remove(0)),
            _ => ChangeSet::Many(updates),
        }
    }
}

impl ChangeSet {
    pub fn len(&self) -> usize {
        match self {
            ChangeSet::Unchanged => 0,
            ChangeSet::Single(_) => 1,
            ChangeSet::Many(updates) => updates.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ChangeSet::Unchanged)
    }

    pub fn updates(&self) -> &[ColumnUpdate] {
        match self {
            ChangeSet::Unchanged => &[],
            ChangeSet::Single(update) => std::slice::from_ref(update),
            ChangeSet::Many(updates) => updates,
        }
    }

    /// One change goes out as a single-field PUT, several as one bulk PUT.
    pub async fn submit(&self, client: &dyn EntityClient, endpoint: Endpoint<'_>, id: &str) -> CoreResult<()> {
        match self {
            ChangeSet::Unchanged => Ok(()),
            ChangeSet::Single(update) => client.update_field(endpoint, id, update).await,
            ChangeSet::Many(updates) => client.update_fields(endpoint, id, updates).await,
        }
    }
}

/// Date fields are persisted in display format.
fn persisted_date(value: &Value) -> Value {
    match dates::canonical(&stringify(value)) {
        Some(display) => Value::String(display),
        None => value.clone(),
    }
}

/// Fields of `edited` that differ from `original`. Date columns compare by
/// calendar day whatever representation either side uses; the identity
/// column never produces an update.
pub fn diff_record(schema: &EntitySchema, original: &Record, edited: &Record) -> ChangeSet {
    let mut updates = Vec::new();

    for (column, value) in edited.fields() {
        if column == schema.id_field {
            continue;
        }

        let before = original.text(column);
        let after = stringify(value);

        if schema.is_date_column(column) {
            if !dates::same_day(&before, &after) {
                updates.push(ColumnUpdate::new(column.clone(), persisted_date(value)));
            }
        } else if before != after {
            updates.push(ColumnUpdate::new(column.clone(), value.clone()));
        }
    }

    ChangeSet::from(updates)
}
