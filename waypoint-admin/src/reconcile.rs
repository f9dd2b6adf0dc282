use tracing::debug;
use waypoint_core::ColumnUpdate;
use waypoint_shared::Record;

/// A local edit applied ahead of the server's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Speculation {
    Insert(Record),
    Patch { id: String, updates: Vec<ColumnUpdate> },
    Remove(Vec<String>),
}

/// Local copy of a collection. Speculative edits are applied on top of the
/// last authoritative list until the next settle replaces it wholesale.
#[derive(Debug, Clone)]
pub struct Reconciler {
    id_field: String,
    confirmed: Vec<Record>,
    visible: Vec<Record>,
    speculative: bool,
}

impl Reconciler {
    pub fn new(id_field: impl Into<String>) -> Self {
        Self {
            id_field: id_field.into(),
            confirmed: Vec::new(),
            visible: Vec::new(),
            speculative: false,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.visible
    }

    pub fn is_speculative(&self) -> bool {
        self.speculative
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.visible
            .iter()
            .find(|r| r.id(&self.id_field).as_deref() == Some(id))
    }

    pub fn apply(&mut self, speculation: &Speculation) {
        match speculation {
            Speculation::Insert(record) => self.visible.push(record.clone()),
            Speculation::Patch { id, updates } => {
                let id_field = &self.id_field;
                if let Some(record) = self
                    .visible
                    .iter_mut()
                    .find(|r| r.id(id_field).as_deref() == Some(id.as_str()))
                {
                    for update in updates {
                        record.insert(update.column.clone(), update.value.clone());
                    }
                }
            }
            Speculation::Remove(ids) => {
                let id_field = &self.id_field;
                self.visible
                    .retain(|r| !r.id(id_field).is_some_and(|id| ids.contains(&id)));
            }
        }
        self.speculative = true;
    }

    /// Replace everything with the server's list.
    pub fn settle(&mut self, authoritative: Vec<Record>) {
        debug!("Settling {} records", authoritative.len());
        self.visible = authoritative.clone();
        self.confirmed = authoritative;
        self.speculative = false;
    }

    /// Drop speculative edits, back to the last server list.
    pub fn discard(&mut self) {
        self.visible = self.confirmed.clone();
        self.speculative = false;
    }
}
