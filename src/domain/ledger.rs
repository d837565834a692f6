use crate::domain::entities::repair::{Repair, RepairDraft, RepairPatch};
use crate::domain::value_objects::{RepairId, RepairNumber};
use chrono::NaiveDate;

/// A mutation dispatched against the ledger.
#[derive(Debug, Clone)]
pub enum RepairAction {
    Create(RepairDraft),
    Update { id: RepairId, patch: RepairPatch },
    Delete(RepairId),
    MarkDelivered { id: RepairId, delivery_date: NaiveDate },
    MarkSupplierDelivered(RepairId),
    Replace(Vec<Repair>),
}

/// What an applied action did to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Created(RepairId),
    Updated(RepairId),
    Deleted(RepairId),
    Replaced,
    /// The targeted record does not exist. State is unchanged; callers
    /// treat this as a benign race with deletion, not an error.
    Missed,
}

/// In-memory ordered collection of repair records. Insertion order is
/// display order. `apply` performs no I/O; persistence and backup run as a
/// separate step after the commit.
#[derive(Debug, Clone, Default)]
pub struct RepairLedger {
    repairs: Vec<Repair>,
}

impl RepairLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(repairs: Vec<Repair>) -> Self {
        Self { repairs }
    }

    pub fn records(&self) -> &[Repair] {
        &self.repairs
    }

    pub fn len(&self) -> usize {
        self.repairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repairs.is_empty()
    }

    pub fn get(&self, id: &RepairId) -> Option<&Repair> {
        self.repairs.iter().find(|repair| repair.id == *id)
    }

    /// Next display number, derived from the current record count. Deleting
    /// earlier records shifts later generated numbers; that count-based
    /// behavior is kept on purpose.
    pub fn next_repair_number(&self) -> RepairNumber {
        RepairNumber::from_ordinal(self.repairs.len() + 1)
    }

    pub fn apply(&mut self, action: RepairAction, today: NaiveDate) -> Applied {
        match action {
            RepairAction::Create(draft) => {
                let repair = Repair::new(draft, self.next_repair_number(), today);
                let id = repair.id.clone();
                self.repairs.push(repair);
                Applied::Created(id)
            }
            RepairAction::Update { id, patch } => match self.find_mut(&id) {
                Some(repair) => {
                    repair.apply_patch(patch);
                    Applied::Updated(id)
                }
                None => Applied::Missed,
            },
            RepairAction::Delete(id) => {
                let before = self.repairs.len();
                self.repairs.retain(|repair| repair.id != id);
                if self.repairs.len() < before {
                    Applied::Deleted(id)
                } else {
                    Applied::Missed
                }
            }
            RepairAction::MarkDelivered { id, delivery_date } => match self.find_mut(&id) {
                Some(repair) => {
                    repair.mark_delivered(delivery_date);
                    Applied::Updated(id)
                }
                None => Applied::Missed,
            },
            RepairAction::MarkSupplierDelivered(id) => match self.find_mut(&id) {
                Some(repair) => {
                    repair.mark_supplier_delivered();
                    Applied::Updated(id)
                }
                None => Applied::Missed,
            },
            RepairAction::Replace(repairs) => {
                self.repairs = repairs;
                Applied::Replaced
            }
        }
    }

    fn find_mut(&mut self, id: &RepairId) -> Option<&mut Repair> {
        self.repairs.iter_mut().find(|repair| repair.id == *id)
    }
}
