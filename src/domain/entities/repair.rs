use crate::domain::value_objects::{RepairId, RepairNumber};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    Pending,
    InProgress,
    SupplierDelivered,
    Completed,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::Pending => "pending",
            RepairStatus::InProgress => "in_progress",
            RepairStatus::SupplierDelivered => "supplier_delivered",
            RepairStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client details embedded in a repair record. Owned by the record, no
/// independent identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub ticket_number: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    pub id: RepairId,
    pub repair_number: RepairNumber,
    pub received_date: NaiveDate,
    pub status: RepairStatus,
    pub delivery_date: Option<NaiveDate>,
    pub received_by: String,
    pub warranty: bool,
    pub code: String,
    pub article: String,
    pub brand: String,
    pub model: String,
    pub serial_imei: String,
    pub provider: String,
    pub request_budget: bool,
    pub content: String,
    pub problem: String,
    pub client: Client,
}

impl Repair {
    /// Builds a new record from the intake form. Status always starts at
    /// `Pending`; identity fields are fixed for the record's lifetime.
    pub fn new(draft: RepairDraft, repair_number: RepairNumber, received_date: NaiveDate) -> Self {
        Self {
            id: RepairId::random(),
            repair_number,
            received_date,
            status: RepairStatus::Pending,
            delivery_date: None,
            received_by: draft.received_by,
            warranty: draft.warranty,
            code: draft.code,
            article: draft.article,
            brand: draft.brand,
            model: draft.model,
            serial_imei: draft.serial_imei,
            provider: draft.provider,
            request_budget: draft.request_budget,
            content: draft.content,
            problem: draft.problem,
            client: draft.client,
        }
    }

    /// Delivery to the client: forces `Completed` and stamps the delivery
    /// date, whatever the prior status was.
    pub fn mark_delivered(&mut self, delivery_date: NaiveDate) {
        self.status = RepairStatus::Completed;
        self.delivery_date = Some(delivery_date);
    }

    /// Hand-off to the supplier. The delivery date is left untouched.
    pub fn mark_supplier_delivered(&mut self) {
        self.status = RepairStatus::SupplierDelivered;
    }

    pub fn is_completed(&self) -> bool {
        self.status == RepairStatus::Completed
    }

    /// Merges the given fields into the record. Absent fields are left as
    /// they are; identity fields are not part of the patch.
    pub fn apply_patch(&mut self, patch: RepairPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(delivery_date) = patch.delivery_date {
            self.delivery_date = Some(delivery_date);
        }
        if let Some(received_by) = patch.received_by {
            self.received_by = received_by;
        }
        if let Some(warranty) = patch.warranty {
            self.warranty = warranty;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(article) = patch.article {
            self.article = article;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(serial_imei) = patch.serial_imei {
            self.serial_imei = serial_imei;
        }
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(request_budget) = patch.request_budget {
            self.request_budget = request_budget;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(problem) = patch.problem {
            self.problem = problem;
        }
        if let Some(client) = patch.client {
            self.client = client;
        }
    }
}

/// Intake form payload: every client-settable field of a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairDraft {
    pub received_by: String,
    pub warranty: bool,
    pub code: String,
    pub article: String,
    pub brand: String,
    pub model: String,
    pub serial_imei: String,
    pub provider: String,
    pub request_budget: bool,
    pub content: String,
    pub problem: String,
    pub client: Client,
}

/// Partial update payload. `None` fields are not touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairPatch {
    #[serde(default)]
    pub status: Option<RepairStatus>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub received_by: Option<String>,
    #[serde(default)]
    pub warranty: Option<bool>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub serial_imei: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub request_budget: Option<bool>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub client: Option<Client>,
}
