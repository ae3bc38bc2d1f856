use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Paid,
    Unpaid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Paid" => Some(InvoiceStatus::Paid),
            "Unpaid" => Some(InvoiceStatus::Unpaid),
            "Overdue" => Some(InvoiceStatus::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub items: Vec<String>,
}
