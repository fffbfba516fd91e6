use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

pub const INVOICE_STATUSES: &[&str] = &["draft", "issued", "paid", "void"];

fn default_status() -> String { "draft".into() }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub client_id: String,
    pub order_id: Option<String>,
    pub number: String,
    /// `YYYY-MM-DD`
    pub issued_on: String,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Invoice {
    /// Outstanding amount; overpayment reads as zero.
    pub fn balance_due(&self) -> f64 {
        (self.total - self.amount_paid).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub company_id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub number: String,
    pub issued_on: String,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    #[serde(default = "default_status")]
    pub status: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Resource for Invoice {
    type Input = InvoiceInput;
    type Patch = InvoicePatch;

    const KIND: ResourceKind = ResourceKind::Invoice;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &InvoiceInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("clientId", &input.client_id)?;
        validate::required("number", &input.number)?;
        validate::date("issuedOn", Some(&input.issued_on))?;
        validate::non_negative("subtotal", input.subtotal)?;
        validate::non_negative("tax", input.tax)?;
        validate::non_negative("total", input.total)?;
        validate::non_negative("amountPaid", input.amount_paid)?;
        validate::one_of("status", Some(&input.status), INVOICE_STATUSES)
    }

    fn validate_patch(patch: &InvoicePatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("clientId", patch.client_id.as_ref())?;
        validate::required_opt("number", patch.number.as_ref())?;
        validate::date("issuedOn", patch.issued_on.as_ref())?;
        validate::non_negative_opt("subtotal", patch.subtotal)?;
        validate::non_negative_opt("tax", patch.tax)?;
        validate::non_negative_opt("total", patch.total)?;
        validate::non_negative_opt("amountPaid", patch.amount_paid)?;
        validate::one_of("status", patch.status.as_ref(), INVOICE_STATUSES)
    }
}
