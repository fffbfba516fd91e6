use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

pub const ORDER_STATUSES: &[&str] = &["pending", "in_production", "finished", "delivered", "cancelled"];

fn default_status() -> String { "pending".into() }

/// A print job ordered by a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub client_id: String,
    pub product_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub total: f64,
    #[serde(default = "default_status")]
    pub status: String,
    pub due_date: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub company_id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub total: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Resource for Order {
    type Input = OrderInput;
    type Patch = OrderPatch;

    const KIND: ResourceKind = ResourceKind::Order;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &OrderInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("clientId", &input.client_id)?;
        validate::required("description", &input.description)?;
        validate::non_negative_int("quantity", input.quantity)?;
        validate::non_negative("total", input.total)?;
        validate::one_of("status", Some(&input.status), ORDER_STATUSES)?;
        validate::date("dueDate", input.due_date.as_ref())
    }

    fn validate_patch(patch: &OrderPatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("clientId", patch.client_id.as_ref())?;
        validate::required_opt("description", patch.description.as_ref())?;
        validate::non_negative_int_opt("quantity", patch.quantity)?;
        validate::non_negative_opt("total", patch.total)?;
        validate::one_of("status", patch.status.as_ref(), ORDER_STATUSES)?;
        validate::date("dueDate", patch.due_date.as_ref())
    }
}
