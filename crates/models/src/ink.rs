use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

/// Printing processes an ink can be bought for.
pub const INK_KINDS: &[&str] = &["offset", "digital", "screen", "flexo"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ink {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub supplier_id: Option<String>,
    pub name: String,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub kind: Option<String>,
    /// Stock on hand, in kilograms.
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_cost: f64,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Ink {
    pub fn stock_value(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InkInput {
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
}

impl Resource for Ink {
    type Input = InkInput;
    type Patch = InkPatch;

    const KIND: ResourceKind = ResourceKind::Ink;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &InkInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("name", &input.name)?;
        validate::one_of("kind", input.kind.as_ref(), INK_KINDS)?;
        validate::non_negative("quantity", input.quantity)?;
        validate::non_negative("unitCost", input.unit_cost)
    }

    fn validate_patch(patch: &InkPatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("name", patch.name.as_ref())?;
        validate::one_of("kind", patch.kind.as_ref(), INK_KINDS)?;
        validate::non_negative_opt("quantity", patch.quantity)?;
        validate::non_negative_opt("unitCost", patch.unit_cost)
    }
}
