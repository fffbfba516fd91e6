use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

const DEFAULT_LOW_STOCK: i64 = 5;

fn default_low_stock() -> i64 { DEFAULT_LOW_STOCK }

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub unit_price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: i64,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Product {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub company_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub unit_price: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
}

impl Resource for Product {
    type Input = ProductInput;
    type Patch = ProductPatch;

    const KIND: ResourceKind = ResourceKind::Product;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &ProductInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("name", &input.name)?;
        validate::non_negative("unitPrice", input.unit_price)?;
        validate::non_negative_int("stock", input.stock)?;
        validate::non_negative_int("lowStockThreshold", input.low_stock_threshold)
    }

    fn validate_patch(patch: &ProductPatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("name", patch.name.as_ref())?;
        validate::non_negative_opt("unitPrice", patch.unit_price)?;
        validate::non_negative_int_opt("stock", patch.stock)?;
        validate::non_negative_int_opt("lowStockThreshold", patch.low_stock_threshold)
    }
}
