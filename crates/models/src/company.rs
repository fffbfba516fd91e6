use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

/// A company operated by the print shop. Every other record hangs off one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Resource for Company {
    type Input = CompanyInput;
    type Patch = CompanyPatch;

    const KIND: ResourceKind = ResourceKind::Company;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &CompanyInput) -> Result<(), ModelError> {
        validate::required("name", &input.name)?;
        validate::email("email", input.email.as_ref())
    }

    fn validate_patch(patch: &CompanyPatch) -> Result<(), ModelError> {
        validate::required_opt("name", patch.name.as_ref())?;
        validate::email("email", patch.email.as_ref())
    }
}
