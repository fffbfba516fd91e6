use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub company_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Resource for Client {
    type Input = ClientInput;
    type Patch = ClientPatch;

    const KIND: ResourceKind = ResourceKind::Client;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &ClientInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("name", &input.name)?;
        validate::email("email", input.email.as_ref())
    }

    fn validate_patch(patch: &ClientPatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("name", patch.name.as_ref())?;
        validate::email("email", patch.email.as_ref())
    }
}
