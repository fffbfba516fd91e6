use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::record::{Resource, ResourceKind};
use crate::validate;

/// One employee's pay for one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    #[serde(rename = "$id")]
    pub id: String,
    pub company_id: String,
    pub employee_name: String,
    pub employee_document: Option<String>,
    /// `YYYY-MM`
    pub period: String,
    pub base_salary: f64,
    #[serde(default)]
    pub bonuses: f64,
    #[serde(default)]
    pub deductions: f64,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "$updatedAt", default)]
    pub updated_at: Option<String>,
}

impl Payroll {
    pub fn net_pay(&self) -> f64 {
        self.base_salary + self.bonuses - self.deductions
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollInput {
    pub company_id: String,
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_document: Option<String>,
    pub period: String,
    pub base_salary: f64,
    #[serde(default)]
    pub bonuses: f64,
    #[serde(default)]
    pub deductions: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PayrollPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonuses: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deductions: Option<f64>,
}

impl Resource for Payroll {
    type Input = PayrollInput;
    type Patch = PayrollPatch;

    const KIND: ResourceKind = ResourceKind::Payroll;

    fn id(&self) -> &str { &self.id }

    fn validate_input(input: &PayrollInput) -> Result<(), ModelError> {
        validate::required("companyId", &input.company_id)?;
        validate::required("employeeName", &input.employee_name)?;
        validate::period("period", &input.period)?;
        validate::non_negative("baseSalary", input.base_salary)?;
        validate::non_negative("bonuses", input.bonuses)?;
        validate::non_negative("deductions", input.deductions)
    }

    fn validate_patch(patch: &PayrollPatch) -> Result<(), ModelError> {
        validate::required_opt("companyId", patch.company_id.as_ref())?;
        validate::required_opt("employeeName", patch.employee_name.as_ref())?;
        if let Some(period) = &patch.period {
            validate::period("period", period)?;
        }
        validate::non_negative_opt("baseSalary", patch.base_salary)?;
        validate::non_negative_opt("bonuses", patch.bonuses)?;
        validate::non_negative_opt("deductions", patch.deductions)
    }
}
