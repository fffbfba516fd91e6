use serde::{de::DeserializeOwned, Serialize};

use crate::errors::ModelError;

/// Every resource the ERP manages. One backend table each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Company,
    Client,
    Product,
    Ink,
    Payroll,
    Supplier,
    Order,
    Invoice,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Company,
        ResourceKind::Client,
        ResourceKind::Product,
        ResourceKind::Ink,
        ResourceKind::Payroll,
        ResourceKind::Supplier,
        ResourceKind::Order,
        ResourceKind::Invoice,
    ];

    /// URL segment and default table id.
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Company => "companies",
            ResourceKind::Client => "clients",
            ResourceKind::Product => "products",
            ResourceKind::Ink => "inks",
            ResourceKind::Payroll => "payroll",
            ResourceKind::Supplier => "suppliers",
            ResourceKind::Order => "orders",
            ResourceKind::Invoice => "invoices",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Company => "Companies",
            ResourceKind::Client => "Clients",
            ResourceKind::Product => "Products",
            ResourceKind::Ink => "Inks",
            ResourceKind::Payroll => "Payroll",
            ResourceKind::Supplier => "Suppliers",
            ResourceKind::Order => "Orders",
            ResourceKind::Invoice => "Invoices",
        }
    }

    /// Wire names of the user-editable fields, in display order.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Company => &["name", "taxId", "address", "phone", "email"],
            ResourceKind::Client => &["companyId", "name", "taxId", "email", "phone", "address"],
            ResourceKind::Product => &[
                "companyId", "code", "name", "description", "unit", "unitPrice", "stock", "lowStockThreshold",
            ],
            ResourceKind::Ink => &["companyId", "supplierId", "name", "color", "brand", "kind", "quantity", "unitCost"],
            ResourceKind::Payroll => &[
                "companyId", "employeeName", "employeeDocument", "period", "baseSalary", "bonuses", "deductions",
            ],
            ResourceKind::Supplier => &["companyId", "name", "taxId", "contactName", "email", "phone"],
            ResourceKind::Order => &[
                "companyId", "clientId", "productId", "description", "quantity", "total", "status", "dueDate",
            ],
            ResourceKind::Invoice => &[
                "companyId", "clientId", "orderId", "number", "issuedOn", "subtotal", "tax", "total", "amountPaid", "status",
            ],
        }
    }

    /// Fields scanned by free-text search.
    pub fn search_fields(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Company => &["name", "taxId", "email"],
            ResourceKind::Client => &["name", "taxId", "email"],
            ResourceKind::Product => &["code", "name", "description"],
            ResourceKind::Ink => &["name", "color", "brand"],
            ResourceKind::Payroll => &["employeeName", "employeeDocument", "period"],
            ResourceKind::Supplier => &["name", "taxId", "contactName"],
            ResourceKind::Order => &["description", "status"],
            ResourceKind::Invoice => &["number", "status"],
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

/// A record stored in one backend table.
///
/// `Input` is the full create payload, `Patch` the partial update payload
/// whose absent fields are left untouched by the backend.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Input: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

    const KIND: ResourceKind;

    fn id(&self) -> &str;

    fn validate_input(input: &Self::Input) -> Result<(), ModelError>;

    fn validate_patch(patch: &Self::Patch) -> Result<(), ModelError>;

    /// Decode a raw backend row.
    fn from_row(row: serde_json::Value) -> Result<Self, ModelError> {
        serde_json::from_value(row).map_err(|e| ModelError::Decode(format!("{}: {e}", Self::KIND.slug())))
    }
}
