//! Business records of the print-shop ERP.
//!
//! Each record mirrors one backend table. Records carry the backend-owned
//! `$id`/`$createdAt`/`$updatedAt` fields; foreign keys are plain string ids.

pub mod errors;
pub mod record;
pub mod validate;
pub mod company;
pub mod client;
pub mod product;
pub mod ink;
pub mod payroll;
pub mod supplier;
pub mod order;
pub mod invoice;

pub use company::Company;
pub use client::Client;
pub use product::Product;
pub use ink::Ink;
pub use payroll::Payroll;
pub use supplier::Supplier;
pub use order::Order;
pub use invoice::Invoice;
pub use record::{Resource, ResourceKind};

#[cfg(test)]
mod tests;
