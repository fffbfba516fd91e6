//! Service layer for the print-shop ERP.
//! - One generic CRUD service per resource, over a remote table API.
//! - Backends (HTTP BaaS or local files) sit behind the traits in `backend`.
//! - Session login and file storage are delegated to the backend as-is.

pub mod errors;
pub mod backend;
pub mod storage;
pub mod filter;
pub mod pagination;
pub mod resource;
pub mod auth;
pub mod files;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

pub use resource::ResourceService;
