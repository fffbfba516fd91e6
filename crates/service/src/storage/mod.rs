//! Storage helpers for the local backend
//!
//! Small maps persisted as JSON files; enough for development data sets.

pub mod json_map_store;
