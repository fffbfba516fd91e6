use std::collections::BTreeMap;

use axum::Json;
use models::{
    ink::INK_KINDS, invoice::INVOICE_STATUSES, order::ORDER_STATUSES, ResourceKind,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSchema {
    pub slug: &'static str,
    pub label: &'static str,
    pub fields: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Allowed values for enumerated fields.
    pub choices: BTreeMap<&'static str, &'static [&'static str]>,
}

#[derive(Serialize)]
pub struct Schema {
    pub resources: Vec<ResourceSchema>,
}

fn choices(kind: ResourceKind) -> BTreeMap<&'static str, &'static [&'static str]> {
    match kind {
        ResourceKind::Ink => BTreeMap::from([("kind", INK_KINDS)]),
        ResourceKind::Order => BTreeMap::from([("status", ORDER_STATUSES)]),
        ResourceKind::Invoice => BTreeMap::from([("status", INVOICE_STATUSES)]),
        _ => BTreeMap::new(),
    }
}

/// Resource catalogue for the frontend's generic list and form pages.
pub async fn schema() -> Json<Schema> {
    let resources = ResourceKind::ALL
        .into_iter()
        .map(|kind| ResourceSchema {
            slug: kind.slug(),
            label: kind.label(),
            fields: kind.fields(),
            search_fields: kind.search_fields(),
            choices: choices(kind),
        })
        .collect();
    Json(Schema { resources })
}
