use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::kit_catalog::KitCatalog;
use super::order_draft::OrderDraft;
use crate::form::{FieldStore, parse_quantity};

/// The subset of [`OrderDraft`] mirrored to durable local storage.
///
/// Every field is optional when reading so that snapshots written by older
/// versions of the form, or with fields missing, still restore. Text fields
/// holding numbers or booleans are read as their text; other non-string
/// values read as absent. Kit quantities live under their kit id and may be
/// numbers or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    #[serde(deserialize_with = "lenient_text")]
    pub company_name: Option<String>,
    #[serde(rename = "gstNumber", deserialize_with = "lenient_text")]
    pub tax_id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub mobile: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub order_date: Option<String>,
    #[serde(rename = "billAddress", deserialize_with = "lenient_text")]
    pub billing_address: Option<String>,
    #[serde(rename = "shipAddress", deserialize_with = "lenient_text")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub payment_proof_filename: Option<String>,
    #[serde(flatten)]
    pub quantities: BTreeMap<String, Value>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

impl PersistedSnapshot {
    /// Captures the mirrored fields of `draft`.
    pub fn capture(
        draft: &OrderDraft,
        catalog: &KitCatalog,
    ) -> Self {
        Self {
            company_name: Some(draft.company_name.clone()),
            tax_id: Some(draft.tax_id.clone()),
            mobile: Some(draft.mobile.clone()),
            email: Some(draft.email.clone()),
            order_date: Some(draft.order_date.clone()),
            billing_address: Some(draft.billing_address.clone()),
            shipping_address: Some(draft.shipping_address.clone()),
            payment_proof_filename: draft.attachment.clone(),
            quantities: catalog
                .ids()
                .map(|kit| (kit.to_string(), Value::from(draft.quantity_of(kit))))
                .collect(),
        }
    }

    /// Rebuilds a draft. Missing text fields become `""` and missing or
    /// unreadable quantities become 0.
    pub fn into_draft(
        self,
        catalog: &KitCatalog,
    ) -> OrderDraft {
        let mut draft = OrderDraft {
            company_name: self.company_name.unwrap_or_default(),
            tax_id: self.tax_id.unwrap_or_default(),
            mobile: self.mobile.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            order_date: self.order_date.unwrap_or_default(),
            billing_address: self.billing_address.unwrap_or_default(),
            shipping_address: self.shipping_address.unwrap_or_default(),
            attachment: self.payment_proof_filename.filter(|name| !name.is_empty()),
            ..Default::default()
        };

        for kit in catalog.ids() {
            let quantity = match self.quantities.get(kit.as_str()) {
                Some(Value::Number(n)) => parse_quantity(&n.to_string()),
                Some(Value::String(s)) => parse_quantity(s),
                _ => 0,
            };
            draft.set_quantity(kit, quantity);
        }

        draft
    }
}
