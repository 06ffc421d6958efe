use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::kit_catalog::KitCatalog;
use super::pricing_summary::SummaryText;
use crate::form::{FieldName, FieldStore};

/// Filename sent when no payment proof is attached.
pub const NO_FILE_UPLOADED: &str = "No file uploaded";

/// The JSON body delivered to the Order Sink.
///
/// Field names follow the intake endpoint's camelCase keys. Kit quantities
/// are flattened into `<kit>Qty` keys and the totals are the display strings
/// from the summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub company_name: String,
    #[serde(rename = "gstNumber")]
    pub tax_id: String,
    pub mobile: String,
    pub email: String,
    pub order_date: String,
    #[serde(rename = "billAddress")]
    pub billing_address: String,
    #[serde(rename = "shipAddress")]
    pub shipping_address: String,
    #[serde(flatten)]
    pub quantities: BTreeMap<String, u32>,
    pub total_units: String,
    pub subtotal: String,
    #[serde(rename = "gst")]
    pub tax: String,
    pub grand_total: String,
    pub payment_proof_filename: String,
}

impl SubmissionPayload {
    /// Snapshots the form and the latest summary text into a payload.
    pub fn build(
        fields: &impl FieldStore,
        catalog: &KitCatalog,
        summary: &SummaryText,
    ) -> Self {
        let quantities = catalog
            .ids()
            .map(|kit| (format!("{kit}Qty"), fields.quantity(kit)))
            .collect();

        Self {
            company_name: fields.get(&FieldName::CompanyName),
            tax_id: fields.get(&FieldName::TaxId),
            mobile: fields.get(&FieldName::Mobile),
            email: fields.get(&FieldName::Email),
            order_date: fields.get(&FieldName::OrderDate),
            billing_address: fields.get(&FieldName::BillingAddress),
            shipping_address: fields.get(&FieldName::ShippingAddress),
            quantities,
            total_units: summary.total_units.clone(),
            subtotal: summary.subtotal.clone(),
            tax: summary.tax.clone(),
            grand_total: summary.grand_total.clone(),
            payment_proof_filename: fields
                .attachment()
                .unwrap_or_else(|| NO_FILE_UPLOADED.to_string()),
        }
    }
}
