use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::kit_catalog::KitId;

/// One priced line of the summary panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitLine {
    pub kit: KitId,
    pub label: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Totals derived from the kit quantities. Never stored on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSummary {
    pub lines: Vec<KitLine>,
    pub total_units: u64,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
}

impl PricingSummary {
    pub fn line(
        &self,
        kit: &KitId,
    ) -> Option<&KitLine> {
        self.lines.iter().find(|l| &l.kit == kit)
    }
}

/// Display strings for a [`PricingSummary`], as shown in the summary panel
/// and copied into the submitted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryText {
    /// `"2 × ₹1,21,000 = ₹2,42,000"` per kit, in catalog order.
    pub lines: Vec<(KitId, String)>,
    pub total_units: String,
    pub subtotal: String,
    pub tax: String,
    pub grand_total: String,
}

impl SummaryText {
    pub fn line(
        &self,
        kit: &KitId,
    ) -> Option<&str> {
        self.lines
            .iter()
            .find(|(id, _)| id == kit)
            .map(|(_, text)| text.as_str())
    }
}
