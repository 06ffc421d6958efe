//! Pricing Engine for the kit order form.
//!
//! Turns kit quantities into the summary panel figures:
//!
//! | Figure       | Rule |
//! |--------------|------|
//! | Line total   | quantity × catalog unit price |
//! | Total units  | Σ quantities |
//! | Subtotal     | Σ line totals |
//! | GST          | subtotal × 12%, no intermediate rounding |
//! | Grand total  | subtotal + GST |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use order_core::calculations::PricingEngine;
//! use order_core::form::FieldStore;
//! use order_core::models::{KitCatalog, KitId, OrderDraft};
//!
//! let catalog = KitCatalog::default();
//! let mut draft = OrderDraft::default();
//! draft.set_quantity(&KitId::from("kit3"), 2);
//! draft.set_quantity(&KitId::from("kit4"), 1);
//!
//! let summary = PricingEngine::new(&catalog).calculate(&draft);
//!
//! assert_eq!(summary.subtotal, dec!(404000));
//! assert_eq!(summary.tax, dec!(48480));
//! assert_eq!(summary.grand_total, dec!(452480));
//! assert_eq!(summary.total_units, 3);
//! ```

use rust_decimal::Decimal;

use super::currency::CurrencyFormat;
use crate::form::FieldStore;
use crate::models::{KitCatalog, KitLine, PricingSummary, SummaryText};

/// GST charged on the subtotal (12%).
pub const TAX_RATE: Decimal = Decimal::from_parts(12, 0, 0, false, 2);

/// Stateless calculator over a borrowed [`KitCatalog`].
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    catalog: &'a KitCatalog,
}

impl<'a> PricingEngine<'a> {
    pub fn new(catalog: &'a KitCatalog) -> Self {
        Self { catalog }
    }

    /// Computes the summary for the quantities currently in `fields`.
    pub fn calculate(
        &self,
        fields: &impl FieldStore,
    ) -> PricingSummary {
        let lines: Vec<KitLine> = self
            .catalog
            .kits()
            .iter()
            .map(|kit| {
                let quantity = fields.quantity(&kit.id);
                KitLine {
                    kit: kit.id.clone(),
                    label: kit.label.clone(),
                    quantity,
                    unit_price: kit.unit_price,
                    line_total: self.line_total(quantity, kit.unit_price),
                }
            })
            .collect();

        let total_units = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let subtotal = lines.iter().map(|l| l.line_total).sum();
        let tax = self.tax(subtotal);
        let grand_total = subtotal + tax;

        PricingSummary {
            lines,
            total_units,
            subtotal,
            tax,
            grand_total,
        }
    }

    fn line_total(
        &self,
        quantity: u32,
        unit_price: Decimal,
    ) -> Decimal {
        Decimal::from(quantity) * unit_price
    }

    fn tax(
        &self,
        subtotal: Decimal,
    ) -> Decimal {
        subtotal * TAX_RATE
    }
}

impl PricingSummary {
    /// Renders the display strings shown in the summary panel.
    pub fn to_text(
        &self,
        currency: &CurrencyFormat,
    ) -> SummaryText {
        SummaryText {
            lines: self
                .lines
                .iter()
                .map(|l| {
                    (
                        l.kit.clone(),
                        format!(
                            "{} × {} = {}",
                            l.quantity,
                            currency.money(l.unit_price),
                            currency.money(l.line_total)
                        ),
                    )
                })
                .collect(),
            total_units: self.total_units.to_string(),
            subtotal: currency.money(self.subtotal),
            tax: currency.money(self.tax),
            grand_total: currency.money(self.grand_total),
        }
    }
}
