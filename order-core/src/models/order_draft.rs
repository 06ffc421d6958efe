use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::kit_catalog::{KitCatalog, KitId};

/// Date format used by the order date field.
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d";

/// The full set of user-entered order fields.
///
/// Text fields hold exactly what was typed; trimming only happens during
/// validation. Quantities are never negative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub company_name: String,
    pub tax_id: String,
    pub mobile: String,
    pub email: String,
    pub order_date: String,
    pub billing_address: String,
    pub shipping_address: String,
    pub quantities: BTreeMap<KitId, u32>,
    /// Filename of the payment proof, never its contents.
    pub attachment: Option<String>,
}

impl OrderDraft {
    /// A blank draft dated `today` with every catalog kit at zero.
    pub fn blank(
        catalog: &KitCatalog,
        today: NaiveDate,
    ) -> Self {
        Self {
            order_date: today.format(ORDER_DATE_FORMAT).to_string(),
            quantities: catalog.ids().map(|id| (id.clone(), 0)).collect(),
            ..Default::default()
        }
    }

    /// Quantity for `kit`, zero when the kit was never touched.
    pub fn quantity_of(
        &self,
        kit: &KitId,
    ) -> u32 {
        self.quantities.get(kit).copied().unwrap_or(0)
    }
}

impl fmt::Display for OrderDraft {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Company name:     {}", self.company_name)?;
        writeln!(f, "GST number:       {}", self.tax_id)?;
        writeln!(f, "Mobile:           {}", self.mobile)?;
        writeln!(f, "Email:            {}", self.email)?;
        writeln!(f, "Order date:       {}", self.order_date)?;
        writeln!(f, "Billing address:  {}", self.billing_address)?;
        writeln!(f, "Shipping address: {}", self.shipping_address)?;
        for (kit, qty) in &self.quantities {
            writeln!(f, "{:<17} {}", format!("{kit}:"), qty)?;
        }
        write!(
            f,
            "Payment proof:    {}",
            self.attachment.as_deref().unwrap_or("—")
        )
    }
}
