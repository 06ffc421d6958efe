//! Named-field access to the order form.
//!
//! Pricing, validation and payload assembly only ever read the form through
//! [`FieldStore`], so they run the same against [`OrderDraft`] as against a
//! live UI adapter.

use std::fmt;

use crate::models::{KitCatalog, KitId, OrderDraft};

/// Every field the user can edit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    CompanyName,
    TaxId,
    Mobile,
    Email,
    OrderDate,
    BillingAddress,
    ShippingAddress,
    Quantity(KitId),
    Attachment,
}

impl FieldName {
    /// Fields that must be non-blank before an order can be submitted,
    /// in the order they are checked.
    pub const REQUIRED: [FieldName; 7] = [
        FieldName::CompanyName,
        FieldName::TaxId,
        FieldName::Mobile,
        FieldName::Email,
        FieldName::OrderDate,
        FieldName::BillingAddress,
        FieldName::ShippingAddress,
    ];

    /// Short name used by the console (`company`, `gst`, `kit3`, ...).
    pub fn key(&self) -> &str {
        match self {
            Self::CompanyName => "company",
            Self::TaxId => "gst",
            Self::Mobile => "mobile",
            Self::Email => "email",
            Self::OrderDate => "date",
            Self::BillingAddress => "billing",
            Self::ShippingAddress => "shipping",
            Self::Quantity(kit) => kit.as_str(),
            Self::Attachment => "proof",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> String {
        match self {
            Self::CompanyName => "Company name".to_string(),
            Self::TaxId => "GST number".to_string(),
            Self::Mobile => "Mobile number".to_string(),
            Self::Email => "Email".to_string(),
            Self::OrderDate => "Order date".to_string(),
            Self::BillingAddress => "Billing address".to_string(),
            Self::ShippingAddress => "Shipping address".to_string(),
            Self::Quantity(kit) => format!("{kit} quantity"),
            Self::Attachment => "Payment proof".to_string(),
        }
    }

    /// Resolves a console field name. Kit ids resolve to their quantity
    /// field only when the catalog knows them.
    pub fn parse(
        name: &str,
        catalog: &KitCatalog,
    ) -> Option<Self> {
        let name = name.trim();
        let field = match name.to_ascii_lowercase().as_str() {
            "company" | "company-name" => Self::CompanyName,
            "gst" | "gst-number" | "tax-id" => Self::TaxId,
            "mobile" | "phone" => Self::Mobile,
            "email" => Self::Email,
            "date" | "order-date" => Self::OrderDate,
            "billing" | "bill-address" => Self::BillingAddress,
            "shipping" | "ship-address" => Self::ShippingAddress,
            "proof" | "attachment" | "payment-proof" => Self::Attachment,
            _ => Self::Quantity(catalog.resolve(name)?.clone()),
        };
        Some(field)
    }

    pub fn is_quantity(&self) -> bool {
        matches!(self, Self::Quantity(_))
    }
}

impl fmt::Display for FieldName {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parses a quantity the way a numeric form field is read: leading
/// whitespace and an optional sign are accepted, parsing stops at the first
/// non-digit, and anything unparseable or negative becomes zero.
pub fn parse_quantity(input: &str) -> u32 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() || negative {
        return 0;
    }

    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Read/write access to the form fields by name.
pub trait FieldStore {
    /// Current value of `field` as text. Absent values read as `""`.
    fn get(
        &self,
        field: &FieldName,
    ) -> String;

    /// Overwrites `field` with `value`.
    fn set(
        &mut self,
        field: &FieldName,
        value: &str,
    );

    fn quantity(
        &self,
        kit: &KitId,
    ) -> u32 {
        parse_quantity(&self.get(&FieldName::Quantity(kit.clone())))
    }

    fn set_quantity(
        &mut self,
        kit: &KitId,
        quantity: u32,
    ) {
        self.set(&FieldName::Quantity(kit.clone()), &quantity.to_string());
    }

    /// Adds one unit. There is no upper bound.
    fn increment(
        &mut self,
        kit: &KitId,
    ) -> u32 {
        let next = self.quantity(kit).saturating_add(1);
        self.set_quantity(kit, next);
        next
    }

    /// Removes one unit; a no-op at zero.
    fn decrement(
        &mut self,
        kit: &KitId,
    ) -> u32 {
        let current = self.quantity(kit);
        if current == 0 {
            return 0;
        }
        self.set_quantity(kit, current - 1);
        current - 1
    }

    /// Attached filename, `None` when nothing is attached.
    fn attachment(&self) -> Option<String> {
        let name = self.get(&FieldName::Attachment);
        if name.is_empty() { None } else { Some(name) }
    }
}

impl FieldStore for OrderDraft {
    fn get(
        &self,
        field: &FieldName,
    ) -> String {
        match field {
            FieldName::CompanyName => self.company_name.clone(),
            FieldName::TaxId => self.tax_id.clone(),
            FieldName::Mobile => self.mobile.clone(),
            FieldName::Email => self.email.clone(),
            FieldName::OrderDate => self.order_date.clone(),
            FieldName::BillingAddress => self.billing_address.clone(),
            FieldName::ShippingAddress => self.shipping_address.clone(),
            FieldName::Quantity(kit) => self.quantity_of(kit).to_string(),
            FieldName::Attachment => self.attachment.clone().unwrap_or_default(),
        }
    }

    fn set(
        &mut self,
        field: &FieldName,
        value: &str,
    ) {
        match field {
            FieldName::CompanyName => self.company_name = value.to_string(),
            FieldName::TaxId => self.tax_id = value.to_string(),
            FieldName::Mobile => self.mobile = value.to_string(),
            FieldName::Email => self.email = value.to_string(),
            FieldName::OrderDate => self.order_date = value.to_string(),
            FieldName::BillingAddress => self.billing_address = value.to_string(),
            FieldName::ShippingAddress => self.shipping_address = value.to_string(),
            FieldName::Quantity(kit) => {
                self.quantities.insert(kit.clone(), parse_quantity(value));
            }
            FieldName::Attachment => {
                self.attachment = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
        }
    }

    fn quantity(
        &self,
        kit: &KitId,
    ) -> u32 {
        self.quantity_of(kit)
    }
}

impl OrderDraft {
    /// Copies every field of `fields` known to `catalog` into a new draft.
    pub fn capture(
        fields: &impl FieldStore,
        catalog: &KitCatalog,
    ) -> Self {
        let mut draft = OrderDraft::default();
        for field in FieldName::REQUIRED.iter() {
            draft.set(field, &fields.get(field));
        }
        for kit in catalog.ids() {
            draft.set_quantity(kit, fields.quantity(kit));
        }
        draft.attachment = fields.attachment();
        draft
    }
}
