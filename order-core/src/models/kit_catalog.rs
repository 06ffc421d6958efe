use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a purchasable kit (e.g. `kit3`).
///
/// The identifier doubles as the quantity field name and as the prefix of
/// the `<id>Qty` key in the submitted payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KitId(String);

impl KitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KitId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KitId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A purchasable bundle with a fixed unit price in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kit {
    pub id: KitId,
    pub label: String,
    pub unit_price: Decimal,
}

impl Kit {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: KitId::new(id),
            label: label.into(),
            unit_price,
        }
    }
}

/// Errors raised when assembling a [`KitCatalog`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("kit catalog is empty")]
    Empty,

    #[error("kit id must not be blank")]
    BlankId,

    #[error("kit '{0}' appears more than once")]
    DuplicateKit(KitId),

    #[error("kit '{kit}' has a negative unit price {price}")]
    NegativePrice { kit: KitId, price: Decimal },
}

/// Fixed mapping from kit identifier to unit price.
///
/// Built once at startup and never mutated afterwards. Kits keep the order
/// they were declared in, which is also the order of the summary lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitCatalog {
    kits: Vec<Kit>,
}

impl KitCatalog {
    /// Builds a catalog, rejecting empty lists, blank ids, ids repeated in
    /// any letter case and negative prices.
    pub fn new(kits: Vec<Kit>) -> Result<Self, CatalogError> {
        if kits.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for kit in &kits {
            if kit.id.as_str().trim().is_empty() {
                return Err(CatalogError::BlankId);
            }
            if !seen.insert(kit.id.as_str().to_lowercase()) {
                return Err(CatalogError::DuplicateKit(kit.id.clone()));
            }
            if kit.unit_price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    kit: kit.id.clone(),
                    price: kit.unit_price,
                });
            }
        }

        Ok(Self { kits })
    }

    pub fn kits(&self) -> &[Kit] {
        &self.kits
    }

    pub fn get(
        &self,
        id: &KitId,
    ) -> Option<&Kit> {
        self.kits.iter().find(|k| &k.id == id)
    }

    pub fn contains(
        &self,
        id: &KitId,
    ) -> bool {
        self.get(id).is_some()
    }

    /// Looks up a kit id as typed by a user, ignoring letter case, and
    /// returns the id the catalog was built with.
    pub fn resolve(
        &self,
        name: &str,
    ) -> Option<&KitId> {
        let name = name.trim();
        self.ids()
            .find(|id| id.as_str() == name)
            .or_else(|| self.ids().find(|id| id.as_str().eq_ignore_ascii_case(name)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &KitId> {
        self.kits.iter().map(|k| &k.id)
    }
}

impl Default for KitCatalog {
    /// The three solar kits sold through the order form.
    fn default() -> Self {
        Self {
            kits: vec![
                Kit::new("kit3", "3 kW Kit", Decimal::from(121_000)),
                Kit::new("kit4", "4 kW Kit", Decimal::from(162_000)),
                Kit::new("kit5", "5 kW Kit", Decimal::from(194_000)),
            ],
        }
    }
}
