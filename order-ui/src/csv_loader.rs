//! CSV loader for the kit catalog.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. All three
//! columns are required.
//!
//! | Column       | Type    | Notes                                        |
//! |--------------|---------|----------------------------------------------|
//! | `kit_id`     | string  | e.g. `kit3`; also the `<kit_id>Qty` key sent |
//! | `label`      | string  | shown in the summary panel                   |
//! | `unit_price` | decimal | whole currency units, e.g. `121000`          |
//!
//! ### Example
//!
//! ```csv
//! kit_id,label,unit_price
//! kit3,3 kW Kit,121000
//! kit4,4 kW Kit,162000
//! kit5,5 kW Kit,194000
//! ```
use std::path::{Path, PathBuf};

use order_core::models::{CatalogError, Kit, KitCatalog};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    kit_id: String,
    label: String,
    unit_price: Decimal,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("cannot read catalog file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, missing column or a price that is not a number.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// The rows parsed but do not form a usable catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

/// Parse CSV text into a [`KitCatalog`]. Kits keep file order.
///
/// # Errors
///
/// * [`CatalogLoadError::Parse`] if the CSV is structurally invalid.
/// * [`CatalogLoadError::Catalog`] if it has no rows, a blank or repeated
///   `kit_id`, or a negative price.
pub fn load_from_str(input: &str) -> Result<KitCatalog, CatalogLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let kits = reader
        .deserialize::<CsvRow>()
        .map(|result| {
            let row = result?;
            Ok(Kit::new(row.kit_id, row.label, row.unit_price))
        })
        .collect::<Result<Vec<_>, CatalogLoadError>>()?;

    Ok(KitCatalog::new(kits)?)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<KitCatalog, CatalogLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use order_core::models::KitId;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const DEFAULT_CSV: &str = "\
kit_id,label,unit_price
kit3,3 kW Kit,121000
kit4,4 kW Kit,162000
kit5,5 kW Kit,194000
";

    #[test]
    fn test_default_rows_match_builtin_catalog() {
        let catalog = load_from_str(DEFAULT_CSV).expect("should parse");

        assert_eq!(catalog, KitCatalog::default());
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let csv = "unit_price,kit_id,label\n250000,kit10,10 kW Kit\n";
        let catalog = load_from_str(csv).expect("should parse");

        let kit = catalog.get(&KitId::from("kit10")).expect("kit10 present");
        assert_eq!(kit.label, "10 kW Kit");
        assert_eq!(kit.unit_price, dec!(250000));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = "kit_id , label , unit_price\n kit3 , 3 kW Kit , 121000 \n";
        let catalog = load_from_str(csv).expect("should parse");

        assert!(catalog.contains(&KitId::from("kit3")));
    }

    #[test]
    fn test_header_only_is_empty_catalog_error() {
        let result = load_from_str("kit_id,label,unit_price\n");

        match result.unwrap_err() {
            CatalogLoadError::Catalog(CatalogError::Empty) => {}
            other => panic!("expected empty catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_kit_is_rejected() {
        let csv = "kit_id,label,unit_price\nkit3,A,1\nkit3,B,2\n";

        match load_from_str(csv).unwrap_err() {
            CatalogLoadError::Catalog(CatalogError::DuplicateKit(kit)) => {
                assert_eq!(kit, KitId::from("kit3"));
            }
            other => panic!("expected DuplicateKit, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let csv = "kit_id,label,unit_price\nkit3,A,-5\n";

        assert!(matches!(
            load_from_str(csv),
            Err(CatalogLoadError::Catalog(CatalogError::NegativePrice { .. }))
        ));
    }

    #[test]
    fn test_missing_column_returns_parse_error() {
        let csv = "kit_id,unit_price\nkit3,121000\n";

        assert!(matches!(load_from_str(csv), Err(CatalogLoadError::Parse(_))));
    }

    #[test]
    fn test_non_numeric_price_returns_parse_error() {
        let csv = "kit_id,label,unit_price\nkit3,3 kW Kit,lots\n";

        assert!(matches!(load_from_str(csv), Err(CatalogLoadError::Parse(_))));
    }
}
