//! Loads the kit catalog from an on-disk fixture, complementing the
//! inline-string unit tests in csv_loader.rs.

use std::path::{Path, PathBuf};

use order_core::models::KitId;
use order_ui::csv_loader::{self, CatalogLoadError};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("kits.csv")
}

#[test]
fn test_load_fixture_file_succeeds() {
    let catalog =
        csv_loader::load_from_file(&fixture_path()).expect("fixture file should load without error");

    assert_eq!(catalog.kits().len(), 4);
}

#[test]
fn test_fixture_keeps_file_order() {
    let catalog = csv_loader::load_from_file(&fixture_path()).unwrap();
    let ids: Vec<&str> = catalog.ids().map(KitId::as_str).collect();

    assert_eq!(ids, vec!["kit3", "kit4", "kit5", "kit10"]);
}

#[test]
fn test_fixture_prices() {
    let catalog = csv_loader::load_from_file(&fixture_path()).unwrap();

    let kit = catalog.get(&KitId::from("kit10")).unwrap();
    assert_eq!(kit.label, "10 kW Kit");
    assert_eq!(kit.unit_price, dec!(365000));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = csv_loader::load_from_file(Path::new("tests/fixtures/does_not_exist.csv"));

    assert!(matches!(result, Err(CatalogLoadError::Io { .. })));
}
