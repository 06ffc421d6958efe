mod kit_catalog;
mod notification;
mod order_draft;
mod pricing_summary;
mod snapshot;
mod submission_payload;

pub use kit_catalog::{CatalogError, Kit, KitCatalog, KitId};
pub use notification::Notification;
pub use order_draft::{ORDER_DATE_FORMAT, OrderDraft};
pub use pricing_summary::{KitLine, PricingSummary, SummaryText};
pub use snapshot::PersistedSnapshot;
pub use submission_payload::{NO_FILE_UPLOADED, SubmissionPayload};
