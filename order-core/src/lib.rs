pub mod calculations;
pub mod db;
pub mod form;
pub mod models;
pub mod sink;
pub mod validation;

pub use db::repository::{KeyValueStore, StoreError};
pub use form::{FieldName, FieldStore, OrderForm};
pub use models::*;
pub use sink::{Delivery, OrderSink, SinkError};
