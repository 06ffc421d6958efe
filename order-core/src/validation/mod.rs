//! Submit-eligibility checks for the order form.

pub mod rules;
pub mod validator;

pub use rules::{is_valid_mobile, is_valid_order_date, parse_order_date};
pub use validator::{FieldState, ValidationError, ValidationReport, Validator};
