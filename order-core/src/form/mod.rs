pub mod clock;
pub mod field_store;
pub mod session;
pub mod submission;

pub use clock::{Clock, FixedClock, SystemClock};
pub use field_store::{FieldName, FieldStore, parse_quantity};
pub use session::OrderForm;
pub use submission::{
    SUBMIT_FAILURE_MESSAGE, SUBMIT_SUCCESS_MESSAGE, SUCCESS_RESET_DELAY, SubmissionState,
    SubmitRejected,
};
