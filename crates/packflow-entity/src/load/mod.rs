//! Load domain entities and pure lifecycle value logic.

pub mod line;
pub mod model;
pub mod number;
pub mod receipt;
pub mod status;
pub mod timing;

pub use line::{CreateLoadLine, LoadPackagingLine, ReceiptLineInput};
pub use model::{CreateLoad, Load, LoadWithLines, UpdateLoad};
pub use number::{load_number_prefix, next_load_number};
pub use receipt::{PlannedReceiptLine, ReceiptPlan};
pub use status::LoadStatus;
pub use timing::OnTimeStatus;
