mod category;
mod transaction;

pub(crate) use category::Category;
pub(crate) use transaction::{FieldError, Kind, Transaction};
