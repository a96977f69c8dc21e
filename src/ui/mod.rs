pub(crate) mod util;
pub(crate) mod views;
