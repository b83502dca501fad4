pub mod confirm;
pub mod hints;
pub mod toast;
