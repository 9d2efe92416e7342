//! User actions on the page, one module per control.

pub mod gate;
pub mod upload;
pub mod wash;
