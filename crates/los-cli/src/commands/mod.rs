//! Command implementations

pub(crate) mod about;
pub(crate) mod predict;
pub(crate) mod train;
