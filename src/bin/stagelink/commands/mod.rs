//! Command implementations

pub mod link;
