//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod detail;
pub mod footer;
pub mod header;
pub mod logs;
pub mod sources;
