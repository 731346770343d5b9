//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod errors;
pub mod footer;
pub mod header;
pub mod info_panel;
pub mod logs;
pub mod series;
