//! Database models module
//!
//! Row structs are consolidated in models.rs, table.rs holds the generic
//! repository handle.

mod models;
mod table;

pub use models::*;

pub use table::Table;
