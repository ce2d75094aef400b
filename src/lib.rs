//! Agreements dashboard core: load one spreadsheet range into an immutable
//! [`Dataset`](data::Dataset), filter it, count it, and look rows up.
//!
//! ```text
//!  SheetSource ──fetch──▶ Dataset ──apply──▶ FilteredView ──▶ summary / lookup
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod source;
pub mod state;

pub use error::{Result, SheetError};
