//! Clean, preview and convert CSV and Excel files.
//!
//! The [`data`] module holds the whole transform pipeline; the `fileflow`
//! binary is an egui front end over it.

pub mod data;
pub mod error;

pub use error::{FlowError, Result};
