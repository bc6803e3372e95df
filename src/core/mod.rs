//! Request model, fluent builder, line numbering and pre-flight validation.
//!
//! The builder owns a [`TransactionRequest`] and mutates it in place until
//! it is handed to a [`crate::client::TaxClient`] or wrapped into an
//! [`AdjustmentRequest`].

mod builder;
mod error;
mod numbering;
mod types;
mod validation;

pub use builder::*;
pub use error::*;
pub use numbering::*;
pub use types::*;
pub use validation::*;
