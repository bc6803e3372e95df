//! # taxline
//!
//! Fluent builder for tax-transaction requests. A [`TransactionBuilder`]
//! accumulates header fields, addresses, line items, overrides and custom
//! parameters, then submits the finished request through a [`TaxClient`]
//! supplied by the caller.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Transport, authentication and retries belong to the client implementation.
//!
//! ## Quick Start
//!
//! ```rust
//! use taxline::core::*;
//! use rust_decimal_macros::dec;
//!
//! # struct NoopClient;
//! # impl taxline::client::TaxClient for NoopClient {
//! #     type Error = std::io::Error;
//! #     fn create_transaction(&self, _: Option<&str>, _: &TransactionRequest)
//! #         -> Result<taxline::client::Transaction, Self::Error> { Err(std::io::Error::other("offline")) }
//! #     fn create_transaction_async(&self, _: Option<String>, _: TransactionRequest)
//! #         -> impl std::future::Future<Output = Result<taxline::client::Transaction, Self::Error>> + Send
//! #     { async { Err(std::io::Error::other("offline")) } }
//! # }
//! # let client = NoopClient;
//! let builder = TransactionBuilder::new(&client, "ACME", DocumentType::SalesInvoice, "CUST1")
//!     .with_address(TransactionAddressType::ShipFrom, "100 Ravine Ln", None, None,
//!         "Bainbridge Island", "WA", "98110", "US")
//!     .with_line(dec!(100.00), None, "P0000000")
//!     .with_line_parameter("Description", "Widget")
//!     .unwrap();
//!
//! let line = &builder.model().lines[0];
//! assert_eq!(line.number, "1");
//! assert_eq!(line.quantity, dec!(1));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Request model, builder, client trait, validation |
//! | `json` | JSON rendering of request payloads |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod client;

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "json")]
pub mod json;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::client::{TaxClient, Transaction};
#[cfg(feature = "core")]
pub use crate::core::*;
