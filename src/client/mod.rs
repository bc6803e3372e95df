//! The client seam: how a finished request reaches the tax service.
//!
//! This crate does not ship a transport. Callers implement [`TaxClient`]
//! over whatever HTTP stack and credentials they use; the builder only
//! hands the request over and returns the client's answer or error as-is.

use std::future::Future;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{DocumentType, TransactionRequest};

/// A tax service client.
///
/// `include` carries the optional comma-separated list of extra data the
/// service should return (e.g. `"Lines,Details"`).
pub trait TaxClient {
    /// Transport, authentication or service-side failure.
    type Error: std::error::Error;

    /// Create a transaction and wait for the result.
    fn create_transaction(
        &self,
        include: Option<&str>,
        request: &TransactionRequest,
    ) -> Result<Transaction, Self::Error>;

    /// Create a transaction without blocking the caller.
    ///
    /// Cancellation and timeouts are up to the implementation; dropping the
    /// returned future is the only cancellation the builder offers.
    fn create_transaction_async(
        &self,
        include: Option<String>,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Transaction, Self::Error>> + Send;
}

/// Outcome of a created transaction as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Service-assigned identifier.
    pub id: i64,
    /// Document code.
    pub code: String,
    pub company_code: Option<String>,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub status: DocumentStatus,
    pub customer_code: Option<String>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub total_exempt: Decimal,
    #[serde(default)]
    pub total_discount: Decimal,
    #[serde(default)]
    pub total_taxable: Decimal,
    #[serde(default)]
    pub total_tax: Decimal,
    /// Present when the request asked for `Lines`.
    #[serde(default)]
    pub lines: Vec<TransactionLine>,
}

impl Transaction {
    /// Line outcome by line number.
    pub fn line(&self, number: &str) -> Option<&TransactionLine> {
        self.lines.iter().find(|l| l.line_number == number)
    }
}

/// Per-line outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub line_number: String,
    pub tax_code: Option<String>,
    #[serde(default)]
    pub line_amount: Decimal,
    #[serde(default)]
    pub exempt_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub taxable_amount: Decimal,
    #[serde(default)]
    pub tax: Decimal,
}

/// Lifecycle status of a document on the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Estimate, not stored.
    Temporary,
    /// Stored, not yet reported.
    Saved,
    /// Reported to the tax authority.
    Posted,
    Committed,
    Cancelled,
    /// Replaced by an adjustment.
    Adjusted,
    Queued,
    PendingApproval,
    Any,
}

impl DocumentStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Temporary => "Temporary",
            Self::Saved => "Saved",
            Self::Posted => "Posted",
            Self::Committed => "Committed",
            Self::Cancelled => "Cancelled",
            Self::Adjusted => "Adjusted",
            Self::Queued => "Queued",
            Self::PendingApproval => "PendingApproval",
            Self::Any => "Any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Temporary,
            Self::Saved,
            Self::Posted,
            Self::Committed,
            Self::Cancelled,
            Self::Adjusted,
            Self::Queued,
            Self::PendingApproval,
            Self::Any,
        ]
        .into_iter()
        .find(|s| s.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn transaction_deserialization() {
        let json = r#"{
            "id": 123456789,
            "code": "INV-1",
            "companyCode": "ACME",
            "date": "2024-06-15",
            "type": "SalesInvoice",
            "status": "Committed",
            "customerCode": "CUST1",
            "totalAmount": "100.00",
            "totalTax": "9.50",
            "lines": [{"lineNumber": "1", "taxCode": "P0000000", "lineAmount": "100.00", "tax": "9.50"}]
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.status, DocumentStatus::Committed);
        assert_eq!(tx.doc_type, DocumentType::SalesInvoice);
        assert_eq!(tx.total_tax, dec!(9.50));
        assert_eq!(tx.total_exempt, Decimal::ZERO);
        assert_eq!(tx.line("1").unwrap().tax, dec!(9.50));
        assert!(tx.line("2").is_none());
    }

    #[test]
    fn status_names() {
        assert_eq!(DocumentStatus::PendingApproval.name(), "PendingApproval");
        assert_eq!(DocumentStatus::from_name("Posted"), Some(DocumentStatus::Posted));
        assert_eq!(DocumentStatus::from_name("posted"), None);
    }
}
