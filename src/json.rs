//! JSON rendering of request payloads.
//!
//! Clients that talk JSON over HTTP can use these instead of reaching for
//! `serde_json` themselves. Field names are camelCase, amounts are strings.
//!
//! # Example
//!
//! ```ignore
//! use taxline::json;
//!
//! let body = json::to_json(builder.model())?;
//! let tx = json::transaction_from_json(&response_body)?;
//! ```

use crate::client::Transaction;
use crate::core::{AdjustmentRequest, TransactionRequest};

/// Error rendering or parsing JSON.
#[derive(Debug, thiserror::Error)]
#[error("JSON error: {0}")]
pub struct JsonError(#[from] serde_json::Error);

pub fn to_json(request: &TransactionRequest) -> Result<String, JsonError> {
    Ok(serde_json::to_string(request)?)
}

pub fn to_json_pretty(request: &TransactionRequest) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(request)?)
}

pub fn adjustment_to_json(request: &AdjustmentRequest) -> Result<String, JsonError> {
    Ok(serde_json::to_string(request)?)
}

/// Parse a transaction outcome returned by the service.
pub fn transaction_from_json(body: &str) -> Result<Transaction, JsonError> {
    Ok(serde_json::from_str(body)?)
}

/// Parse a request, e.g. one saved for later resubmission.
pub fn request_from_json(body: &str) -> Result<TransactionRequest, JsonError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn request() -> TransactionRequest {
        let mut req = TransactionRequest::new(
            "ACME",
            DocumentType::SalesInvoice,
            "CUST1",
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
        );
        req.addresses.insert(
            TransactionAddressType::ShipFrom,
            AddressInfo::lat_long(dec!(47.6), dec!(-122.3)),
        );
        req
    }

    #[test]
    fn field_names_are_camel_case() {
        let json = to_json(&request()).unwrap();
        assert!(json.contains("\"companyCode\":\"ACME\""));
        assert!(json.contains("\"type\":\"SalesInvoice\""));
        assert!(json.contains("\"date\":\"2024-06-15\""));
        assert!(json.contains("\"shipFrom\":{\"latitude\":\"47.6\",\"longitude\":\"-122.3\"}"));
        // Empty maps are left out.
        assert!(!json.contains("\"parameters\""));
    }

    #[test]
    fn pretty_output_parses_back() {
        let req = request();
        let pretty = to_json_pretty(&req).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(request_from_json(&pretty).unwrap(), req);
    }

    #[test]
    fn malformed_transaction() {
        let err = transaction_from_json("{\"id\": \"nope\"}").unwrap_err();
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
