//! Submission through the client seam, sync and async.

use std::future::Future;
use std::sync::Mutex;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxline::client::{DocumentStatus, TaxClient, Transaction, TransactionLine};
use taxline::core::*;

/// Records every submission and answers with a flat 10% tax.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<(Option<String>, TransactionRequest)>>,
}

impl RecordingClient {
    fn calls(&self) -> Vec<(Option<String>, TransactionRequest)> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(request: &TransactionRequest) -> Transaction {
        let lines: Vec<TransactionLine> = request
            .lines
            .iter()
            .map(|l| TransactionLine {
                line_number: l.number.clone(),
                tax_code: l.tax_code.clone(),
                line_amount: l.amount,
                exempt_amount: if l.exemption_code.is_some() { l.amount } else { Decimal::ZERO },
                discount_amount: Decimal::ZERO,
                taxable_amount: if l.exemption_code.is_some() { Decimal::ZERO } else { l.amount },
                tax: if l.exemption_code.is_some() { Decimal::ZERO } else { l.amount * dec!(0.10) },
            })
            .collect();
        Transaction {
            id: 1,
            code: request.code.clone().unwrap_or_else(|| "generated".into()),
            company_code: Some(request.company_code.clone()),
            date: request.date,
            doc_type: request.doc_type,
            status: if request.commit { DocumentStatus::Committed } else { DocumentStatus::Saved },
            customer_code: Some(request.customer_code.clone()),
            total_amount: request.total_amount(),
            total_exempt: lines.iter().map(|l| l.exempt_amount).sum(),
            total_discount: Decimal::ZERO,
            total_taxable: lines.iter().map(|l| l.taxable_amount).sum(),
            total_tax: lines.iter().map(|l| l.tax).sum(),
            lines,
        }
    }
}

impl TaxClient for RecordingClient {
    type Error = std::io::Error;

    fn create_transaction(
        &self,
        include: Option<&str>,
        request: &TransactionRequest,
    ) -> Result<Transaction, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((include.map(str::to_string), request.clone()));
        Ok(Self::answer(request))
    }

    fn create_transaction_async(
        &self,
        include: Option<String>,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Transaction, Self::Error>> + Send {
        let result = self.create_transaction(include.as_deref(), &request);
        async move {
            tokio::task::yield_now().await;
            result
        }
    }
}

/// Client-side failure kinds the builder must not touch.
#[derive(Debug, PartialEq, thiserror::Error)]
enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("HTTP {0}")]
    Http(u16),
}

struct FailingClient(u16);

impl TaxClient for FailingClient {
    type Error = ServiceError;

    fn create_transaction(
        &self,
        _include: Option<&str>,
        _request: &TransactionRequest,
    ) -> Result<Transaction, ServiceError> {
        Err(match self.0 {
            401 => ServiceError::Unauthorized,
            code => ServiceError::Http(code),
        })
    }

    fn create_transaction_async(
        &self,
        include: Option<String>,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Transaction, ServiceError>> + Send {
        let result = self.create_transaction(include.as_deref(), &request);
        async move { result }
    }
}

fn sale(client: &RecordingClient) -> TransactionBuilder<'_, RecordingClient> {
    TransactionBuilder::new(client, "ACME", DocumentType::SalesInvoice, "CUST1")
        .with_transaction_code("INV-1")
        .with_line(dec!(100.00), None, "P0000000")
        .with_exempt_line(dec!(50), "A")
}

#[test]
fn sync_submission_hands_over_request() {
    let client = RecordingClient::default();
    let b = sale(&client).with_commit(true).with_include("Lines");
    let tx = b.create().unwrap();

    assert_eq!(tx.code, "INV-1");
    assert_eq!(tx.status, DocumentStatus::Committed);
    assert_eq!(tx.total_amount, dec!(150.00));
    assert_eq!(tx.total_tax, dec!(10.0000));
    assert_eq!(tx.total_exempt, dec!(50));
    assert_eq!(tx.line("2").unwrap().tax, Decimal::ZERO);

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.as_deref(), Some("Lines"));
    assert_eq!(&calls[0].1, b.model());
}

#[test]
fn sync_errors_are_unchanged() {
    let client = FailingClient(401);
    let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1")
        .with_line(dec!(1), None, "A");
    assert_eq!(b.create().unwrap_err(), ServiceError::Unauthorized);

    let client = FailingClient(503);
    let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1");
    assert_eq!(b.create().unwrap_err(), ServiceError::Http(503));
}

#[test]
fn builder_stays_usable_after_submission() {
    let client = RecordingClient::default();
    let b = sale(&client);
    let first = b.create().unwrap();

    // Mutating after submission does not affect the earlier result,
    // but a second submission sees the change.
    let b = b.with_line(dec!(25), Some(dec!(5)), "P0000000");
    assert_eq!(first.lines.len(), 2);
    assert_eq!(first.total_amount, dec!(150.00));

    let second = b.create().unwrap();
    assert_eq!(second.lines.len(), 3);
    assert_eq!(second.line("3").unwrap().line_amount, dec!(25));

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1.lines.len(), 2);
    assert_eq!(calls[1].1.lines.len(), 3);
}

#[test]
fn failed_submission_keeps_model() {
    let client = FailingClient(500);
    let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesInvoice, "CUST1")
        .with_line(dec!(1), None, "A");
    assert!(b.create().is_err());
    assert_eq!(b.model().lines.len(), 1);
    assert!(b.create().is_err());
}

#[tokio::test]
async fn async_submission() {
    let client = RecordingClient::default();
    let b = sale(&client).with_include("Lines,Summary");
    let tx = b.create_async().await.unwrap();

    assert_eq!(tx.status, DocumentStatus::Saved);
    assert_eq!(tx.lines.len(), 2);
    let calls = client.calls();
    assert_eq!(calls[0].0.as_deref(), Some("Lines,Summary"));
}

#[tokio::test]
async fn async_snapshot_taken_at_call_time() {
    let client = RecordingClient::default();
    let b = sale(&client);
    let pending = b.create_async();

    // The future does not borrow the builder.
    let b = b.with_line(dec!(1), None, "late");
    let tx = pending.await.unwrap();
    assert_eq!(tx.lines.len(), 2);
    assert_eq!(b.model().lines.len(), 3);
}

#[tokio::test]
async fn async_errors_are_unchanged() {
    let client = FailingClient(429);
    let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1");
    assert_eq!(b.create_async().await.unwrap_err(), ServiceError::Http(429));
}

#[tokio::test]
async fn async_future_is_send() {
    let client: &'static RecordingClient = Box::leak(Box::new(RecordingClient::default()));
    let b = sale(client);
    let handle = tokio::spawn(b.create_async());
    let tx = handle.await.unwrap().unwrap();
    assert_eq!(tx.total_amount, dec!(150.00));
}
