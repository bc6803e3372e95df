use std::future::Future;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use taxline::client::{DocumentStatus, TaxClient, Transaction, TransactionLine};
use taxline::core::*;

/// Stand-in for a real HTTP client: charges a flat 9.5% on taxable lines.
struct FlatRateClient;

impl TaxClient for FlatRateClient {
    type Error = std::io::Error;

    fn create_transaction(
        &self,
        _include: Option<&str>,
        request: &TransactionRequest,
    ) -> Result<Transaction, Self::Error> {
        let lines: Vec<TransactionLine> = request
            .lines
            .iter()
            .map(|l| {
                let exempt = l.exemption_code.is_some();
                TransactionLine {
                    line_number: l.number.clone(),
                    tax_code: l.tax_code.clone(),
                    line_amount: l.amount,
                    exempt_amount: if exempt { l.amount } else { Decimal::ZERO },
                    discount_amount: Decimal::ZERO,
                    taxable_amount: if exempt { Decimal::ZERO } else { l.amount },
                    tax: if exempt { Decimal::ZERO } else { (l.amount * dec!(0.095)).round_dp(2) },
                }
            })
            .collect();

        Ok(Transaction {
            id: 1,
            code: request.code.clone().unwrap_or_else(|| "DEMO".into()),
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
        })
    }

    fn create_transaction_async(
        &self,
        include: Option<String>,
        request: TransactionRequest,
    ) -> impl Future<Output = Result<Transaction, Self::Error>> + Send {
        let result = self.create_transaction(include.as_deref(), &request);
        async move { result }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = FlatRateClient;

    let builder = TransactionBuilder::new(&client, "DEFAULT", DocumentType::SalesInvoice, "ABC")
        .with_transaction_code("DEMO-001")
        .with_commit(true)
        .with_address(
            TransactionAddressType::SingleLocation,
            "100 Ravine Ln",
            None,
            None,
            "Bainbridge Island",
            "WA",
            "98110",
            "US",
        )
        .with_line(dec!(100.00), None, "P0000000")
        .with_line_parameter("Description", "Yarn")?
        .with_line(dec!(40.00), Some(dec!(4)), "PC040100")
        .with_item_discount(true)?
        .with_exempt_line(dec!(50.00), "A")
        .with_discount_amount(dec!(5.00));

    builder.validate()?;

    let tx = builder.create()?;
    println!("=== {} ({}) ===", tx.code, tx.status.name());
    for line in &tx.lines {
        println!(
            "  line {}: amount={} taxable={} tax={}",
            line.line_number, line.line_amount, line.taxable_amount, line.tax
        );
    }
    println!("  total amount: {}", tx.total_amount);
    println!("  total tax:    {}", tx.total_tax);

    // A line-scoped call needs a line first.
    let fresh = TransactionBuilder::new(&client, "DEFAULT", DocumentType::SalesOrder, "ABC");
    if let Err(e) = fresh.with_line_parameter("Description", "orphan") {
        println!("\nexpected error: {e}");
    }

    Ok(())
}
