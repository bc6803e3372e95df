use std::future::Future;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use taxline::client::{TaxClient, Transaction};
use taxline::core::*;
use taxline::json;

/// Client that only prints what it would send.
struct DryRunClient;

impl TaxClient for DryRunClient {
    type Error = std::io::Error;

    fn create_transaction(
        &self,
        include: Option<&str>,
        request: &TransactionRequest,
    ) -> Result<Transaction, Self::Error> {
        let body = json::to_json_pretty(request).map_err(std::io::Error::other)?;
        println!("POST /transactions/create?$include={}", include.unwrap_or(""));
        println!("{body}");
        Err(std::io::Error::other("dry run"))
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
    let client = DryRunClient;

    let builder = TransactionBuilder::new(&client, "DEFAULT", DocumentType::ReturnInvoice, "ABC")
        .with_transaction_code("RET-2024-17")
        .with_date(NaiveDate::from_ymd_opt(2024, 6, 15).ok_or("bad date")?)
        .with_lat_long(TransactionAddressType::SingleLocation, dec!(47.627935), dec!(-122.51638))
        .with_line(dec!(-100.00), None, "P0000000")
        // Returns are taxed at the rates of the original sale.
        .with_line_tax_override(
            TaxOverrideType::TaxDate,
            "Return of original sale",
            None,
            NaiveDate::from_ymd_opt(2024, 1, 10),
        )?;

    match builder.create() {
        Ok(tx) => println!("created {}", tx.code),
        Err(e) => println!("not sent: {e}"),
    }

    let adjustment =
        builder.create_adjustment_request("Customer returned item", AdjustmentReason::ProductReturned);
    println!("\nadjustment payload:");
    println!("{}", json::adjustment_to_json(&adjustment)?);

    Ok(())
}
