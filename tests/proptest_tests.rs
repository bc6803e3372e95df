//! Property-based tests for line numbering, defaults and overrides.

use std::future::Future;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use taxline::client::{TaxClient, Transaction};
use taxline::core::*;

struct UnusedClient;

impl TaxClient for UnusedClient {
    type Error = std::io::Error;

    fn create_transaction(
        &self,
        _include: Option<&str>,
        _request: &TransactionRequest,
    ) -> Result<Transaction, Self::Error> {
        Err(std::io::Error::other("not connected"))
    }

    fn create_transaction_async(
        &self,
        _include: Option<String>,
        _request: TransactionRequest,
    ) -> impl Future<Output = Result<Transaction, Self::Error>> + Send {
        async { Err(std::io::Error::other("not connected")) }
    }
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Generate an amount (0.01 to 99999.99).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

fn arb_quantity() -> impl Strategy<Value = Option<Decimal>> {
    prop::option::of((1i64..1000).prop_map(Decimal::from))
}

#[derive(Debug, Clone)]
enum Append {
    Plain(Decimal, Option<Decimal>),
    Exempt(Decimal),
    Separate(Decimal),
}

fn arb_append() -> impl Strategy<Value = Append> {
    prop_oneof![
        (arb_amount(), arb_quantity()).prop_map(|(a, q)| Append::Plain(a, q)),
        arb_amount().prop_map(Append::Exempt),
        arb_amount().prop_map(Append::Separate),
    ]
}

fn apply<'a>(b: TransactionBuilder<'a, UnusedClient>, op: &Append) -> TransactionBuilder<'a, UnusedClient> {
    match op {
        Append::Plain(amount, quantity) => b.with_line(*amount, *quantity, "P0000000"),
        Append::Exempt(amount) => b.with_exempt_line(*amount, "E"),
        Append::Separate(amount) => b.with_separate_address_line(
            *amount,
            TransactionAddressType::ShipTo,
            "1 Main St",
            None,
            None,
            "Seattle",
            "WA",
            "98101",
            "US",
        ),
    }
}

proptest! {
    #[test]
    fn line_numbers_are_one_to_n(ops in prop::collection::vec(arb_append(), 0..40)) {
        let client = UnusedClient;
        let mut b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1");
        for op in &ops {
            b = apply(b, op);
        }
        let numbers: Vec<String> = b.model().lines.iter().map(|l| l.number.clone()).collect();
        let expected: Vec<String> = (1..=ops.len()).map(|n| n.to_string()).collect();
        prop_assert_eq!(numbers, expected);
    }

    #[test]
    fn quantity_defaults_to_one(amount in arb_amount(), quantity in arb_quantity()) {
        let client = UnusedClient;
        let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1")
            .with_line(amount, quantity, "P0000000");
        let line = &b.model().lines[0];
        prop_assert_eq!(line.quantity, quantity.unwrap_or(Decimal::ONE));
        prop_assert_eq!(line.amount, amount);
    }

    #[test]
    fn item_discount_marks_only_last(n in 1usize..20) {
        let client = UnusedClient;
        let mut b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1");
        for i in 0..n {
            b = b.with_line(Decimal::from(i as i64 + 1), None, "P0000000");
        }
        let b = b.with_item_discount(true).unwrap();
        let discounted: Vec<usize> = b
            .model()
            .lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.discounted)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(discounted, vec![n - 1]);
    }

    #[test]
    fn tax_date_override_needs_date(
        days in 0i64..20_000,
        amount in prop::option::of(arb_amount()),
        with_date in any::<bool>(),
    ) {
        let client = UnusedClient;
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap() + chrono::Duration::days(days);
        let tax_date = with_date.then_some(date);
        let result = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1")
            .with_line(Decimal::ONE, None, "P0000000")
            .with_line_tax_override(TaxOverrideType::TaxDate, "reason", amount, tax_date);

        if with_date {
            let b = result.unwrap();
            let o = b.model().lines[0].tax_override.clone().unwrap();
            prop_assert_eq!(o.tax_date, Some(date));
            prop_assert_eq!(o.tax_amount, amount.unwrap_or(Decimal::ZERO));
        } else {
            prop_assert!(matches!(result, Err(TransactionError::Validation(_))));
        }
    }

    #[test]
    fn address_set_twice_keeps_second(
        first in "[A-Z][a-z]{2,10}",
        second in "[A-Z][a-z]{2,10}",
    ) {
        let client = UnusedClient;
        let role = TransactionAddressType::PointOfOrderOrigin;
        let b = TransactionBuilder::new(&client, "ACME", DocumentType::SalesOrder, "CUST1")
            .with_address(role, "1 Main St", None, None, &first, "WA", "98101", "US")
            .with_address(role, "2 Main St", None, None, &second, "OR", "97201", "US")
            .with_line(Decimal::ONE, None, "P0000000")
            .with_line_address(role, "3 Main St", None, None, &first, "WA", "98101", "US")
            .unwrap()
            .with_line_address(role, "4 Main St", None, None, &second, "OR", "97201", "US")
            .unwrap();

        let m = b.model();
        prop_assert_eq!(m.addresses.len(), 1);
        prop_assert_eq!(m.addresses[&role].city.as_deref(), Some(second.as_str()));
        prop_assert_eq!(m.addresses[&role].line1.as_deref(), Some("2 Main St"));
        prop_assert_eq!(m.lines[0].addresses.len(), 1);
        prop_assert_eq!(m.lines[0].addresses[&role].line1.as_deref(), Some("4 Main St"));
        prop_assert_eq!(m.lines[0].addresses[&role].region.as_deref(), Some("OR"));
    }
}
