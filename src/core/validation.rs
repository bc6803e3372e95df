use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::error::{TransactionError, ValidationError};
use super::types::*;

/// Check the one rule an override carries on its own: a tax-date override
/// needs a date.
pub fn validate_tax_override(
    override_type: TaxOverrideType,
    tax_date: Option<NaiveDate>,
) -> Result<(), TransactionError> {
    if override_type == TaxOverrideType::TaxDate && tax_date.is_none() {
        return Err(TransactionError::Validation(
            "a TaxDate override requires a tax date".into(),
        ));
    }
    Ok(())
}

/// Pre-flight checks on a request before it goes to the tax service.
/// Returns all findings (not just the first).
pub fn validate_request(request: &TransactionRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if request.company_code.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "company_code",
            "company code must not be empty",
            "TX-01",
        ));
    }

    if request.customer_code.trim().is_empty() {
        errors.push(ValidationError::with_rule(
            "customer_code",
            "customer code must not be empty",
            "TX-02",
        ));
    }

    if request.lines.is_empty() {
        errors.push(ValidationError::with_rule(
            "lines",
            "at least one line is required",
            "TX-03",
        ));
    }

    if let Some(code) = &request.currency_code {
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            errors.push(ValidationError::with_rule(
                "currency_code",
                format!("currency code '{code}' must be 3 uppercase letters (ISO 4217)"),
                "TX-08",
            ));
        }
    }

    validate_override(request.tax_override.as_ref(), "tax_override", &mut errors);
    validate_addresses(&request.addresses, "addresses", &mut errors);

    for (i, line) in request.lines.iter().enumerate() {
        let path = format!("lines[{i}]");

        // Numbers are issued 1..N in insertion order.
        let expected = (i + 1).to_string();
        if line.number != expected {
            errors.push(ValidationError::with_rule(
                format!("{path}.number"),
                format!("expected line number {expected}, found '{}'", line.number),
                "TX-05",
            ));
        }

        validate_override(
            line.tax_override.as_ref(),
            &format!("{path}.tax_override"),
            &mut errors,
        );
        validate_addresses(&line.addresses, &format!("{path}.addresses"), &mut errors);
    }

    errors
}

fn validate_override(
    tax_override: Option<&TaxOverride>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    let Some(o) = tax_override else {
        return;
    };
    if validate_tax_override(o.override_type, o.tax_date).is_err() {
        errors.push(ValidationError::with_rule(
            format!("{path}.tax_date"),
            "a TaxDate override requires a tax date",
            "TX-04",
        ));
    }
}

fn validate_addresses(
    addresses: &BTreeMap<TransactionAddressType, AddressInfo>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    for (role, address) in addresses {
        let field = format!("{path}.{}", role.name());

        if address.is_postal() && address.country.as_deref().is_none_or(|c| c.trim().is_empty()) {
            errors.push(ValidationError::with_rule(
                format!("{field}.country"),
                "postal address must include a country",
                "TX-06",
            ));
        }

        if let Some(lat) = address.latitude {
            if lat < dec!(-90) || lat > dec!(90) {
                errors.push(ValidationError::with_rule(
                    format!("{field}.latitude"),
                    format!("latitude {lat} is outside [-90, 90]"),
                    "TX-07",
                ));
            }
        }
        if let Some(lon) = address.longitude {
            if lon < dec!(-180) || lon > dec!(180) {
                errors.push(ValidationError::with_rule(
                    format!("{field}.longitude"),
                    format!("longitude {lon} is outside [-180, 180]"),
                    "TX-07",
                ));
            }
        }
        if address.latitude.is_some() != address.longitude.is_some() {
            errors.push(ValidationError::with_rule(
                field,
                "latitude and longitude must be given together",
                "TX-07",
            ));
        }
    }
}
