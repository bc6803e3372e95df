use std::future::Future;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::TransactionError;
use super::numbering::LineNumberSequence;
use super::types::*;
use super::validation;
use crate::client::{TaxClient, Transaction};

/// Builder for transaction requests.
///
/// Every call mutates the owned [`TransactionRequest`] in place and hands
/// the builder back. Calls that target "the most recent line" fail with
/// [`TransactionError::IllegalState`] until a line has been added.
///
/// Submitting does not seal the builder: [`create`](Self::create) and
/// [`create_async`](Self::create_async) borrow it, so it can be changed and
/// submitted again. Each submission sees the request as it was at call time.
///
/// ```
/// use taxline::core::*;
/// use rust_decimal_macros::dec;
/// use chrono::NaiveDate;
///
/// # struct NoopClient;
/// # impl taxline::client::TaxClient for NoopClient {
/// #     type Error = std::io::Error;
/// #     fn create_transaction(&self, _: Option<&str>, _: &TransactionRequest)
/// #         -> Result<taxline::client::Transaction, Self::Error> { Err(std::io::Error::other("offline")) }
/// #     fn create_transaction_async(&self, _: Option<String>, _: TransactionRequest)
/// #         -> impl std::future::Future<Output = Result<taxline::client::Transaction, Self::Error>> + Send
/// #     { async { Err(std::io::Error::other("offline")) } }
/// # }
/// # fn main() -> Result<(), TransactionError> {
/// # let client = NoopClient;
/// let builder = TransactionBuilder::new(&client, "ACME", DocumentType::SalesInvoice, "CUST1")
///     .with_date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
///     .with_commit(true)
///     .with_address(TransactionAddressType::SingleLocation, "100 Ravine Ln", None, None,
///         "Bainbridge Island", "WA", "98110", "US")
///     .with_line(dec!(100), None, "P0000000")
///     .with_line_tax_override(TaxOverrideType::TaxDate, "Return", None,
///         Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()))?
///     .with_exempt_line(dec!(50), "A");
///
/// assert_eq!(builder.model().lines.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct TransactionBuilder<'a, C: TaxClient> {
    client: &'a C,
    request: TransactionRequest,
    line_numbers: LineNumberSequence,
    include: Option<String>,
}

/// Values applied to every builder created with
/// [`TransactionBuilder::from_defaults`].
///
/// Deserializable from any serde format, so it can live in the caller's
/// configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionDefaults {
    pub company_code: String,
    pub currency_code: Option<String>,
    pub commit: bool,
    pub debug_level: TaxDebugLevel,
    pub reporting_location_code: Option<String>,
    pub customer_usage_type: Option<String>,
    /// Passed to the client as the `include` option.
    pub include: Option<String>,
}

impl<'a, C: TaxClient> TransactionBuilder<'a, C> {
    /// Start a request dated today (local time) with no lines.
    pub fn new(
        client: &'a C,
        company_code: impl Into<String>,
        doc_type: DocumentType,
        customer_code: impl Into<String>,
    ) -> Self {
        Self {
            client,
            request: TransactionRequest::new(
                company_code,
                doc_type,
                customer_code,
                Local::now().date_naive(),
            ),
            line_numbers: LineNumberSequence::new(),
            include: None,
        }
    }

    /// Start a request seeded from configured defaults.
    pub fn from_defaults(
        client: &'a C,
        defaults: &TransactionDefaults,
        doc_type: DocumentType,
        customer_code: impl Into<String>,
    ) -> Self {
        let mut builder = Self::new(client, defaults.company_code.clone(), doc_type, customer_code)
            .with_commit(defaults.commit)
            .with_debug_level(defaults.debug_level);
        builder.request.currency_code = defaults.currency_code.clone();
        builder.request.reporting_location_code = defaults.reporting_location_code.clone();
        builder.request.customer_usage_type = defaults.customer_usage_type.clone();
        builder.include = defaults.include.clone();
        builder
    }

    // --- Header ---

    pub fn with_commit(mut self, commit: bool) -> Self {
        self.request.commit = commit;
        self
    }

    /// Ask the service for diagnostic output.
    pub fn with_diagnostics(self) -> Self {
        self.with_debug_level(TaxDebugLevel::Diagnostic)
    }

    pub fn with_debug_level(mut self, level: TaxDebugLevel) -> Self {
        self.request.debug_level = level;
        self
    }

    pub fn with_discount_amount(mut self, discount: Decimal) -> Self {
        self.request.discount = discount;
        self
    }

    pub fn with_transaction_code(mut self, code: impl Into<String>) -> Self {
        self.request.code = Some(code.into());
        self
    }

    pub fn with_type(mut self, doc_type: DocumentType) -> Self {
        self.request.doc_type = doc_type;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.request.date = date;
        self
    }

    pub fn with_customer_usage_type(mut self, usage_type: impl Into<String>) -> Self {
        self.request.customer_usage_type = Some(usage_type.into());
        self
    }

    pub fn with_exemption_no(mut self, exemption_no: impl Into<String>) -> Self {
        self.request.exemption_no = Some(exemption_no.into());
        self
    }

    pub fn with_currency_code(mut self, code: impl Into<String>) -> Self {
        self.request.currency_code = Some(code.into());
        self
    }

    pub fn with_purchase_order_no(mut self, po: impl Into<String>) -> Self {
        self.request.purchase_order_no = Some(po.into());
        self
    }

    pub fn with_reference_code(mut self, reference: impl Into<String>) -> Self {
        self.request.reference_code = Some(reference.into());
        self
    }

    pub fn with_reporting_location_code(mut self, code: impl Into<String>) -> Self {
        self.request.reporting_location_code = Some(code.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.request.description = Some(description.into());
        self
    }

    pub fn with_salesperson_code(mut self, code: impl Into<String>) -> Self {
        self.request.salesperson_code = Some(code.into());
        self
    }

    /// Extra data to request from the service on submission (e.g. "Lines").
    pub fn with_include(mut self, include: impl Into<String>) -> Self {
        self.include = Some(include.into());
        self
    }

    /// Set a document-level parameter, replacing any previous value.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.parameters.insert(name.into(), value.into());
        self
    }

    // --- Document addresses ---

    /// Set the postal address for `role`, replacing any previous one.
    #[allow(clippy::too_many_arguments)]
    pub fn with_address(
        self,
        role: TransactionAddressType,
        line1: &str,
        line2: Option<&str>,
        line3: Option<&str>,
        city: &str,
        region: &str,
        postal_code: &str,
        country: &str,
    ) -> Self {
        self.with_address_info(
            role,
            AddressInfo::postal(line1, line2, line3, city, region, postal_code, country),
        )
    }

    /// Set the coordinate for `role`, replacing any previous address.
    pub fn with_lat_long(
        self,
        role: TransactionAddressType,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Self {
        self.with_address_info(role, AddressInfo::lat_long(latitude, longitude))
    }

    pub fn with_address_info(mut self, role: TransactionAddressType, address: AddressInfo) -> Self {
        self.request.addresses.insert(role, address);
        self
    }

    /// Set the document-level tax override. `tax_amount` defaults to zero.
    ///
    /// # Errors
    ///
    /// `Validation` for a `TaxDate` override without `tax_date`.
    pub fn with_tax_override(
        mut self,
        override_type: TaxOverrideType,
        reason: impl Into<String>,
        tax_amount: Option<Decimal>,
        tax_date: Option<NaiveDate>,
    ) -> Result<Self, TransactionError> {
        self.request.tax_override = Some(tax_override(override_type, reason, tax_amount, tax_date)?);
        Ok(self)
    }

    // --- Lines ---

    /// Append a line. `quantity` defaults to 1.
    pub fn with_line(
        mut self,
        amount: Decimal,
        quantity: Option<Decimal>,
        tax_code: impl Into<String>,
    ) -> Self {
        let mut line = self.new_line(amount, quantity.unwrap_or(Decimal::ONE));
        line.tax_code = Some(tax_code.into());
        self.push_line(line);
        self
    }

    /// Append a line shipped to or from its own address, quantity 1.
    #[allow(clippy::too_many_arguments)]
    pub fn with_separate_address_line(
        mut self,
        amount: Decimal,
        role: TransactionAddressType,
        line1: &str,
        line2: Option<&str>,
        line3: Option<&str>,
        city: &str,
        region: &str,
        postal_code: &str,
        country: &str,
    ) -> Self {
        let mut line = self.new_line(amount, Decimal::ONE);
        line.addresses.insert(
            role,
            AddressInfo::postal(line1, line2, line3, city, region, postal_code, country),
        );
        self.push_line(line);
        self
    }

    /// Append an exempt line with the given exemption code, quantity 1.
    pub fn with_exempt_line(mut self, amount: Decimal, exemption_code: impl Into<String>) -> Self {
        let mut line = self.new_line(amount, Decimal::ONE);
        line.exemption_code = Some(exemption_code.into());
        self.push_line(line);
        self
    }

    // --- Most recent line ---

    /// Set a parameter on the most recent line.
    pub fn with_line_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        self.last_line("WithLineParameter")?
            .parameters
            .insert(name.into(), value.into());
        Ok(self)
    }

    /// Set the postal address for `role` on the most recent line.
    #[allow(clippy::too_many_arguments)]
    pub fn with_line_address(
        self,
        role: TransactionAddressType,
        line1: &str,
        line2: Option<&str>,
        line3: Option<&str>,
        city: &str,
        region: &str,
        postal_code: &str,
        country: &str,
    ) -> Result<Self, TransactionError> {
        self.with_line_address_info(
            role,
            AddressInfo::postal(line1, line2, line3, city, region, postal_code, country),
        )
    }

    /// Set the coordinate for `role` on the most recent line.
    pub fn with_line_lat_long(
        self,
        role: TransactionAddressType,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Result<Self, TransactionError> {
        self.with_line_address_info(role, AddressInfo::lat_long(latitude, longitude))
    }

    pub fn with_line_address_info(
        mut self,
        role: TransactionAddressType,
        address: AddressInfo,
    ) -> Result<Self, TransactionError> {
        self.last_line("WithLineAddress")?
            .addresses
            .insert(role, address);
        Ok(self)
    }

    /// Set a tax override on the most recent line. `tax_amount` defaults to zero.
    ///
    /// # Errors
    ///
    /// `IllegalState` without a line, `Validation` for a `TaxDate` override
    /// without `tax_date`.
    pub fn with_line_tax_override(
        mut self,
        override_type: TaxOverrideType,
        reason: impl Into<String>,
        tax_amount: Option<Decimal>,
        tax_date: Option<NaiveDate>,
    ) -> Result<Self, TransactionError> {
        let line = self.last_line("WithLineTaxOverride")?;
        line.tax_override = Some(tax_override(override_type, reason, tax_amount, tax_date)?);
        Ok(self)
    }

    /// Flag the most recent line for the document-level discount.
    pub fn with_item_discount(mut self, discounted: bool) -> Result<Self, TransactionError> {
        self.last_line("WithItemDiscount")?.discounted = discounted;
        Ok(self)
    }

    pub fn with_line_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        self.last_line("WithLineDescription")?.description = Some(description.into());
        Ok(self)
    }

    pub fn with_line_item_code(mut self, item_code: impl Into<String>) -> Result<Self, TransactionError> {
        self.last_line("WithLineItemCode")?.item_code = Some(item_code.into());
        Ok(self)
    }

    pub fn with_line_customer_usage_type(
        mut self,
        usage_type: impl Into<String>,
    ) -> Result<Self, TransactionError> {
        self.last_line("WithLineCustomerUsageType")?.customer_usage_type = Some(usage_type.into());
        Ok(self)
    }

    /// Declare that the most recent line's amount already includes tax.
    pub fn with_line_tax_included(mut self, included: bool) -> Result<Self, TransactionError> {
        self.last_line("WithLineTaxIncluded")?.tax_included = included;
        Ok(self)
    }

    pub fn with_line_ref(
        mut self,
        ref1: impl Into<String>,
        ref2: Option<&str>,
    ) -> Result<Self, TransactionError> {
        let line = self.last_line("WithLineRef")?;
        line.ref1 = Some(ref1.into());
        line.ref2 = ref2.map(str::to_string);
        Ok(self)
    }

    // --- Finalization ---

    /// The request as built so far.
    pub fn model(&self) -> &TransactionRequest {
        &self.request
    }

    /// Direct mutable access to the request. Line numbers assigned later
    /// still continue from the builder's own counter.
    pub fn model_mut(&mut self) -> &mut TransactionRequest {
        &mut self.request
    }

    /// Give up the builder and keep the request.
    pub fn into_model(self) -> TransactionRequest {
        self.request
    }

    /// Number of the line the next append will receive.
    pub fn next_line_number(&self) -> String {
        self.line_numbers.peek()
    }

    /// Run the pre-flight checks of [`super::validate_request`].
    pub fn validate(&self) -> Result<(), TransactionError> {
        let errors = validation::validate_request(&self.request);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    /// Submit the request and wait for the result.
    ///
    /// Client errors are returned exactly as the client produced them.
    pub fn create(&self) -> Result<Transaction, C::Error> {
        info!(
            company_code = %self.request.company_code,
            code = ?self.request.code,
            lines = self.request.lines.len(),
            "creating transaction"
        );
        self.client
            .create_transaction(self.include.as_deref(), &self.request)
    }

    /// Submit the request without blocking.
    ///
    /// The request is captured when this is called; the builder is not
    /// borrowed by the returned future and may be changed while it runs.
    pub fn create_async(
        &self,
    ) -> impl Future<Output = Result<Transaction, C::Error>> + Send + use<'a, C> {
        info!(
            company_code = %self.request.company_code,
            code = ?self.request.code,
            lines = self.request.lines.len(),
            "creating transaction (async)"
        );
        let client: &'a C = self.client;
        client.create_transaction_async(self.include.clone(), self.request.clone())
    }

    /// Wrap a copy of the request for adjusting an existing transaction.
    /// Nothing is sent.
    pub fn create_adjustment_request(
        &self,
        description: impl Into<String>,
        reason: AdjustmentReason,
    ) -> AdjustmentRequest {
        debug!(reason = reason.name(), "wrapping adjustment request");
        AdjustmentRequest::new(reason, description.into(), self.request.clone())
    }

    fn new_line(&mut self, amount: Decimal, quantity: Decimal) -> LineItem {
        LineItem::new(self.line_numbers.next_number(), amount, quantity)
    }

    fn push_line(&mut self, line: LineItem) {
        debug!(number = %line.number, tax_code = ?line.tax_code, "line added");
        self.request.lines.push(line);
    }

    fn last_line(&mut self, operation: &'static str) -> Result<&mut LineItem, TransactionError> {
        let index = self.request.lines.len().checked_sub(1).ok_or_else(|| {
            warn!(operation, "line-scoped call before any line was added");
            TransactionError::IllegalState { operation }
        })?;
        Ok(&mut self.request.lines[index])
    }
}

fn tax_override(
    override_type: TaxOverrideType,
    reason: impl Into<String>,
    tax_amount: Option<Decimal>,
    tax_date: Option<NaiveDate>,
) -> Result<TaxOverride, TransactionError> {
    validation::validate_tax_override(override_type, tax_date)?;
    Ok(TaxOverride {
        override_type,
        reason: reason.into(),
        tax_amount: tax_amount.unwrap_or(Decimal::ZERO),
        tax_date,
    })
}
