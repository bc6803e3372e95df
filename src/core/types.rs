use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The request document submitted to the tax service.
///
/// Map fields are always present; empty maps are omitted on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Company the transaction is recorded under.
    pub company_code: String,
    /// Document code; the service assigns one when absent.
    pub code: Option<String>,
    /// Document type.
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    /// Transaction date.
    pub date: NaiveDate,
    /// Customer the transaction is billed to.
    pub customer_code: String,
    /// Entity/use code applied to all lines without their own.
    pub customer_usage_type: Option<String>,
    /// Exemption certificate number.
    pub exemption_no: Option<String>,
    /// Document-level discount, applied to lines flagged as discounted.
    pub discount: Decimal,
    /// Commit the document on creation.
    pub commit: bool,
    /// Level of diagnostic detail requested from the service.
    pub debug_level: TaxDebugLevel,
    /// ISO 4217 currency code.
    pub currency_code: Option<String>,
    /// Purchase order number of the customer.
    pub purchase_order_no: Option<String>,
    /// Free-form reference.
    pub reference_code: Option<String>,
    /// Location code for location-based reporting.
    pub reporting_location_code: Option<String>,
    /// Document description.
    pub description: Option<String>,
    /// Salesperson code.
    pub salesperson_code: Option<String>,
    /// Document-level addresses, one per role.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub addresses: BTreeMap<TransactionAddressType, AddressInfo>,
    /// Custom parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    /// Document-level tax override.
    pub tax_override: Option<TaxOverride>,
    /// Line items in numbering order.
    #[serde(default)]
    pub lines: Vec<LineItem>,
}

impl TransactionRequest {
    /// Empty request dated `date`.
    pub fn new(
        company_code: impl Into<String>,
        doc_type: DocumentType,
        customer_code: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            company_code: company_code.into(),
            code: None,
            doc_type,
            date,
            customer_code: customer_code.into(),
            customer_usage_type: None,
            exemption_no: None,
            discount: Decimal::ZERO,
            commit: false,
            debug_level: TaxDebugLevel::Normal,
            currency_code: None,
            purchase_order_no: None,
            reference_code: None,
            reporting_location_code: None,
            description: None,
            salesperson_code: None,
            addresses: BTreeMap::new(),
            parameters: BTreeMap::new(),
            tax_override: None,
            lines: Vec::new(),
        }
    }

    /// Look up a line by its number ("1", "2", ...).
    pub fn line(&self, number: &str) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.number == number)
    }

    /// Sum of `amount` over all lines.
    pub fn total_amount(&self) -> Decimal {
        self.lines.iter().map(|l| l.amount).sum()
    }
}

/// A single line of a transaction request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 1-based line number, assigned when the line is appended.
    pub number: String,
    /// Quantity; 1 unless given.
    pub quantity: Decimal,
    /// Total amount of the line (not the unit price).
    pub amount: Decimal,
    /// Tax code of the goods or service.
    pub tax_code: Option<String>,
    /// Exemption code for exempt lines.
    pub exemption_code: Option<String>,
    pub item_code: Option<String>,
    pub description: Option<String>,
    pub customer_usage_type: Option<String>,
    pub ref1: Option<String>,
    pub ref2: Option<String>,
    /// Whether `amount` already includes tax.
    pub tax_included: bool,
    /// Whether the document-level discount applies to this line.
    pub discounted: bool,
    /// Line-level addresses, overriding the document addresses per role.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub addresses: BTreeMap<TransactionAddressType, AddressInfo>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, String>,
    pub tax_override: Option<TaxOverride>,
}

impl LineItem {
    pub(crate) fn new(number: String, amount: Decimal, quantity: Decimal) -> Self {
        Self {
            number,
            quantity,
            amount,
            tax_code: None,
            exemption_code: None,
            item_code: None,
            description: None,
            customer_usage_type: None,
            ref1: None,
            ref2: None,
            tax_included: false,
            discounted: false,
            addresses: BTreeMap::new(),
            parameters: BTreeMap::new(),
            tax_override: None,
        }
    }
}

/// A location, either as a postal address or as a coordinate.
///
/// The two forms are exclusive in practice, but nothing prevents a caller
/// from filling both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State, province or region code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Country code (ISO 3166-1 alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Decimal>,
}

impl AddressInfo {
    /// Postal address form.
    pub fn postal(
        line1: impl Into<String>,
        line2: Option<&str>,
        line3: Option<&str>,
        city: impl Into<String>,
        region: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            line1: Some(line1.into()),
            line2: line2.map(str::to_string),
            line3: line3.map(str::to_string),
            city: Some(city.into()),
            region: Some(region.into()),
            postal_code: Some(postal_code.into()),
            country: Some(country.into()),
            latitude: None,
            longitude: None,
        }
    }

    /// Coordinate form.
    pub fn lat_long(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }

    /// True if any postal field is set.
    pub fn is_postal(&self) -> bool {
        self.line1.is_some()
            || self.city.is_some()
            || self.region.is_some()
            || self.postal_code.is_some()
            || self.country.is_some()
    }

    /// True if both coordinates are set.
    pub fn is_coordinate(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

/// Override of the tax the service would otherwise calculate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxOverride {
    #[serde(rename = "type")]
    pub override_type: TaxOverrideType,
    /// Free-text reason recorded with the override.
    pub reason: String,
    /// Tax amount; zero unless given.
    pub tax_amount: Decimal,
    /// Date used for rate lookup; required for [`TaxOverrideType::TaxDate`].
    pub tax_date: Option<NaiveDate>,
}

/// A committed transaction re-submitted with a reason for the change.
///
/// Produced by [`super::TransactionBuilder::create_adjustment_request`] and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRequest {
    adjustment_reason: AdjustmentReason,
    adjustment_description: String,
    new_transaction: TransactionRequest,
}

impl AdjustmentRequest {
    pub(crate) fn new(
        adjustment_reason: AdjustmentReason,
        adjustment_description: String,
        new_transaction: TransactionRequest,
    ) -> Self {
        Self {
            adjustment_reason,
            adjustment_description,
            new_transaction,
        }
    }

    pub fn adjustment_reason(&self) -> AdjustmentReason {
        self.adjustment_reason
    }

    pub fn adjustment_description(&self) -> &str {
        &self.adjustment_description
    }

    pub fn new_transaction(&self) -> &TransactionRequest {
        &self.new_transaction
    }
}

/// Document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 0 — Estimate, never saved.
    SalesOrder,
    /// 1 — Sale, recorded.
    SalesInvoice,
    /// 2 — Purchase estimate.
    PurchaseOrder,
    /// 3 — Purchase, recorded.
    PurchaseInvoice,
    /// 4 — Return estimate.
    ReturnOrder,
    /// 5 — Return, recorded.
    ReturnInvoice,
    /// 6 — Inventory transfer estimate.
    InventoryTransferOrder,
    /// 7 — Inventory transfer, recorded.
    InventoryTransferInvoice,
    /// 8 — Reverse charge estimate.
    ReverseChargeOrder,
    /// 9 — Reverse charge, recorded.
    ReverseChargeInvoice,
    /// -1 — Any type; only meaningful for lookups.
    Any,
}

impl DocumentType {
    /// Numeric code.
    pub fn code(&self) -> i8 {
        match self {
            Self::SalesOrder => 0,
            Self::SalesInvoice => 1,
            Self::PurchaseOrder => 2,
            Self::PurchaseInvoice => 3,
            Self::ReturnOrder => 4,
            Self::ReturnInvoice => 5,
            Self::InventoryTransferOrder => 6,
            Self::InventoryTransferInvoice => 7,
            Self::ReverseChargeOrder => 8,
            Self::ReverseChargeInvoice => 9,
            Self::Any => -1,
        }
    }

    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(Self::SalesOrder),
            1 => Some(Self::SalesInvoice),
            2 => Some(Self::PurchaseOrder),
            3 => Some(Self::PurchaseInvoice),
            4 => Some(Self::ReturnOrder),
            5 => Some(Self::ReturnInvoice),
            6 => Some(Self::InventoryTransferOrder),
            7 => Some(Self::InventoryTransferInvoice),
            8 => Some(Self::ReverseChargeOrder),
            9 => Some(Self::ReverseChargeInvoice),
            -1 => Some(Self::Any),
            _ => None,
        }
    }

    /// Wire name (e.g. "SalesInvoice").
    pub fn name(&self) -> &'static str {
        match self {
            Self::SalesOrder => "SalesOrder",
            Self::SalesInvoice => "SalesInvoice",
            Self::PurchaseOrder => "PurchaseOrder",
            Self::PurchaseInvoice => "PurchaseInvoice",
            Self::ReturnOrder => "ReturnOrder",
            Self::ReturnInvoice => "ReturnInvoice",
            Self::InventoryTransferOrder => "InventoryTransferOrder",
            Self::InventoryTransferInvoice => "InventoryTransferInvoice",
            Self::ReverseChargeOrder => "ReverseChargeOrder",
            Self::ReverseChargeInvoice => "ReverseChargeInvoice",
            Self::Any => "Any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SalesOrder" => Some(Self::SalesOrder),
            "SalesInvoice" => Some(Self::SalesInvoice),
            "PurchaseOrder" => Some(Self::PurchaseOrder),
            "PurchaseInvoice" => Some(Self::PurchaseInvoice),
            "ReturnOrder" => Some(Self::ReturnOrder),
            "ReturnInvoice" => Some(Self::ReturnInvoice),
            "InventoryTransferOrder" => Some(Self::InventoryTransferOrder),
            "InventoryTransferInvoice" => Some(Self::InventoryTransferInvoice),
            "ReverseChargeOrder" => Some(Self::ReverseChargeOrder),
            "ReverseChargeInvoice" => Some(Self::ReverseChargeInvoice),
            "Any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Whether documents of this type are recorded (invoices) rather than estimates (orders).
    pub fn is_recorded(&self) -> bool {
        matches!(
            self,
            Self::SalesInvoice
                | Self::PurchaseInvoice
                | Self::ReturnInvoice
                | Self::InventoryTransferInvoice
                | Self::ReverseChargeInvoice
        )
    }
}

/// Address roles. Each role holds at most one address per map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionAddressType {
    /// Origin of the goods.
    ShipFrom,
    /// Destination of the goods.
    ShipTo,
    /// Where the order was accepted.
    PointOfOrderAcceptance,
    /// Where the order was placed.
    PointOfOrderOrigin,
    /// Over-the-counter sale: origin and destination are the same.
    SingleLocation,
}

impl TransactionAddressType {
    /// Wire name (e.g. "ShipFrom").
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShipFrom => "ShipFrom",
            Self::ShipTo => "ShipTo",
            Self::PointOfOrderAcceptance => "PointOfOrderAcceptance",
            Self::PointOfOrderOrigin => "PointOfOrderOrigin",
            Self::SingleLocation => "SingleLocation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ShipFrom" => Some(Self::ShipFrom),
            "ShipTo" => Some(Self::ShipTo),
            "PointOfOrderAcceptance" => Some(Self::PointOfOrderAcceptance),
            "PointOfOrderOrigin" => Some(Self::PointOfOrderOrigin),
            "SingleLocation" => Some(Self::SingleLocation),
            _ => None,
        }
    }
}

/// Kinds of tax override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxOverrideType {
    /// No override.
    None,
    /// Use the given tax amount instead of the calculated one.
    TaxAmount,
    /// Treat the document as exempt.
    Exemption,
    /// Look up rates as of a different date.
    TaxDate,
    /// Tax amount accrued by the buyer (use tax).
    AccruedTaxAmount,
    /// Derive the taxable amount from the given tax amount.
    DeriveTaxable,
}

impl TaxOverrideType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::TaxAmount => "TaxAmount",
            Self::Exemption => "Exemption",
            Self::TaxDate => "TaxDate",
            Self::AccruedTaxAmount => "AccruedTaxAmount",
            Self::DeriveTaxable => "DeriveTaxable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "None" => Some(Self::None),
            "TaxAmount" => Some(Self::TaxAmount),
            "Exemption" => Some(Self::Exemption),
            "TaxDate" => Some(Self::TaxDate),
            "AccruedTaxAmount" => Some(Self::AccruedTaxAmount),
            "DeriveTaxable" => Some(Self::DeriveTaxable),
            _ => None,
        }
    }
}

/// Diagnostic detail requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxDebugLevel {
    /// Standard response.
    #[default]
    Normal,
    /// Response includes diagnostic messages.
    Diagnostic,
}

impl TaxDebugLevel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Diagnostic => "Diagnostic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Normal" => Some(Self::Normal),
            "Diagnostic" => Some(Self::Diagnostic),
            _ => None,
        }
    }
}

/// Reason codes for adjusting a committed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentReason {
    /// 0
    NotAdjusted,
    /// 1
    SourcingIssue,
    /// 2
    ReconciledWithGeneralLedger,
    /// 3
    ExemptCertApplied,
    /// 4
    PriceAdjusted,
    /// 5
    ProductReturned,
    /// 6
    ProductExchanged,
    /// 7
    BadDebt,
    /// 8 — requires a description.
    Other,
    /// 9
    Offline,
}

impl AdjustmentReason {
    pub fn code(&self) -> u8 {
        match self {
            Self::NotAdjusted => 0,
            Self::SourcingIssue => 1,
            Self::ReconciledWithGeneralLedger => 2,
            Self::ExemptCertApplied => 3,
            Self::PriceAdjusted => 4,
            Self::ProductReturned => 5,
            Self::ProductExchanged => 6,
            Self::BadDebt => 7,
            Self::Other => 8,
            Self::Offline => 9,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NotAdjusted),
            1 => Some(Self::SourcingIssue),
            2 => Some(Self::ReconciledWithGeneralLedger),
            3 => Some(Self::ExemptCertApplied),
            4 => Some(Self::PriceAdjusted),
            5 => Some(Self::ProductReturned),
            6 => Some(Self::ProductExchanged),
            7 => Some(Self::BadDebt),
            8 => Some(Self::Other),
            9 => Some(Self::Offline),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAdjusted => "NotAdjusted",
            Self::SourcingIssue => "SourcingIssue",
            Self::ReconciledWithGeneralLedger => "ReconciledWithGeneralLedger",
            Self::ExemptCertApplied => "ExemptCertApplied",
            Self::PriceAdjusted => "PriceAdjusted",
            Self::ProductReturned => "ProductReturned",
            Self::ProductExchanged => "ProductExchanged",
            Self::BadDebt => "BadDebt",
            Self::Other => "Other",
            Self::Offline => "Offline",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        (0..=9)
            .filter_map(Self::from_code)
            .find(|r| r.name() == name)
    }
}
