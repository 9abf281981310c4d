use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Product Value Objects
// ============================================================================

/// Stable product identifier, assigned at listing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// On-chain account address. Stored as given; identity comparisons are
/// case-insensitive because hex addresses carry no case information.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive address equality.
    pub fn matches(&self, other: &AccountAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Well-formed iff `0x` followed by exactly 40 hex characters.
    pub fn is_well_formed(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
            None => false,
        }
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing price as a decimal string in the currency's major unit, e.g. "0.05".
/// Validated only when converted for settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price(String);

impl Price {
    pub fn new(price: impl Into<String>) -> Self {
        Self(price.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to display media, carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }
}

/// Hash of a settled value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionHash(pub String);

impl TransactionHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Product Status
// ============================================================================

/// Canonical product status. `SOLD` is not a state: it is the catalog view's
/// display label for `PendingShipping` (see [`ProductStatus::catalog_label`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    Available,
    PendingShipping,
    Shipped,
    Completed,
    Cancelled,
}

impl ProductStatus {
    /// Returns true if transitioning from self to `next` is valid. The graph
    /// only moves forward: nothing reinstates `Available`, and a shipped
    /// product can never return to `PendingShipping`.
    pub fn can_transition_to(self, next: ProductStatus) -> bool {
        matches!(
            (self, next),
            (ProductStatus::Available, ProductStatus::PendingShipping)
                | (ProductStatus::Available, ProductStatus::Cancelled)
                | (ProductStatus::PendingShipping, ProductStatus::Shipped)
                | (ProductStatus::PendingShipping, ProductStatus::Cancelled)
                | (ProductStatus::Shipped, ProductStatus::Completed)
        )
    }

    /// Wire/display label for the owner-facing views.
    pub fn label(self) -> &'static str {
        match self {
            ProductStatus::Available => "AVAILABLE",
            ProductStatus::PendingShipping => "PENDING_SHIPPING",
            ProductStatus::Shipped => "SHIPPED",
            ProductStatus::Completed => "COMPLETED",
            ProductStatus::Cancelled => "CANCELLED",
        }
    }

    /// Label shown by the global catalog, which displays `SOLD` for a product
    /// whose owner views show `PENDING_SHIPPING`.
    pub fn catalog_label(self) -> &'static str {
        match self {
            ProductStatus::PendingShipping => "SOLD",
            other => other.label(),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProductStatus::Completed | ProductStatus::Cancelled)
    }
}

// ============================================================================
// Shipping Details
// ============================================================================

/// Shipment form as filled in by the seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingForm {
    pub recipient_name: String,
    pub phone_number: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub courier_service: String,
    pub package_weight: String,
    pub special_instructions: String,
}

/// Shipment metadata recorded when a product is shipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingDetails {
    #[serde(flatten)]
    pub form: ShippingForm,
    pub tracking_number: String,
    pub shipped_at: DateTime<Utc>,
}

// ============================================================================
// Per-Status Action Table
// ============================================================================

/// A party's relationship to a specific product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Seller,
    Buyer,
    Visitor,
}

/// Operations a party can issue against a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    Purchase,
    Ship,
    ConfirmReceipt,
    Cancel,
}

/// Which operations are valid for a party while the product is in a given
/// status. This is the single source of truth for action selection; the
/// aggregate's guards enforce the same table.
pub fn permitted_actions(status: ProductStatus, party: Party) -> &'static [ProductAction] {
    match (status, party) {
        (ProductStatus::Available, Party::Visitor) => &[ProductAction::Purchase],
        (ProductStatus::Available, Party::Seller) => &[ProductAction::Cancel],
        (ProductStatus::PendingShipping, Party::Seller) => {
            &[ProductAction::Ship, ProductAction::Cancel]
        }
        (ProductStatus::Shipped, Party::Buyer) => &[ProductAction::ConfirmReceipt],
        _ => &[],
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
