use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::aggregate::Product;
use super::value_objects::{
    AccountAddress, ImageRef, Price, ProductId, ProductStatus, ShippingDetails, TransactionHash,
};

// ============================================================================
// Product Events - Committed transitions of the product lifecycle
// ============================================================================

/// Product Event - Union type for all product transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ProductEvent {
    Listed(ProductListed),
    Purchased(ProductPurchased),
    Shipped(ProductShipped),
    ReceiptConfirmed(ReceiptConfirmed),
    Cancelled(ListingCancelled),
}

impl ProductEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            ProductEvent::Listed(_) => "ProductListed",
            ProductEvent::Purchased(_) => "ProductPurchased",
            ProductEvent::Shipped(_) => "ProductShipped",
            ProductEvent::ReceiptConfirmed(_) => "ReceiptConfirmed",
            ProductEvent::Cancelled(_) => "ListingCancelled",
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// Product Listed - Initial event in the product lifecycle
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductListed {
    pub id: ProductId,
    pub seller: AccountAddress,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: ImageRef,
    pub listed_at: DateTime<Utc>,
}

/// Product Purchased - Settlement succeeded, product awaits shipment
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductPurchased {
    pub buyer: AccountAddress,
    pub transaction_hash: TransactionHash,
}

/// Product Shipped - Seller dispatched the item
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductShipped {
    pub details: ShippingDetails,
}

/// Receipt Confirmed - Buyer acknowledged delivery
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ReceiptConfirmed {
    pub confirmed_at: DateTime<Utc>,
}

/// Listing Cancelled - Seller withdrew the listing
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ListingCancelled {
    pub cancelled_at: DateTime<Utc>,
}

// ============================================================================
// Transition Record - Output boundary
// ============================================================================

/// What a committed transition hands to the presentation layer. The core does
/// not format, localize, or display this data.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionRecord {
    pub id: ProductId,
    pub new_status: ProductStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_details: Option<ShippingDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TransactionHash>,
}

impl TransitionRecord {
    /// Capture the observable outcome of a transition that just committed.
    pub fn capture(product: &Product) -> Self {
        Self {
            id: product.id,
            new_status: product.status,
            timestamp: Utc::now(),
            tracking_number: if product.tracking_number.is_empty() {
                None
            } else {
                Some(product.tracking_number.clone())
            },
            shipping_details: product.shipping_details.clone(),
            transaction_hash: product.transaction_hash.clone(),
        }
    }
}
