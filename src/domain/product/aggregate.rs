use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commands::ProductCommand;
use super::errors::ProductError;
use super::events::{
    ListingCancelled, ProductEvent, ProductListed, ProductPurchased, ProductShipped,
    ReceiptConfirmed,
};
use super::value_objects::{
    AccountAddress, ImageRef, Party, Price, ProductId, ProductStatus, ShippingDetails,
    TransactionHash,
};

// ============================================================================
// Product Aggregate - Domain Logic
// ============================================================================

/// The central marketplace entity. Name, description, price and seller are
/// immutable after listing; everything else changes only through the
/// transitions in [`Product::handle_command`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: ImageRef,
    pub seller: AccountAddress,
    pub buyer: Option<AccountAddress>,
    pub status: ProductStatus,
    /// Empty until shipped.
    pub tracking_number: String,
    pub shipping_details: Option<ShippingDetails>,
    pub transaction_hash: Option<TransactionHash>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Validate a new listing and produce its initial event. The only guard
    /// is a non-empty seller identity.
    pub fn listed(
        seller: AccountAddress,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        image: ImageRef,
    ) -> Result<ProductListed, ProductError> {
        if seller.is_empty() {
            return Err(ProductError::EmptySeller);
        }

        Ok(ProductListed {
            id: ProductId::new(),
            seller,
            name: name.into(),
            description: description.into(),
            price,
            image,
            listed_at: Utc::now(),
        })
    }

    /// Materialize a freshly listed product from its initial event.
    pub fn from_listed(event: &ProductListed) -> Self {
        Self {
            id: event.id,
            name: event.name.clone(),
            description: event.description.clone(),
            price: event.price.clone(),
            image: event.image.clone(),
            seller: event.seller.clone(),
            buyer: None,
            status: ProductStatus::Available,
            tracking_number: String::new(),
            shipping_details: None,
            transaction_hash: None,
            created_at: event.listed_at,
        }
    }

    /// This account's relationship to the product.
    pub fn party_of(&self, account: &AccountAddress) -> Party {
        if self.seller.matches(account) {
            Party::Seller
        } else if self.buyer.as_ref().is_some_and(|b| b.matches(account)) {
            Party::Buyer
        } else {
            Party::Visitor
        }
    }

    // ------------------------------------------------------------------
    // Transition guards. Each is checked before any wallet interaction,
    // and again when the transition commits.
    // ------------------------------------------------------------------

    pub fn guard_purchase(&self, buyer: &AccountAddress) -> Result<(), ProductError> {
        if self.status != ProductStatus::Available {
            return Err(ProductError::NotAvailable);
        }
        if self.seller.matches(buyer) {
            return Err(ProductError::SelfPurchase);
        }
        if !self.seller.is_well_formed() {
            return Err(ProductError::InvalidSellerAddress(self.seller.to_string()));
        }
        Ok(())
    }

    pub fn guard_ship(&self, requester: &AccountAddress) -> Result<(), ProductError> {
        if self.status != ProductStatus::PendingShipping {
            return Err(ProductError::NotAwaitingShipment);
        }
        if !self.seller.matches(requester) {
            return Err(ProductError::NotSeller);
        }
        Ok(())
    }

    pub fn guard_confirm_receipt(&self, requester: &AccountAddress) -> Result<(), ProductError> {
        if self.status != ProductStatus::Shipped {
            return Err(ProductError::NotShipped);
        }
        if !self.buyer.as_ref().is_some_and(|b| b.matches(requester)) {
            return Err(ProductError::NotBuyer);
        }
        Ok(())
    }

    pub fn guard_cancel(&self, requester: &AccountAddress) -> Result<(), ProductError> {
        if !matches!(
            self.status,
            ProductStatus::Available | ProductStatus::PendingShipping
        ) {
            return Err(ProductError::NotCancellable(self.status));
        }
        if !self.seller.matches(requester) {
            return Err(ProductError::NotSeller);
        }
        Ok(())
    }

    /// Handle a command and emit the transition event, or fail with the guard
    /// violation without touching state.
    pub fn handle_command(&self, command: &ProductCommand) -> Result<ProductEvent, ProductError> {
        match command {
            ProductCommand::Purchase {
                buyer,
                transaction_hash,
            } => {
                self.guard_purchase(buyer)?;
                Ok(ProductEvent::Purchased(ProductPurchased {
                    buyer: buyer.clone(),
                    transaction_hash: transaction_hash.clone(),
                }))
            }

            ProductCommand::Ship { requester, details } => {
                self.guard_ship(requester)?;
                Ok(ProductEvent::Shipped(ProductShipped {
                    details: details.clone(),
                }))
            }

            ProductCommand::ConfirmReceipt { requester } => {
                self.guard_confirm_receipt(requester)?;
                Ok(ProductEvent::ReceiptConfirmed(ReceiptConfirmed {
                    confirmed_at: Utc::now(),
                }))
            }

            ProductCommand::Cancel { requester } => {
                self.guard_cancel(requester)?;
                Ok(ProductEvent::Cancelled(ListingCancelled {
                    cancelled_at: Utc::now(),
                }))
            }
        }
    }

    /// Apply a committed event to the aggregate state.
    pub fn apply_event(&mut self, event: &ProductEvent) {
        match event {
            ProductEvent::Listed(_) => {
                // Initial event, consumed by `from_listed`.
            }
            ProductEvent::Purchased(e) => {
                self.status = ProductStatus::PendingShipping;
                self.buyer = Some(e.buyer.clone());
                self.transaction_hash = Some(e.transaction_hash.clone());
            }
            ProductEvent::Shipped(e) => {
                self.status = ProductStatus::Shipped;
                self.tracking_number = e.details.tracking_number.clone();
                self.shipping_details = Some(e.details.clone());
            }
            ProductEvent::ReceiptConfirmed(_) => {
                self.status = ProductStatus::Completed;
            }
            ProductEvent::Cancelled(_) => {
                self.status = ProductStatus::Cancelled;
                // Invariant: a cancelled listing carries no buyer. The
                // settled transaction hash stays as history.
                self.buyer = None;
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
