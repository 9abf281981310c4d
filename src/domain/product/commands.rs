use super::value_objects::{AccountAddress, ShippingDetails, TransactionHash};

// ============================================================================
// Product Commands - Represent user intent
// ============================================================================

/// Mutations of an existing product. Listing a new product goes through
/// [`super::aggregate::Product::listed`] instead, since there is no aggregate
/// to address yet.
#[derive(Debug, Clone)]
pub enum ProductCommand {
    /// Settlement has already succeeded when this command is handled; the
    /// transaction hash is the proof carried into the transition.
    Purchase {
        buyer: AccountAddress,
        transaction_hash: TransactionHash,
    },
    Ship {
        requester: AccountAddress,
        details: ShippingDetails,
    },
    ConfirmReceipt {
        requester: AccountAddress,
    },
    Cancel {
        requester: AccountAddress,
    },
}
