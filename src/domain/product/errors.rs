use super::value_objects::{ProductId, ProductStatus};

// ============================================================================
// Product Business Rule Errors
// ============================================================================

/// Precondition violations. Every variant maps to the validation class of the
/// operation error taxonomy: the guard failed before any external call, and
/// no state was mutated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Product is not available for purchase")]
    NotAvailable,

    #[error("You cannot buy your own product")]
    SelfPurchase,

    #[error("Invalid seller address: {0}")]
    InvalidSellerAddress(String),

    #[error("Seller identity must not be empty")]
    EmptySeller,

    #[error("Product is not awaiting shipment")]
    NotAwaitingShipment,

    #[error("Product has not been shipped")]
    NotShipped,

    #[error("Only the seller may perform this operation")]
    NotSeller,

    #[error("Only the buyer may perform this operation")]
    NotBuyer,

    #[error("Cannot cancel a listing in status: {0:?}")]
    NotCancellable(ProductStatus),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}
