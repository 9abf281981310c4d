use crate::domain::product::{ProductError, TransactionHash};
use crate::wallet::WalletError;

// ============================================================================
// Operation Error Taxonomy
// ============================================================================

/// Typed outcome of a failed mutating operation. Every operation either
/// commits fully (state plus all derived views) or returns one of these and
/// changes nothing; the core never retries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarketError {
    /// No signing provider is reachable.
    #[error("No wallet provider is reachable")]
    WalletUnavailable,

    /// The acting party explicitly declined the request.
    #[error("Request was rejected by the user")]
    UserRejected,

    /// The signature step failed for any reason other than an explicit
    /// decline or an unreachable provider.
    #[error("Authorization failed: {0}")]
    AuthDenied(String),

    /// A transition guard failed before any external call was made.
    #[error(transparent)]
    Validation(#[from] ProductError),

    /// The settlement receipt was missing or reported a non-success status.
    #[error("Transaction failed: {0}")]
    TransactionFailed(TransactionHash),

    /// Raw settlement failure that is neither a user rejection nor a bad
    /// receipt, propagated unchanged.
    #[error(transparent)]
    Wallet(WalletError),
}
