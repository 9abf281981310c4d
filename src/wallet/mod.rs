// ============================================================================
// Wallet Boundary - External Signing Provider
// ============================================================================
//
// The wallet provider is an external collaborator. This module owns the
// contract the core requires from it (provider trait, typed failures) and
// the construction of the domain-separated intent payloads it signs.
//
// ============================================================================

pub mod provider;
pub mod typed_data;

pub use provider::{
    ReceiptStatus, TransactionReceipt, TransferRequest, WalletError, WalletProvider,
    USER_REJECTED_CODE,
};
pub use typed_data::{
    IntentAction, TypedIntent, SIGNING_DOMAIN_NAME, SIGNING_DOMAIN_VERSION,
};

#[cfg(test)]
pub use provider::MockWalletProvider;
