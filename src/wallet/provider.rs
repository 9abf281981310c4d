use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::product::{AccountAddress, TransactionHash};

use super::typed_data::TypedIntent;

// ============================================================================
// Wallet Provider Boundary
// ============================================================================
//
// Minimal contract the core requires from the external signing provider.
// The provider's internal signing and transaction machinery is out of scope;
// the core only issues requests and interprets typed failures.
//
// ============================================================================

/// The standard code a wallet reports when the user explicitly declines a
/// request.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet provider is available")]
    Unavailable,

    #[error("Request was rejected (code {code})")]
    Rejected { code: i64 },

    #[error("Provider error {code}: {message}")]
    Rpc { code: i64, message: String },
}

impl WalletError {
    pub fn rejected() -> Self {
        Self::Rejected {
            code: USER_REJECTED_CODE,
        }
    }

    /// True when the failure carries the standard user-rejection code.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::Rejected { code } if *code == USER_REJECTED_CODE)
    }
}

/// Value transfer request submitted to the wallet provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRequest {
    pub from: AccountAddress,
    pub to: AccountAddress,
    /// Amount in the currency's smallest unit, `0x`-prefixed base-16.
    pub value: String,
    pub gas: String,
    pub data: String,
}

/// Outcome reported by the settlement ledger for a submitted transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Success,
    Failure,
}

/// The ledger's confirmation object for a submitted transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub transaction_hash: TransactionHash,
    pub status: ReceiptStatus,
}

/// External wallet provider. All calls are suspension points; the core
/// imposes no internal timeout — a non-responding call is simply not yet
/// resolved.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the provider exposes; the first one is the acting identity.
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, WalletError>;

    /// Chain identifier used for domain separation of signed intents.
    async fn chain_id(&self) -> Result<String, WalletError>;

    /// Obtain a signature over a domain-separated structured intent.
    async fn sign_typed_data(
        &self,
        account: AccountAddress,
        payload: TypedIntent,
    ) -> Result<String, WalletError>;

    /// Submit a value transfer, returning its transaction hash.
    async fn send_value_transfer(
        &self,
        request: TransferRequest,
    ) -> Result<TransactionHash, WalletError>;

    /// Fetch the receipt for a submitted transfer, if one exists yet.
    async fn get_receipt(
        &self,
        transaction: TransactionHash,
    ) -> Result<Option<TransactionReceipt>, WalletError>;
}
