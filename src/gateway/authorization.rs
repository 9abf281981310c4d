use std::sync::Arc;

use crate::domain::product::AccountAddress;
use crate::error::MarketError;
use crate::wallet::{IntentAction, TypedIntent, WalletError, WalletProvider};

// ============================================================================
// Authorization Gateway
// ============================================================================
//
// Every signed mutation starts here: the gateway builds the domain-separated
// intent, asks the acting party's wallet to sign it, and maps provider
// failures onto the operation taxonomy. No product state mutates unless this
// call succeeds.
//
// ============================================================================

pub struct AuthorizationGateway<W> {
    provider: Arc<W>,
}

impl<W: WalletProvider> AuthorizationGateway<W> {
    pub fn new(provider: Arc<W>) -> Self {
        Self { provider }
    }

    /// Request a signature over a structured intent carrying the action tag
    /// and a human-readable description of the specific transition.
    pub async fn request_signature(
        &self,
        account: &AccountAddress,
        action: IntentAction,
        details: String,
    ) -> Result<String, MarketError> {
        let chain_id = self.provider.chain_id().await.map_err(auth_error)?;
        let intent = TypedIntent::new(chain_id, action, details);

        tracing::debug!(account = %account, action = %action, "Requesting intent signature");

        let signature = self
            .provider
            .sign_typed_data(account.clone(), intent)
            .await
            .map_err(auth_error)?;

        tracing::debug!(account = %account, action = %action, "Intent signed");
        Ok(signature)
    }
}

/// Authorization-step error mapping: unreachable provider, explicit decline,
/// anything else.
pub(crate) fn auth_error(err: WalletError) -> MarketError {
    match err {
        WalletError::Unavailable => MarketError::WalletUnavailable,
        WalletError::Rejected { .. } => MarketError::UserRejected,
        other => MarketError::AuthDenied(other.to_string()),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::MockWalletProvider;

    const ACCOUNT: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

    #[tokio::test]
    async fn test_signature_request_carries_action_and_details() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_chain_id().returning(|| Ok("0x1".to_string()));
        wallet
            .expect_sign_typed_data()
            .withf(|account, payload| {
                account.as_str() == ACCOUNT
                    && payload.message.action == IntentAction::CancelListing
                    && payload.message.details == "Cancel listing for Jacket"
                    && payload.domain.chain_id == "0x1"
            })
            .returning(|_, _| Ok("0xsignature".to_string()));

        let gateway = AuthorizationGateway::new(Arc::new(wallet));
        let signature = gateway
            .request_signature(
                &AccountAddress::new(ACCOUNT),
                IntentAction::CancelListing,
                "Cancel listing for Jacket".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(signature, "0xsignature");
    }

    #[tokio::test]
    async fn test_unreachable_provider_maps_to_wallet_unavailable() {
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_chain_id()
            .returning(|| Err(WalletError::Unavailable));

        let gateway = AuthorizationGateway::new(Arc::new(wallet));
        let err = gateway
            .request_signature(
                &AccountAddress::new(ACCOUNT),
                IntentAction::ListProduct,
                "List Jacket for 0.05 ETH".to_string(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, MarketError::WalletUnavailable);
    }

    #[tokio::test]
    async fn test_explicit_decline_maps_to_user_rejected() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_chain_id().returning(|| Ok("0x1".to_string()));
        wallet
            .expect_sign_typed_data()
            .returning(|_, _| Err(WalletError::rejected()));

        let gateway = AuthorizationGateway::new(Arc::new(wallet));
        let err = gateway
            .request_signature(
                &AccountAddress::new(ACCOUNT),
                IntentAction::ConfirmReceipt,
                "Confirm receipt".to_string(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, MarketError::UserRejected);
    }

    #[tokio::test]
    async fn test_other_failures_map_to_auth_denied() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_chain_id().returning(|| Ok("0x1".to_string()));
        wallet.expect_sign_typed_data().returning(|_, _| {
            Err(WalletError::Rpc {
                code: -32603,
                message: "internal error".to_string(),
            })
        });

        let gateway = AuthorizationGateway::new(Arc::new(wallet));
        let err = gateway
            .request_signature(
                &AccountAddress::new(ACCOUNT),
                IntentAction::UpdateShipping,
                "Ship Jacket".to_string(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::AuthDenied(_)));
    }
}
